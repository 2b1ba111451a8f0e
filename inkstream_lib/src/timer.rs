//! Cancellable one-shot timer used for debouncing.
//!
//! Scheduling is epoch-based: each `schedule` or `cancel` bumps a shared
//! counter, and a sleeping task only runs its action if the counter still
//! matches the value it was spawned with. Superseded actions simply never
//! fire; nothing is aborted mid-poll.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

/// A token handed to scheduled actions so they can re-check freshness
/// after their own suspension points (e.g. a network call).
#[derive(Clone)]
pub struct TimerToken {
    epoch: u64,
    shared: Arc<AtomicU64>,
}

impl TimerToken {
    /// Whether no newer schedule or cancel has happened since this action
    /// was scheduled.
    pub fn is_current(&self) -> bool {
        self.shared.load(Ordering::SeqCst) == self.epoch
    }
}

/// One-shot cancellable timer. Scheduling replaces any pending action.
#[derive(Clone, Default)]
pub struct Debouncer {
    epoch: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `action` after `delay` unless a later `schedule` or `cancel`
    /// supersedes it first.
    pub fn schedule<F, Fut>(&self, delay: Duration, action: F)
    where
        F: FnOnce(TimerToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let shared = Arc::clone(&self.epoch);
        tokio::spawn(async move {
            sleep(delay).await;
            let token = TimerToken { epoch, shared };
            if token.is_current() {
                action(token).await;
            }
        });
    }

    /// Drops any pending action without scheduling a new one.
    pub fn cancel(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }
}
