//! Process-wide rate-limit countdown shared by every page of the client.
//!
//! The request layer reports each HTTP 429 here; a single registered
//! handler (one global modal) observes every state transition. While a
//! countdown is live, dismissal is rejected on purpose: the whole point
//! is to force a cool-down.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use inkstream_api::RateLimitSink;
use tokio::time::sleep;

/// Interval between countdown decrements.
const TICK: Duration = Duration::from_secs(1);

/// Snapshot of the coordinator handed to the registered handler and
/// returned by [`RateLimitCoordinator::state`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitState {
    /// Whether interaction should currently be blocked.
    pub is_blocking: bool,
    /// The `Retry-After` value the live cooldown started from, if any.
    pub retry_after: Option<u64>,
    /// Seconds left on the live countdown. `None` when blocked without a
    /// server-supplied value.
    pub remaining: Option<u64>,
}

impl RateLimitState {
    fn idle() -> Self {
        Self {
            is_blocking: false,
            retry_after: None,
            remaining: None,
        }
    }
}

#[derive(Clone, Copy)]
enum Phase {
    Idle,
    Counting { retry_after: u64, remaining: u64 },
    Blocked,
}

struct PhaseState {
    phase: Phase,
    /// Bumped on every notify and acknowledge; a countdown task whose
    /// epoch no longer matches exits without touching the phase.
    epoch: u64,
}

impl PhaseState {
    fn snapshot(&self) -> RateLimitState {
        match self.phase {
            Phase::Idle => RateLimitState::idle(),
            Phase::Counting {
                retry_after,
                remaining,
            } => RateLimitState {
                is_blocking: true,
                retry_after: Some(retry_after),
                remaining: Some(remaining),
            },
            Phase::Blocked => RateLimitState {
                is_blocking: true,
                retry_after: None,
                remaining: None,
            },
        }
    }
}

type Handler = Box<dyn Fn(RateLimitState) + Send>;

struct Shared {
    state: Mutex<PhaseState>,
    handler: Mutex<Option<Handler>>,
}

impl Shared {
    fn emit(&self, snapshot: RateLimitState) {
        let handler = self.handler.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handler) = handler.as_ref() {
            handler(snapshot);
        }
    }
}

/// Countdown state machine fed by the request layer on HTTP 429.
///
/// `Idle` becomes `Counting(n)` when the server supplied a positive
/// `Retry-After`, ticking down once per second until it auto-clears, or
/// `Blocked` when it did not, which only an explicit
/// [`acknowledge`](RateLimitCoordinator::acknowledge) clears. A re-entrant
/// 429 abandons the previous countdown outright; the latest value wins.
#[derive(Clone)]
pub struct RateLimitCoordinator {
    shared: Arc<Shared>,
}

impl Default for RateLimitCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimitCoordinator {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(PhaseState {
                    phase: Phase::Idle,
                    epoch: 0,
                }),
                handler: Mutex::new(None),
            }),
        }
    }

    /// Registers the single transition handler. Exactly one is held at a
    /// time; a later registration replaces the earlier one.
    pub fn register_handler(&self, handler: impl Fn(RateLimitState) + Send + 'static) {
        *self
            .shared
            .handler
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(Box::new(handler));
    }

    /// Current state snapshot.
    pub fn state(&self) -> RateLimitState {
        self.shared
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .snapshot()
    }

    /// Records a 429. A positive `retry_after` starts (or restarts) the
    /// countdown; anything else blocks without one.
    pub fn notify(&self, retry_after: Option<u64>) {
        let (snapshot, counting_epoch) = {
            let mut guard = self.shared.state.lock().unwrap_or_else(|e| e.into_inner());
            guard.epoch += 1;
            guard.phase = match retry_after {
                Some(seconds) if seconds > 0 => Phase::Counting {
                    retry_after: seconds,
                    remaining: seconds,
                },
                _ => Phase::Blocked,
            };
            let counting = matches!(guard.phase, Phase::Counting { .. }).then_some(guard.epoch);
            (guard.snapshot(), counting)
        };
        tracing::warn!(retry_after = ?retry_after, "rate limited");
        self.shared.emit(snapshot);

        if let Some(epoch) = counting_epoch {
            let shared = Arc::clone(&self.shared);
            tokio::spawn(async move {
                loop {
                    sleep(TICK).await;
                    let snapshot = {
                        let mut guard = shared.state.lock().unwrap_or_else(|e| e.into_inner());
                        if guard.epoch != epoch {
                            return;
                        }
                        guard.phase = match guard.phase {
                            Phase::Counting {
                                retry_after,
                                remaining,
                            } if remaining > 1 => Phase::Counting {
                                retry_after,
                                remaining: remaining - 1,
                            },
                            Phase::Counting { .. } => Phase::Idle,
                            _ => return,
                        };
                        guard.snapshot()
                    };
                    let done = !snapshot.is_blocking;
                    shared.emit(snapshot);
                    if done {
                        return;
                    }
                }
            });
        }
    }

    /// User acknowledgment. Rejected (returns `false`, nothing changes)
    /// while a countdown is still running; otherwise clears to `Idle` and
    /// returns `true`.
    pub fn acknowledge(&self) -> bool {
        let snapshot = {
            let mut guard = self.shared.state.lock().unwrap_or_else(|e| e.into_inner());
            if matches!(guard.phase, Phase::Counting { .. }) {
                return false;
            }
            guard.epoch += 1;
            guard.phase = Phase::Idle;
            guard.snapshot()
        };
        self.shared.emit(snapshot);
        true
    }
}

impl RateLimitSink for RateLimitCoordinator {
    fn on_rate_limited(&self, retry_after: Option<u64>) {
        self.notify(retry_after);
    }
}
