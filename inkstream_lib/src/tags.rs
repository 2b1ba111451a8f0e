//! Debounced tag autocomplete with keyboard navigation.
//!
//! Free-text input becomes a throttled search query; candidates are
//! navigable with the arrow keys and committable by Enter or pointer
//! click. The pointer path races the input's blur on purpose: the hide
//! triggered by blur is deferred long enough for a click landing between
//! the two to commit first.

use std::cmp;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use inkstream_api::Client;

use crate::timer::Debouncer;
use crate::validation;

/// Quiet period after the last keystroke before a search goes out.
const DEBOUNCE: Duration = Duration::from_millis(200);
/// How long a blur-triggered hide waits for a pointer selection to land.
const BLUR_HIDE_DELAY: Duration = Duration::from_millis(200);
/// Default cap on committed tags.
pub const DEFAULT_MAX_TAGS: usize = 5;

/// Keys the controller interprets. Everything else is plain text input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Backspace,
}

struct TagInputState {
    input: String,
    suggestions: Vec<String>,
    /// Highlighted candidate; -1 means free text.
    selected: isize,
    visible: bool,
    focused: bool,
    committed: Vec<String>,
}

/// Point-in-time view of the controller for rendering and assertions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagInputSnapshot {
    pub input: String,
    pub suggestions: Vec<String>,
    pub selected: isize,
    pub visible: bool,
    pub committed: Vec<String>,
}

/// Tag input state machine for one form field.
pub struct TagInputController {
    client: Arc<Client>,
    state: Arc<Mutex<TagInputState>>,
    search_timer: Debouncer,
    blur_timer: Debouncer,
    max_tags: usize,
}

impl TagInputController {
    pub fn new(client: Arc<Client>) -> Self {
        Self::with_max_tags(client, DEFAULT_MAX_TAGS)
    }

    pub fn with_max_tags(client: Arc<Client>, max_tags: usize) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(TagInputState {
                input: String::new(),
                suggestions: Vec::new(),
                selected: -1,
                visible: false,
                focused: true,
                committed: Vec::new(),
            })),
            search_timer: Debouncer::new(),
            blur_timer: Debouncer::new(),
            max_tags,
        }
    }

    /// Records a keystroke. Any pending search is superseded; a new one is
    /// scheduled after the quiet period unless the input is empty, which
    /// clears the candidates immediately without touching the network.
    pub fn on_input(&self, text: &str) {
        let query = text.trim().to_string();
        {
            let mut state = self.lock_state();
            state.input = text.to_string();
            state.selected = -1;
            if query.is_empty() {
                state.suggestions.clear();
                state.visible = false;
                self.search_timer.cancel();
                return;
            }
            state.visible = true;
        }

        let client = Arc::clone(&self.client);
        let shared = Arc::clone(&self.state);
        self.search_timer.schedule(DEBOUNCE, move |token| async move {
            let result = client.search_tags(&query).await;
            // A keystroke during the request supersedes this search; its
            // result must not overwrite the newer one.
            if !token.is_current() {
                return;
            }
            let tags = match result {
                Ok(tags) => tags,
                Err(e) => {
                    tracing::debug!("tag search failed: {}", e);
                    return;
                }
            };
            let mut state = shared.lock().unwrap_or_else(|e| e.into_inner());
            let committed = state.committed.clone();
            state.suggestions = tags
                .into_iter()
                .filter(|tag| !committed.contains(tag))
                .collect();
            if state.focused && !state.suggestions.is_empty() {
                state.visible = true;
            }
        });
    }

    /// Keyboard state machine over the candidate list.
    pub fn on_key(&self, key: Key) {
        let mut state = self.lock_state();
        match key {
            Key::ArrowDown => {
                let last = state.suggestions.len() as isize - 1;
                state.selected = cmp::min(state.selected + 1, last);
            }
            Key::ArrowUp => {
                state.selected = cmp::max(state.selected - 1, -1);
            }
            Key::Escape => {
                state.visible = false;
            }
            Key::Backspace => {
                if state.input.is_empty() {
                    state.committed.pop();
                }
            }
            Key::Enter => {
                if state.committed.len() >= self.max_tags {
                    return;
                }
                let candidate = if state.selected >= 0 {
                    state.suggestions.get(state.selected as usize).cloned()
                } else {
                    let text = state.input.trim();
                    (!text.is_empty()).then(|| text.to_string())
                };
                if let Some(tag) = candidate {
                    self.commit_locked(&mut state, &tag);
                }
            }
        }
    }

    /// Commits a tag directly (pointer click on a chip source, tests).
    pub fn commit(&self, tag: &str) -> bool {
        let mut state = self.lock_state();
        self.commit_locked(&mut state, tag)
    }

    /// Pointer selection of the candidate at `index`. Works even when a
    /// blur-triggered hide is pending; that hide fires later against an
    /// already-cleared list.
    pub fn select(&self, index: usize) -> bool {
        let mut state = self.lock_state();
        match state.suggestions.get(index).cloned() {
            Some(tag) => self.commit_locked(&mut state, &tag),
            None => false,
        }
    }

    /// Removes a committed tag (chip close button).
    pub fn remove(&self, tag: &str) {
        self.lock_state().committed.retain(|t| t != tag);
    }

    pub fn on_focus(&self) {
        self.blur_timer.cancel();
        let mut state = self.lock_state();
        state.focused = true;
        if !state.suggestions.is_empty() && !state.input.trim().is_empty() {
            state.visible = true;
        }
    }

    /// The field lost focus. Hiding is deferred so a pointer selection
    /// that caused the blur can still land; with no selection in the
    /// window, the list hides as usual.
    pub fn on_blur(&self) {
        self.lock_state().focused = false;
        let shared = Arc::clone(&self.state);
        self.blur_timer.schedule(BLUR_HIDE_DELAY, move |_| async move {
            shared.lock().unwrap_or_else(|e| e.into_inner()).visible = false;
        });
    }

    pub fn snapshot(&self) -> TagInputSnapshot {
        let state = self.lock_state();
        TagInputSnapshot {
            input: state.input.clone(),
            suggestions: state.suggestions.clone(),
            selected: state.selected,
            visible: state.visible,
            committed: state.committed.clone(),
        }
    }

    pub fn committed(&self) -> Vec<String> {
        self.lock_state().committed.clone()
    }

    fn commit_locked(&self, state: &mut MutexGuard<'_, TagInputState>, tag: &str) -> bool {
        if state.committed.len() >= self.max_tags {
            return false;
        }
        // Unusable tags (empty, over-long) are a silent no-op, not an error.
        let added = match validation::validate_tag(tag) {
            Ok(normalized) if !state.committed.contains(&normalized) => {
                state.committed.push(normalized);
                true
            }
            _ => false,
        };
        state.input.clear();
        state.suggestions.clear();
        state.selected = -1;
        state.visible = false;
        self.search_timer.cancel();
        added
    }

    fn lock_state(&self) -> MutexGuard<'_, TagInputState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
