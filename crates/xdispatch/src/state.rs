//! Per-connection loop state.
//!
//! The shutdown flag, the key redirection target and the last-seen server
//! time belong to one connection. They live in a [`LoopState`] handle held by
//! the event loop instead of in globals, so independent connections can run
//! independent loops.
//!
//! The handle is cheap to clone; clones share the same state. Callbacks and
//! other threads use a clone to request shutdown or redirect key events.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::event::{Timestamp, Window};

#[derive(Debug, Default)]
struct Inner {
    quitting: AtomicBool,
    redirect_key: AtomicU32,
    last_time: AtomicU32,
}

/// Shared shutdown, redirection and timestamp state for one connection.
#[derive(Debug, Clone, Default)]
pub struct LoopState {
    inner: Arc<Inner>,
}

impl LoopState {
    /// Creates a fresh state: not quitting, no redirection, time zero.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Requests shutdown.
    ///
    /// Observed before the next loop iteration and before the next queue
    /// entry is dispatched. A callback that is already running is not
    /// interrupted.
    pub fn quit(&self) {
        tracing::debug!("event loop shutdown requested");
        self.inner.quitting.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`LoopState::quit`] has been called.
    #[must_use]
    pub fn is_quitting(&self) -> bool { self.inner.quitting.load(Ordering::SeqCst) }

    /// Redirects all key press/release events to `window`, or clears the
    /// redirection with `None`.
    pub fn set_redirect_key(&self, window: Option<Window>) {
        let id = window.map_or(0, |w| w.0);
        self.inner.redirect_key.store(id, Ordering::SeqCst);
    }

    /// Returns the active key redirection target.
    #[must_use]
    pub fn redirect_key(&self) -> Option<Window> {
        match self.inner.redirect_key.load(Ordering::SeqCst) {
            0 => None,
            id => Some(Window(id)),
        }
    }

    /// Records the last server time seen on an event.
    pub fn set_time(&self, time: Timestamp) { self.inner.last_time.store(time, Ordering::SeqCst); }

    /// Returns the last server time seen on an event (0 before any).
    #[must_use]
    pub fn time(&self) -> Timestamp { self.inner.last_time.load(Ordering::SeqCst) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = LoopState::new();
        assert!(!state.is_quitting());
        assert_eq!(state.redirect_key(), None);
        assert_eq!(state.time(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let state = LoopState::new();
        let handle = state.clone();

        handle.quit();
        handle.set_time(1234);

        assert!(state.is_quitting());
        assert_eq!(state.time(), 1234);
    }

    #[test]
    fn test_redirect_key() {
        let state = LoopState::new();

        state.set_redirect_key(Some(Window(0x20_0001)));
        assert_eq!(state.redirect_key(), Some(Window(0x20_0001)));

        state.set_redirect_key(None);
        assert_eq!(state.redirect_key(), None);
    }

    #[test]
    fn test_redirect_to_none_window_is_no_redirect() {
        let state = LoopState::new();
        state.set_redirect_key(Some(Window::NONE));
        assert_eq!(state.redirect_key(), None);
    }

    #[test]
    fn test_independent_states_do_not_interfere() {
        let first = LoopState::new();
        let second = LoopState::new();

        first.quit();

        assert!(first.is_quitting());
        assert!(!second.is_quitting());
    }
}
