//! Callback registry.
//!
//! The dispatcher only needs the [`CallbackLookup`] contract: given an event
//! kind and a window, return the callbacks to run in registration order, and
//! accept protocol errors. [`Registry`] is the thread-safe implementation
//! used by default.
//!
//! # Thread Safety
//!
//! Callbacks are stored in a `DashMap` keyed by `(kind, window)`. Lookups
//! clone the callback list out of the map, so no shard lock is held while
//! user code runs and callbacks may connect or detach other callbacks
//! (including themselves) during dispatch. Changes take effect from the next
//! lookup.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use parking_lot::RwLock;
use smallvec::SmallVec;

use crate::event::{Event, EventKind, ProtocolError, Window};

/// An event callback.
pub type Callback = Arc<dyn Fn(&Event) + Send + Sync>;

/// A protocol error handler.
pub type ErrorCallback = Arc<dyn Fn(&ProtocolError) + Send + Sync>;

/// Callbacks for one `(kind, window)` pair, in registration order.
pub type CallbackList = SmallVec<[Callback; 4]>;

/// Lookup contract consumed by the dispatcher.
pub trait CallbackLookup {
    /// Returns the callbacks bound to `(kind, window)` in registration order.
    fn lookup(&self, kind: EventKind, window: Window) -> CallbackList;

    /// Handles a protocol error taken off the queue.
    fn handle_error(&self, error: &ProtocolError);
}

/// Identifies one connected callback, for [`Registry::disconnect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(u64);

struct Binding {
    id: CallbackId,
    callback: Callback,
}

/// Thread-safe callback registry keyed by event kind and window.
pub struct Registry {
    bindings: DashMap<(EventKind, Window), SmallVec<[Binding; 4]>>,
    error_handler: RwLock<ErrorCallback>,
    next_id: AtomicU64,
}

impl Registry {
    /// Creates an empty registry with the default (logging) error handler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: DashMap::new(),
            error_handler: RwLock::new(default_error_handler()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Binds `callback` to events of `kind` targeted at `window`.
    ///
    /// Callbacks for the same pair run in the order they were connected.
    pub fn connect<F>(&self, kind: EventKind, window: Window, callback: F) -> CallbackId
    where F: Fn(&Event) + Send + Sync + 'static {
        let id = CallbackId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.bindings.entry((kind, window)).or_default().push(Binding {
            id,
            callback: Arc::new(callback),
        });
        tracing::trace!(%kind, %window, id = id.0, "connected callback");
        id
    }

    /// Removes one callback. Returns `false` if it was not connected.
    pub fn disconnect(&self, kind: EventKind, window: Window, id: CallbackId) -> bool {
        let Some(mut bindings) = self.bindings.get_mut(&(kind, window)) else {
            return false;
        };
        let before = bindings.len();
        bindings.retain(|binding| binding.id != id);
        let removed = bindings.len() != before;
        let now_empty = bindings.is_empty();
        drop(bindings);

        if now_empty {
            self.bindings.remove_if(&(kind, window), |_, list| list.is_empty());
        }
        removed
    }

    /// Removes every callback bound to `window`, for all kinds.
    pub fn detach(&self, window: Window) {
        self.bindings.retain(|(_, bound), _| *bound != window);
        tracing::trace!(%window, "detached window callbacks");
    }

    /// Returns `true` if at least one callback is bound to `(kind, window)`.
    #[must_use]
    pub fn is_connected(&self, kind: EventKind, window: Window) -> bool {
        self.bindings.get(&(kind, window)).is_some_and(|list| !list.is_empty())
    }

    /// Replaces the protocol error handler.
    pub fn set_error_handler<F>(&self, handler: F)
    where F: Fn(&ProtocolError) + Send + Sync + 'static {
        *self.error_handler.write() = Arc::new(handler);
    }
}

impl Default for Registry {
    fn default() -> Self { Self::new() }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("bindings", &self.bindings.len()).finish_non_exhaustive()
    }
}

impl CallbackLookup for Registry {
    fn lookup(&self, kind: EventKind, window: Window) -> CallbackList {
        self.bindings.get(&(kind, window)).map_or_else(SmallVec::new, |list| {
            list.iter().map(|binding| Arc::clone(&binding.callback)).collect()
        })
    }

    fn handle_error(&self, error: &ProtocolError) {
        let handler = Arc::clone(&*self.error_handler.read());
        handler(error);
    }
}

fn default_error_handler() -> ErrorCallback {
    Arc::new(|error: &ProtocolError| {
        tracing::error!(
            code = error.code,
            sequence = error.sequence,
            bad_value = error.bad_value,
            major_opcode = error.major_opcode,
            minor_opcode = error.minor_opcode,
            "protocol error: {error}"
        );
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::event::ExposeEvent;

    fn expose(window: u32) -> Event {
        Event::Expose(ExposeEvent {
            window: Window(window),
            ..ExposeEvent::default()
        })
    }

    fn run(registry: &Registry, kind: EventKind, window: Window, event: &Event) {
        for callback in registry.lookup(kind, window) {
            callback(event);
        }
    }

    #[test]
    fn test_lookup_empty() {
        let registry = Registry::new();
        assert!(registry.lookup(EventKind::Expose, Window(1)).is_empty());
        assert!(!registry.is_connected(EventKind::Expose, Window(1)));
    }

    #[test]
    fn test_callbacks_run_in_registration_order() {
        let registry = Registry::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let log = Arc::clone(&log);
            registry.connect(EventKind::Expose, Window(1), move |_| {
                log.lock().unwrap().push(tag);
            });
        }

        run(&registry, EventKind::Expose, Window(1), &expose(1));
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_lookup_is_keyed_by_kind_and_window() {
        let registry = Registry::new();
        registry.connect(EventKind::Expose, Window(1), |_| {});

        assert_eq!(registry.lookup(EventKind::Expose, Window(1)).len(), 1);
        assert!(registry.lookup(EventKind::Expose, Window(2)).is_empty());
        assert!(registry.lookup(EventKind::MapNotify, Window(1)).is_empty());
    }

    #[test]
    fn test_disconnect() {
        let registry = Registry::new();
        let keep = registry.connect(EventKind::Expose, Window(1), |_| {});
        let drop_me = registry.connect(EventKind::Expose, Window(1), |_| {});

        assert!(registry.disconnect(EventKind::Expose, Window(1), drop_me));
        assert!(!registry.disconnect(EventKind::Expose, Window(1), drop_me));
        assert_eq!(registry.lookup(EventKind::Expose, Window(1)).len(), 1);

        assert!(registry.disconnect(EventKind::Expose, Window(1), keep));
        assert!(!registry.is_connected(EventKind::Expose, Window(1)));
    }

    #[test]
    fn test_detach_removes_all_kinds_for_window() {
        let registry = Registry::new();
        registry.connect(EventKind::Expose, Window(1), |_| {});
        registry.connect(EventKind::ConfigureNotify, Window(1), |_| {});
        registry.connect(EventKind::Expose, Window(2), |_| {});

        registry.detach(Window(1));

        assert!(!registry.is_connected(EventKind::Expose, Window(1)));
        assert!(!registry.is_connected(EventKind::ConfigureNotify, Window(1)));
        assert!(registry.is_connected(EventKind::Expose, Window(2)));
    }

    #[test]
    fn test_callback_may_mutate_registry() {
        let registry = Arc::new(Registry::new());
        let inner = Arc::clone(&registry);
        registry.connect(EventKind::Expose, Window(1), move |_| {
            inner.detach(Window(1));
            inner.connect(EventKind::Expose, Window(2), |_| {});
        });

        run(&registry, EventKind::Expose, Window(1), &expose(1));

        assert!(!registry.is_connected(EventKind::Expose, Window(1)));
        assert!(registry.is_connected(EventKind::Expose, Window(2)));
    }

    #[test]
    fn test_custom_error_handler() {
        let registry = Registry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        registry.set_error_handler(move |err| sink.lock().unwrap().push(err.code));

        registry.handle_error(&ProtocolError { code: 3, ..ProtocolError::default() });
        registry.handle_error(&ProtocolError { code: 8, ..ProtocolError::default() });

        assert_eq!(*seen.lock().unwrap(), vec![3, 8]);
    }

    #[test]
    fn test_callback_ids_are_unique() {
        let registry = Registry::new();
        let a = registry.connect(EventKind::Expose, Window(1), |_| {});
        let b = registry.connect(EventKind::Expose, Window(2), |_| {});
        assert_ne!(a, b);
    }
}
