//! Replay command.
//!
//! Runs a [`ReplayScript`] through a real [`EventLoop`] and records every
//! callback invocation and protocol error, in the order they happened.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::config::DispatchConfig;
use crate::connection::{ReplayConnection, ReplayScript};
use crate::error::DispatchResult;
use crate::event::{Event, EventKind, ProtocolError, Timestamp, Window};
use crate::event_loop::EventLoop;
use crate::registry::Registry;
use crate::state::LoopState;

/// One line of the dispatch log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Record {
    /// A callback ran for `kind` on `window`.
    Callback {
        kind: EventKind,
        window: Window,
        time: Option<Timestamp>,
        position: Option<(i16, i16)>,
    },
    /// The error handler received a protocol error.
    Error { error: ProtocolError, message: String },
}

type Log = Arc<Mutex<Vec<Record>>>;

/// Replays `script` and returns what was dispatched.
///
/// Every `(kind, target)` pair of the script's events gets one recording
/// callback, and key events get one on the redirect window as well. The loop
/// runs until the script is exhausted and the queue is drained.
///
/// # Errors
///
/// Only fails if the loop reports a broken connection.
pub fn replay(
    script: ReplayScript,
    config: DispatchConfig,
    redirect_key: Option<Window>,
) -> DispatchResult<Vec<Record>> {
    let registry = Arc::new(Registry::new());
    let log = Log::default();

    for event in script.entries().filter_map(|entry| entry.as_event()) {
        let Some(kind) = event.kind() else { continue };
        for window in event.targets() {
            bind_recorder(&registry, &log, kind, window);
        }
        if let (Some(window), EventKind::KeyPress | EventKind::KeyRelease) = (redirect_key, kind) {
            bind_recorder(&registry, &log, kind, window);
        }
    }

    let sink = Arc::clone(&log);
    registry.set_error_handler(move |error| {
        tracing::debug!(%error, "protocol error");
        sink.lock().push(Record::Error { error: *error, message: error.to_string() });
    });

    let state = LoopState::new();
    state.set_redirect_key(redirect_key);

    let connection = ReplayConnection::from_script(script);
    let mut event_loop = EventLoop::new(connection, registry, state.clone()).with_config(config);

    // `run` would block on the exhausted script; pump until it is drained.
    while !event_loop.connection().is_exhausted() && !state.is_quitting() {
        event_loop.read_now(true)?;
        event_loop.drain_once()?;
    }

    tracing::debug!(
        syncs = event_loop.connection().sync_count(),
        last_time = state.time(),
        "replay finished"
    );

    let records = std::mem::take(&mut *log.lock());
    Ok(records)
}

fn bind_recorder(registry: &Registry, log: &Log, kind: EventKind, window: Window) {
    if registry.is_connected(kind, window) {
        return;
    }
    let log = Arc::clone(log);
    registry.connect(kind, window, move |event| {
        log.lock().push(Record::Callback {
            kind,
            window,
            time: event.time(),
            position: position(event),
        });
    });
}

const fn position(event: &Event) -> Option<(i16, i16)> {
    match event {
        Event::KeyPress(e)
        | Event::KeyRelease(e)
        | Event::ButtonPress(e)
        | Event::ButtonRelease(e)
        | Event::MotionNotify(e) => Some((e.root_x, e.root_y)),
        Event::EnterNotify(e) | Event::LeaveNotify(e) => Some((e.root_x, e.root_y)),
        _ => None,
    }
}
