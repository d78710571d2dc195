//! Motion event coalescing.
//!
//! Pointer motion arrives far faster than a client can usefully react to it,
//! and only the latest position of the pointer over a window matters. When a
//! `MotionNotify` is dequeued, newer motion events for the same window are
//! pulled out of the queue and their time and position are folded into the
//! one being dispatched. Consumers see one callback per burst, carrying the
//! freshest position.
//!
//! # How It Works
//!
//! 1. Optionally round-trip with the server (`sync`) so motion generated up
//!    to now is buffered, then read whatever is available without blocking.
//! 2. Find the first queued `MotionNotify` for the same event window. Errors
//!    and events for other windows are skipped over and stay in place.
//! 3. If one is found, remove it, remember it and go back to step 1.
//!    Otherwise stop.
//!
//! Entries between the coalesced ones keep their relative order.

use crate::connection::Connection;
use crate::error::DispatchResult;
use crate::event::{Event, InputEvent, QueueEntry, Window};
use crate::queue::EventQueue;
use crate::reader;

/// Folds every queued motion event for `motion.event` into `motion`.
///
/// Returns the number of queued events that were absorbed. When it returns
/// zero, `motion` is untouched.
///
/// # Errors
///
/// Only fails if reading from the connection fails.
pub fn compress_motion<C>(
    connection: &mut C,
    queue: &mut EventQueue,
    motion: &mut InputEvent,
    sync: bool,
) -> DispatchResult<usize>
where
    C: Connection + ?Sized,
{
    let window = motion.event;
    let mut latest: Option<InputEvent> = None;
    let mut absorbed = 0;

    loop {
        if sync {
            connection.sync();
        }
        reader::read(connection, queue, false)?;

        let Some(index) = queue.position(|entry| is_motion_for(entry, window)) else {
            break;
        };
        if let Some(QueueEntry::Event(Event::MotionNotify(newer))) = queue.remove_at(index) {
            tracing::trace!(window = %window, time = newer.time, "coalesced motion event");
            latest = Some(newer);
            absorbed += 1;
        }
    }

    if let Some(newer) = latest {
        motion.take_position(&newer);
    }
    Ok(absorbed)
}

fn is_motion_for(entry: &QueueEntry, window: Window) -> bool {
    entry.as_event().and_then(Event::as_motion).is_some_and(|m| m.event == window)
}
