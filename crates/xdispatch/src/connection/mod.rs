//! The connection seam.
//!
//! The dispatch core never talks to a socket. It pulls already-decoded
//! entries through the [`Connection`] trait, which an X11 transport
//! implements on top of its own reply/event machinery.
//!
//! [`ReplayConnection`] is an in-memory implementation that serves a scripted
//! sequence of entries. The tests and the `xdispatch replay` command use it.

mod replay;

pub use replay::{ReplayConnection, ReplayScript};

use crate::event::QueueEntry;

/// Source of decoded events and errors for one X connection.
pub trait Connection {
    /// Blocks until an event or an error is available and returns it.
    ///
    /// Returning `None` breaks the contract: a healthy connection always
    /// produces one or the other. The reader reports it as
    /// [`DispatchError::EmptyBlockingRead`](crate::error::DispatchError::EmptyBlockingRead).
    fn wait_for_entry(&mut self) -> Option<QueueEntry>;

    /// Returns an entry that is already buffered, or `None` if nothing is
    /// available right now. Never blocks.
    fn poll_for_entry(&mut self) -> Option<QueueEntry>;

    /// Flushes pending requests and waits for a round trip, so everything
    /// the server generated up to now can be polled.
    fn sync(&mut self);
}

impl<C: Connection + ?Sized> Connection for Box<C> {
    fn wait_for_entry(&mut self) -> Option<QueueEntry> { (**self).wait_for_entry() }

    fn poll_for_entry(&mut self) -> Option<QueueEntry> { (**self).poll_for_entry() }

    fn sync(&mut self) { (**self).sync(); }
}
