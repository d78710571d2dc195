//! The per-connection event queue.
//!
//! Entries are appended by the reader and removed by the dispatcher. Removal
//! is normally from the head, but motion coalescing removes superseded
//! `MotionNotify` entries from the middle, so the queue is index addressable.

use std::collections::VecDeque;
use std::collections::vec_deque;

use crate::event::QueueEntry;

/// Ordered, unbounded buffer of events and errors read from a connection.
#[derive(Debug, Default)]
pub struct EventQueue {
    entries: VecDeque<QueueEntry>,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Appends an entry to the tail.
    pub fn enqueue(&mut self, entry: impl Into<QueueEntry>) { self.entries.push_back(entry.into()); }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    /// Removes and returns the head entry.
    ///
    /// Returns `None` on an empty queue; callers check [`EventQueue::is_empty`]
    /// first.
    pub fn dequeue(&mut self) -> Option<QueueEntry> { self.entries.pop_front() }

    /// Read-only view of the queued entries, head first.
    pub fn peek(&self) -> vec_deque::Iter<'_, QueueEntry> { self.entries.iter() }

    /// Index of the first entry matching `predicate`.
    pub fn position<P>(&self, predicate: P) -> Option<usize>
    where P: FnMut(&QueueEntry) -> bool {
        self.entries.iter().position(predicate)
    }

    /// Removes the entry at `index`, shifting later entries forward.
    pub fn remove_at(&mut self, index: usize) -> Option<QueueEntry> { self.entries.remove(index) }
}
