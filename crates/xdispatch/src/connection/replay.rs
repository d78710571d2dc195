//! Scripted in-memory connection.
//!
//! A replay serves entries from two sources:
//!
//! - `buffered`: entries that are already waiting at the transport level and
//!   can be polled immediately.
//! - `on_sync`: batches that "arrive" one at a time. Each `sync()` round trip
//!   releases the next batch into the buffer, and a blocking wait on an empty
//!   buffer releases one as well. This models events the server generates
//!   while the client is busy dispatching.
//!
//! Once both are exhausted a blocking wait returns `None`, which the reader
//! reports as a broken connection.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Connection;
use crate::error::DispatchResult;
use crate::event::QueueEntry;

/// A replay script as stored on disk (JSONC).
///
/// ```jsonc
/// {
///     "buffered": [
///         { "event": { "type": "motion_notify", "event": 42, "time": 1, "root_x": 10 } }
///     ],
///     "on_sync": [
///         [ { "event": { "type": "motion_notify", "event": 42, "time": 2, "root_x": 20 } } ]
///     ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayScript {
    pub buffered: Vec<QueueEntry>,
    pub on_sync: Vec<Vec<QueueEntry>>,
}

impl ReplayScript {
    /// Parses a JSONC script.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Script` if the document is not a valid script.
    pub fn from_jsonc(source: &str) -> DispatchResult<Self> {
        let reader = json_comments::StripComments::new(source.as_bytes());
        Ok(serde_json::from_reader(reader)?)
    }

    /// Reads and parses a JSONC script file.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Io` if the file cannot be read, or
    /// `DispatchError::Script` if it is not a valid script.
    pub fn from_path(path: &Path) -> DispatchResult<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_jsonc(&source)
    }

    /// Iterates over every entry of the script in arrival order.
    pub fn entries(&self) -> impl Iterator<Item = &QueueEntry> {
        self.buffered.iter().chain(self.on_sync.iter().flatten())
    }
}

/// A [`Connection`] that replays a fixed script.
#[derive(Debug, Default)]
pub struct ReplayConnection {
    buffered: VecDeque<QueueEntry>,
    pending: VecDeque<Vec<QueueEntry>>,
    syncs: usize,
}

impl ReplayConnection {
    /// Creates a connection with `entries` already buffered.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = QueueEntry>) -> Self {
        Self {
            buffered: entries.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Creates a connection from a parsed script.
    #[must_use]
    pub fn from_script(script: ReplayScript) -> Self {
        Self {
            buffered: script.buffered.into(),
            pending: script.on_sync.into(),
            syncs: 0,
        }
    }

    /// Adds a batch that becomes visible after the next round trip.
    #[must_use]
    pub fn then_on_sync(mut self, batch: impl IntoIterator<Item = QueueEntry>) -> Self {
        self.pending.push_back(batch.into_iter().collect());
        self
    }

    /// Number of `sync()` round trips performed so far.
    #[must_use]
    pub const fn sync_count(&self) -> usize { self.syncs }

    /// Returns `true` once every scripted entry has been handed out.
    ///
    /// Empty batches still waiting for a round trip count as handed out.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.buffered.is_empty() && self.pending.iter().all(Vec::is_empty)
    }

    fn release_batch(&mut self) -> bool {
        match self.pending.pop_front() {
            Some(batch) => {
                self.buffered.extend(batch);
                true
            }
            None => false,
        }
    }
}

impl Connection for ReplayConnection {
    fn wait_for_entry(&mut self) -> Option<QueueEntry> {
        while self.buffered.is_empty() {
            if !self.release_batch() {
                return None;
            }
        }
        self.buffered.pop_front()
    }

    fn poll_for_entry(&mut self) -> Option<QueueEntry> { self.buffered.pop_front() }

    fn sync(&mut self) {
        self.syncs += 1;
        self.release_batch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, ExposeEvent, Window};

    fn expose(window: u32) -> QueueEntry {
        QueueEntry::Event(Event::Expose(ExposeEvent {
            window: Window(window),
            ..ExposeEvent::default()
        }))
    }

    #[test]
    fn test_poll_drains_buffer_only() {
        let mut conn = ReplayConnection::new([expose(1)]).then_on_sync([expose(2)]);

        assert_eq!(conn.poll_for_entry(), Some(expose(1)));
        assert_eq!(conn.poll_for_entry(), None);
        assert!(!conn.is_exhausted());
    }

    #[test]
    fn test_sync_releases_next_batch() {
        let mut conn = ReplayConnection::default().then_on_sync([expose(2), expose(3)]);

        conn.sync();

        assert_eq!(conn.sync_count(), 1);
        assert_eq!(conn.poll_for_entry(), Some(expose(2)));
        assert_eq!(conn.poll_for_entry(), Some(expose(3)));
        assert!(conn.is_exhausted());
    }

    #[test]
    fn test_wait_releases_batches_until_exhausted() {
        let mut conn = ReplayConnection::default()
            .then_on_sync(Vec::<QueueEntry>::new())
            .then_on_sync([expose(9)]);

        assert_eq!(conn.wait_for_entry(), Some(expose(9)));
        assert_eq!(conn.wait_for_entry(), None);
    }

    #[test]
    fn test_empty_batches_do_not_count_as_pending() {
        let mut conn = ReplayConnection::new([expose(1)]).then_on_sync(Vec::<QueueEntry>::new());
        assert!(!conn.is_exhausted());

        assert_eq!(conn.poll_for_entry(), Some(expose(1)));
        assert!(conn.is_exhausted());
    }

    #[test]
    fn test_script_from_jsonc() {
        let script = ReplayScript::from_jsonc(
            r#"{
                // initial burst
                "buffered": [
                    { "event": { "type": "expose", "window": 1 } },
                    { "error": { "code": 3 } }
                ],
                "on_sync": [[ { "event": { "type": "expose", "window": 2 } } ]]
            }"#,
        )
        .unwrap();

        assert_eq!(script.buffered.len(), 2);
        assert_eq!(script.on_sync.len(), 1);
        assert_eq!(script.entries().count(), 3);

        let mut conn = ReplayConnection::from_script(script);
        assert_eq!(conn.poll_for_entry(), Some(expose(1)));
    }

    #[test]
    fn test_script_rejects_unknown_event_type() {
        let result = ReplayScript::from_jsonc(
            r#"{ "buffered": [ { "event": { "type": "warp_pointer" } } ] }"#,
        );
        assert!(result.is_err());
    }
}
