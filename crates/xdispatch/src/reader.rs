//! Pulls entries from a connection into the event queue.

use crate::connection::Connection;
use crate::error::{DispatchError, DispatchResult};
use crate::queue::EventQueue;

/// Reads every available entry from `connection` into `queue`.
///
/// With `block` set, waits for at least one entry first. Either way it then
/// polls until the connection has nothing buffered. Returns the number of
/// entries queued; `read(.., false)` with nothing pending queues nothing and
/// returns `Ok(0)`.
///
/// # Errors
///
/// Returns [`DispatchError::EmptyBlockingRead`] if the blocking wait comes
/// back empty-handed.
pub fn read<C>(connection: &mut C, queue: &mut EventQueue, block: bool) -> DispatchResult<usize>
where C: Connection + ?Sized {
    let mut count = 0;

    if block {
        let Some(entry) = connection.wait_for_entry() else {
            tracing::error!("connection returned neither an event nor an error while blocking");
            return Err(DispatchError::EmptyBlockingRead);
        };
        queue.enqueue(entry);
        count += 1;
    }

    while let Some(entry) = connection.poll_for_entry() {
        queue.enqueue(entry);
        count += 1;
    }

    if count > 0 {
        tracing::trace!(count, queued = queue.len(), "read entries from connection");
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ReplayConnection;
    use crate::event::{Event, ExposeEvent, ProtocolError, QueueEntry, Window};

    fn expose(window: u32) -> QueueEntry {
        QueueEntry::Event(Event::Expose(ExposeEvent {
            window: Window(window),
            ..ExposeEvent::default()
        }))
    }

    #[test]
    fn test_blocking_read_gets_at_least_one() {
        let mut conn = ReplayConnection::default().then_on_sync([expose(1)]);
        let mut queue = EventQueue::new();

        let count = read(&mut conn, &mut queue, true).unwrap();

        assert_eq!(count, 1);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_read_drains_transport_buffer() {
        let mut conn = ReplayConnection::new([
            expose(1),
            ProtocolError::default().into(),
            expose(2),
        ]);
        let mut queue = EventQueue::new();

        assert_eq!(read(&mut conn, &mut queue, false).unwrap(), 3);
        let order: Vec<_> = queue.peek().cloned().collect();
        assert_eq!(order[0], expose(1));
        assert!(order[1].is_error());
        assert_eq!(order[2], expose(2));
    }

    #[test]
    fn test_non_blocking_read_with_nothing_pending_is_noop() {
        let mut conn = ReplayConnection::default();
        let mut queue = EventQueue::new();
        queue.enqueue(expose(5));

        assert_eq!(read(&mut conn, &mut queue, false).unwrap(), 0);
        assert_eq!(read(&mut conn, &mut queue, false).unwrap(), 0);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.dequeue(), Some(expose(5)));
    }

    #[test]
    fn test_non_blocking_read_does_not_wait_for_batches() {
        let mut conn = ReplayConnection::default().then_on_sync([expose(1)]);
        let mut queue = EventQueue::new();

        assert_eq!(read(&mut conn, &mut queue, false).unwrap(), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_empty_blocking_read_is_an_error() {
        let mut conn = ReplayConnection::default();
        let mut queue = EventQueue::new();

        let err = read(&mut conn, &mut queue, true).unwrap_err();
        assert!(err.is_transport_violation());
        assert!(queue.is_empty());
    }
}
