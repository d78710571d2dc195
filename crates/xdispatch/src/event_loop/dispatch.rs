//! Queue draining and per-event routing.

use super::{Drain, EventLoop};
use crate::coalesce;
use crate::connection::Connection;
use crate::error::DispatchResult;
use crate::event::{Event, QueueEntry};
use crate::registry::CallbackLookup;

impl<C, R> EventLoop<C, R>
where
    C: Connection,
    R: CallbackLookup,
{
    /// Dispatches queued entries until the queue is empty, shutdown is
    /// requested or the ping receiver goes away.
    ///
    /// With a ping sender, one signal is sent right before each entry is
    /// dequeued, so the receiver always observes the ping before the
    /// callbacks for that entry run.
    pub(super) fn process_queue(
        &mut self,
        ping: Option<&flume::Sender<()>>,
    ) -> DispatchResult<Drain> {
        loop {
            if self.state.is_quitting() {
                return Ok(Drain::Quit);
            }
            if self.queue.is_empty() {
                return Ok(Drain::Empty);
            }
            if ping.is_some_and(|ping| ping.send(()).is_err()) {
                return Ok(Drain::PingClosed);
            }

            let Some(entry) = self.queue.dequeue() else {
                return Ok(Drain::Empty);
            };
            match entry {
                QueueEntry::Error(error) => self.registry.handle_error(&error),
                QueueEntry::Event(event) => self.dispatch_event(event)?,
            }
        }
    }

    fn dispatch_event(&mut self, mut event: Event) -> DispatchResult<()> {
        let Some(kind) = event.kind() else {
            if let Event::Unsupported { code } = event {
                tracing::warn!(code, "unsupported event type, skipping");
            }
            return Ok(());
        };

        match &mut event {
            Event::KeyPress(key) | Event::KeyRelease(key) => {
                if let Some(window) = self.state.redirect_key() {
                    key.event = window;
                }
            }
            Event::MotionNotify(motion) if self.config.compress_motion => {
                coalesce::compress_motion(
                    &mut self.connection,
                    &mut self.queue,
                    motion,
                    self.config.sync_before_coalesce,
                )?;
            }
            _ => {}
        }

        if let Some(time) = event.time() {
            self.state.set_time(time);
        }

        let targets = event.targets();
        tracing::trace!(%kind, ?targets, "dispatching event");

        for window in targets {
            for callback in self.registry.lookup(kind, window) {
                callback(&event);
            }
        }
        Ok(())
    }
}
