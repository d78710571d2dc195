//! Background event loop with a ping channel.

use std::thread::{self, JoinHandle};

use super::EventLoop;
use crate::connection::Connection;
use crate::error::{DispatchError, DispatchResult};
use crate::registry::CallbackLookup;

/// Receiving end of a loop started with [`EventLoop::spawn_with_ping`].
///
/// The loop sends one `()` right before it dequeues each entry and blocks
/// until it is received. Dropping the channel (or calling
/// [`PingChannel::join`]) stops the loop at its next ping.
#[derive(Debug)]
pub struct PingChannel {
    receiver: flume::Receiver<()>,
    handle: JoinHandle<DispatchResult<()>>,
}

impl PingChannel {
    /// The raw receiver, for use in a `flume::Selector` or async code.
    pub const fn receiver(&self) -> &flume::Receiver<()> { &self.receiver }

    /// Waits for the next ping. Returns `false` once the loop has exited.
    pub fn recv(&self) -> bool { self.receiver.recv().is_ok() }

    /// Stops listening for pings and waits for the loop thread to exit.
    ///
    /// The loop notices at its next ping attempt. A loop parked in a
    /// blocking read only exits once an entry arrives, or immediately if
    /// [`LoopState::quit`](crate::LoopState::quit) was called and it is
    /// between iterations.
    ///
    /// # Errors
    ///
    /// Returns the error the loop stopped with, or
    /// [`DispatchError::LoopPanicked`] if a callback panicked.
    pub fn join(self) -> DispatchResult<()> {
        drop(self.receiver);
        self.handle.join().map_err(|_| DispatchError::LoopPanicked)?
    }
}

impl<C, R> EventLoop<C, R>
where
    C: Connection + Send + 'static,
    R: CallbackLookup + Send + Sync + 'static,
{
    /// Runs the loop on a named background thread and returns its ping
    /// channel.
    ///
    /// The channel has no buffer: the loop does not advance past a ping
    /// until the receiver takes it.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::ThreadSpawn`] if the thread cannot be started.
    pub fn spawn_with_ping(mut self) -> DispatchResult<PingChannel> {
        let (sender, receiver) = flume::bounded(0);
        let thread_name = self.config.thread_name.clone();

        let handle = thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                let result = self.main_loop(Some(&sender));
                if let Err(err) = &result {
                    tracing::error!(error = %err, "event loop exited");
                }
                result
            })
            .map_err(DispatchError::ThreadSpawn)?;

        tracing::debug!(thread = %thread_name, "spawned event loop thread");
        Ok(PingChannel { receiver, handle })
    }
}
