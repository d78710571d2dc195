//! The main event loop.
//!
//! An [`EventLoop`] owns one connection and its event queue. It alternates
//! between blocking until the queue has something in it and draining the
//! queue completely, until its [`LoopState`] is told to quit.
//!
//! - [`EventLoop::run`] runs the loop on the calling thread.
//! - [`EventLoop::spawn_with_ping`] runs it on a named background thread and
//!   hands back a [`PingChannel`] that receives one signal right before each
//!   entry is dequeued. Because the channel has no buffer, the loop only
//!   advances as fast as the receiver takes pings, which makes it easy to
//!   fold X events into a `select` over other input sources.
//! - [`EventLoop::read_now`] and [`EventLoop::drain_once`] expose the two
//!   halves for callers that drive the loop themselves.
//!
//! Only one loop may run per connection. Ownership enforces this: the loop
//! owns the connection, and both entry points need `&mut self` or `self`.
//! Loops over different connections are independent.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use xdispatch::{EventKind, EventLoop, LoopState, Registry, Window};
//!
//! let registry = Arc::new(Registry::new());
//! let state = LoopState::new();
//!
//! registry.connect(EventKind::MapRequest, root, |event| manage(event));
//!
//! let ping = EventLoop::new(connection, Arc::clone(&registry), state.clone())
//!     .spawn_with_ping()?;
//!
//! loop {
//!     flume::Selector::new()
//!         .recv(ping.receiver(), |_| {})
//!         .recv(&ipc_commands, |cmd| handle(cmd))
//!         .wait();
//! }
//! ```

mod dispatch;
mod ping;

use std::sync::Arc;

pub use ping::PingChannel;

use crate::config::DispatchConfig;
use crate::connection::Connection;
use crate::error::DispatchResult;
use crate::queue::EventQueue;
use crate::reader;
use crate::registry::{CallbackLookup, Registry};
use crate::state::LoopState;

/// How a queue drain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drain {
    /// Every entry was dispatched.
    Empty,
    /// Shutdown was requested before the queue was empty.
    Quit,
    /// The ping receiver is gone.
    PingClosed,
}

/// Event loop for one connection.
pub struct EventLoop<C, R = Registry> {
    connection: C,
    registry: Arc<R>,
    state: LoopState,
    config: DispatchConfig,
    queue: EventQueue,
}

impl<C, R> EventLoop<C, R>
where
    C: Connection,
    R: CallbackLookup,
{
    /// Creates a loop with the default configuration and an empty queue.
    pub fn new(connection: C, registry: Arc<R>, state: LoopState) -> Self {
        Self {
            connection,
            registry,
            state,
            config: DispatchConfig::default(),
            queue: EventQueue::new(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    pub const fn state(&self) -> &LoopState { &self.state }

    pub const fn registry(&self) -> &Arc<R> { &self.registry }

    pub const fn config(&self) -> &DispatchConfig { &self.config }

    pub const fn connection(&self) -> &C { &self.connection }

    pub const fn connection_mut(&mut self) -> &mut C { &mut self.connection }

    /// Entries read but not yet dispatched.
    pub const fn queue(&self) -> &EventQueue { &self.queue }

    /// Reads entries from the connection into the queue without dispatching.
    ///
    /// See [`reader::read`] for the blocking semantics.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::EmptyBlockingRead` if a blocking read comes
    /// back empty.
    pub fn read_now(&mut self, block: bool) -> DispatchResult<usize> {
        reader::read(&mut self.connection, &mut self.queue, block)
    }

    /// Dispatches every queued entry, stopping early if shutdown is requested.
    ///
    /// # Errors
    ///
    /// Only fails if reading from the connection during motion coalescing
    /// fails.
    pub fn drain_once(&mut self) -> DispatchResult<()> {
        self.process_queue(None)?;
        Ok(())
    }

    /// Runs the loop on the current thread until shutdown is requested.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::EmptyBlockingRead` if the connection stops
    /// producing entries.
    pub fn run(&mut self) -> DispatchResult<()> { self.main_loop(None) }

    fn main_loop(&mut self, ping: Option<&flume::Sender<()>>) -> DispatchResult<()> {
        tracing::debug!(ping = ping.is_some(), "event loop started");

        loop {
            if self.state.is_quitting() {
                tracing::debug!("event loop stopped: shutdown requested");
                return Ok(());
            }

            // Gobble up as many entries as possible, blocking if there are none.
            self.read_now(true)?;

            if self.process_queue(ping)? == Drain::PingClosed {
                tracing::debug!("event loop stopped: ping receiver dropped");
                return Ok(());
            }
        }
    }
}
