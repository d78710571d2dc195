//! xdispatch - event dispatch core for X11 client libraries.
//!
//! This crate sits between a connection that decodes wire events and the
//! code that reacts to them. It provides:
//!
//! - An ordered [`EventQueue`] of decoded events and protocol errors.
//! - A reader that pulls everything the connection has buffered into the queue.
//! - A dispatcher that routes each event to the callbacks bound to its
//!   `(kind, window)` pair, with key redirection and motion coalescing.
//! - An [`EventLoop`] that runs on the calling thread or on a background
//!   thread with a rendezvous ping channel.
//!
//! The transport is abstracted by the [`Connection`] trait. The bundled
//! [`ReplayConnection`] serves scripted entries and backs the `xdispatch`
//! binary and the tests.

pub mod cli;
pub mod coalesce;
pub mod config;
pub mod connection;
pub mod error;
pub mod event;
pub mod event_loop;
pub mod queue;
pub mod reader;
pub mod registry;
pub mod state;

pub use config::DispatchConfig;
pub use connection::{Connection, ReplayConnection, ReplayScript};
pub use error::{DispatchError, DispatchResult};
pub use event::{Event, EventKind, ProtocolError, QueueEntry, Timestamp, Window};
pub use event_loop::{EventLoop, PingChannel};
pub use queue::EventQueue;
pub use registry::{Callback, CallbackId, CallbackLookup, Registry};
pub use state::LoopState;
