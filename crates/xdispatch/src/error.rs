//! Error types for the dispatch core.
//!
//! Protocol errors reported by the server are *not* represented here: they
//! are queue entries routed to the registry's error handler. `DispatchError`
//! covers the conditions that stop an event loop or a CLI command.
//!
//! # Example
//!
//! ```rust,ignore
//! use xdispatch::error::{DispatchError, DispatchResult};
//!
//! fn pump(event_loop: &mut EventLoop<MyConnection>) -> DispatchResult<()> {
//!     event_loop.read_now(true)?;
//!     event_loop.drain_once()
//! }
//! ```

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors that stop the event loop or a command.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The connection's blocking fetch returned neither an event nor an error.
    ///
    /// The transport guarantees one or the other while it is healthy, so this
    /// means the connection is gone or its contract is broken. The loop
    /// stops; whether to reconnect is the caller's decision.
    #[error("blocking read returned neither an event nor an error")]
    EmptyBlockingRead,

    /// The background loop thread could not be started.
    #[error("failed to spawn event loop thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),

    /// A callback panicked on the background loop thread.
    #[error("event loop thread panicked")]
    LoopPanicked,

    /// Loading the dispatch configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A replay script could not be read.
    #[error("failed to read replay script: {0}")]
    Io(#[from] std::io::Error),

    /// A replay script is not valid JSON.
    #[error("invalid replay script: {0}")]
    Script(#[from] serde_json::Error),
}

impl DispatchError {
    /// Returns `true` if the connection broke its fetch contract.
    #[must_use]
    pub const fn is_transport_violation(&self) -> bool { matches!(self, Self::EmptyBlockingRead) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_blocking_read_display() {
        let err = DispatchError::EmptyBlockingRead;
        assert_eq!(
            err.to_string(),
            "blocking read returned neither an event nor an error"
        );
        assert!(err.is_transport_violation());
    }

    #[test]
    fn test_thread_spawn_keeps_source() {
        let io_err = std::io::Error::other("no threads left");
        let err = DispatchError::ThreadSpawn(io_err);
        assert!(err.to_string().contains("no threads left"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_transport_violation());
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "script.jsonc");
        let err: DispatchError = io_err.into();
        assert!(matches!(err, DispatchError::Io(_)));
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: DispatchError = ConfigError::NotFound.into();
        assert_eq!(err.to_string(), ConfigError::NotFound.to_string());
    }

    #[test]
    fn test_script_error_from_conversion() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: DispatchError = json_err.into();
        assert!(err.to_string().starts_with("invalid replay script"));
    }
}
