//! CLI module for xdispatch.
//!
//! The binary replays scripted event streams through the event loop and
//! reports what was dispatched. It also prints the configuration schema and
//! shell completions.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;
pub use commands::replay::{Record, replay};
use tracing_subscriber::EnvFilter;

use crate::error::DispatchResult;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "XDISPATCH_LOG";

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> DispatchResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.execute()
}

/// Installs the stderr log subscriber.
///
/// Without `-v` the filter comes from `XDISPATCH_LOG`, defaulting to `info`.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // A subscriber may already be installed when embedded in another binary.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}
