//! CLI command definitions using Clap.
//!
//! - `replay` - Run a scripted event stream through the event loop
//! - `schema` - Print the configuration JSON Schema
//! - `completions` - Generate shell completions

use std::io;
use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};

use super::output;
use crate::config::DispatchConfig;
use crate::connection::ReplayScript;
use crate::error::DispatchResult;
use crate::event::Window;

pub mod replay;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// xdispatch CLI - replay decoded X11 event streams through the dispatch core.
#[derive(Parser, Debug)]
#[command(name = "xdispatch")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    ///
    /// Without it, the `XDISPATCH_LOG` environment variable sets the filter.
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a JSONC event script through the event loop.
    ///
    /// Registers a recording callback for every window the script's events
    /// target, runs the loop until the script is exhausted and prints every
    /// callback invocation and protocol error in dispatch order.
    Replay {
        /// Path to the replay script.
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Redirect key press/release events to this window id.
        ///
        /// Accepts decimal or `0x`-prefixed hex.
        #[arg(long, short, value_name = "WINDOW", value_parser = parse_window)]
        redirect_key: Option<Window>,

        /// Print the dispatch log as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Output the configuration JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the structure of the
    /// configuration file. Can be redirected to a file for use with editors
    /// that support JSON Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(xdispatch completions --shell zsh)"
    ///   xdispatch completions --shell fish > ~/.config/fish/completions/xdispatch.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or the script cannot be loaded,
    /// or if the replay stops on a broken connection.
    pub fn execute(&self) -> DispatchResult<()> {
        match &self.command {
            Commands::Replay { script, redirect_key, json } => {
                let config = self.load_config()?;
                let script = ReplayScript::from_path(script)?;
                let records = replay::replay(script, config, *redirect_key)?;
                if *json {
                    output::print_records_json(&records);
                } else {
                    output::print_records_table(&records);
                }
                Ok(())
            }
            Commands::Schema => {
                println!("{}", DispatchConfig::schema_json());
                Ok(())
            }
            Commands::Completions { shell } => {
                generate(*shell, &mut Self::command(), "xdispatch", &mut io::stdout());
                Ok(())
            }
        }
    }

    /// An explicit `--config` must exist; otherwise fall back to the search
    /// paths and then to defaults.
    fn load_config(&self) -> DispatchResult<DispatchConfig> {
        match self.config.as_deref() {
            Some(path) => Ok(DispatchConfig::from_path(path)?),
            None => Ok(DispatchConfig::load_or_default(None)),
        }
    }
}

fn parse_window(value: &str) -> Result<Window, String> {
    let parsed = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")).map_or_else(
        || value.parse::<u32>(),
        |hex| u32::from_str_radix(hex, 16),
    );
    parsed.map(Window).map_err(|err| format!("invalid window id '{value}': {err}"))
}
