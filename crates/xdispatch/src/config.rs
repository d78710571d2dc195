//! Dispatch configuration.
//!
//! The configuration file supports JSONC format (JSON with comments). It is
//! looked up in the user's config directory unless a path is given
//! explicitly. Every field has a default, so an empty object is valid.

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default name of the background loop thread.
pub const DEFAULT_THREAD_NAME: &str = "xdispatch-loop";

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error("No configuration file found. Expected at ~/.config/xdispatch/config.jsonc")]
    NotFound,
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tuning knobs for the event loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct DispatchConfig {
    /// Collapse bursts of `MotionNotify` events for the same window into one
    /// dispatch carrying the latest position.
    pub compress_motion: bool,

    /// Issue a round trip to the server before each coalescing scan so that
    /// motion events generated up to now are visible in the queue.
    pub sync_before_coalesce: bool,

    /// Name of the background thread started by `EventLoop::spawn_with_ping`.
    pub thread_name: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            compress_motion: true,
            sync_before_coalesce: true,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl DispatchConfig {
    /// Parses a JSONC document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the document is not valid JSON once
    /// comments are stripped.
    pub fn from_jsonc(source: &str) -> Result<Self, ConfigError> {
        let reader = json_comments::StripComments::new(source.as_bytes());
        Ok(serde_json::from_reader(reader)?)
    }

    /// Loads the configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file does not exist,
    /// `ConfigError::Io` if it cannot be read and `ConfigError::Parse` if it
    /// is not valid JSONC.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound);
        }
        let file = fs::File::open(path)?;
        // Strip comments from JSONC before parsing
        let reader = json_comments::StripComments::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Loads the configuration from the first existing default location.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no configuration file exists, or
    /// any error from [`DispatchConfig::from_path`].
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        for path in config_paths() {
            if path.exists() {
                let config = Self::from_path(&path)?;
                return Ok((config, path));
            }
        }

        Err(ConfigError::NotFound)
    }

    /// Loads the configuration from `path` (or the default locations), falling
    /// back to defaults when nothing usable is found.
    #[must_use]
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let result = path.map_or_else(
            || Self::load().map(|(config, _)| config),
            Self::from_path,
        );

        match result {
            Ok(config) => config,
            Err(ConfigError::NotFound) => {
                tracing::debug!("no configuration file found, using defaults");
                Self::default()
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load configuration, using defaults");
                Self::default()
            }
        }
    }

    /// Returns the JSON schema of the configuration file as pretty JSON.
    #[must_use]
    pub fn schema_json() -> String {
        let schema = schemars::schema_for!(DispatchConfig);
        serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Returns the possible configuration file paths in priority order.
///
/// The function checks the following locations:
/// 1. `$XDG_CONFIG_HOME/xdispatch/`
/// 2. `~/.config/xdispatch/`
/// 3. The platform config directory (`dirs::config_dir()`)
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut dirs_to_check = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        dirs_to_check.push(PathBuf::from(xdg_config).join("xdispatch"));
    }
    if let Some(home) = dirs::home_dir() {
        dirs_to_check.push(home.join(".config").join("xdispatch"));
    }
    if let Some(config_dir) = dirs::config_dir() {
        dirs_to_check.push(config_dir.join("xdispatch"));
    }

    let mut paths = Vec::new();
    for dir in dirs_to_check {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }
    paths
}
