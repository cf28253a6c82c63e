//! CLI Common Utilities
//!
//! Shared configuration and path handling for command handlers.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{Config, ConfigLoader};
use crate::types::Result;

/// Resolve configuration for a command.
///
/// An explicit `--config` file replaces the global and project layers.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => {
            debug!("Using explicit config: {}", path.display());
            ConfigLoader::load_from_file(path)
        }
        None => ConfigLoader::load(),
    }
}

/// Project root argument, defaulting to the current directory
pub fn resolve_root(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| PathBuf::from("."))
}
