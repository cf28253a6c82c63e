//! Config Command
//!
//! Usage:
//!   documentor config show [-f toml|json|yaml]
//!   documentor config path
//!   documentor config init [--force]

use std::path::Path;

use crate::cli::Output;
use crate::config::{Config, ConfigFormat, ConfigLoader};
use crate::types::Result;

/// Print the effective (merged) configuration
pub fn show(config: &Config, format: ConfigFormat) -> Result<()> {
    println!("{}", ConfigLoader::render(config, format)?);
    Ok(())
}

/// Print configuration file locations
pub fn path() -> Result<()> {
    let out = Output::new();
    out.section("Configuration paths");
    for (label, path) in ConfigLoader::paths() {
        match path {
            Some(path) => out.path_status(label, &path),
            None => out.field(label, "(not available)"),
        }
    }
    Ok(())
}

/// Write the project config template in `root`
pub fn init(root: &Path, force: bool) -> Result<()> {
    let path = ConfigLoader::init_project(root, force)?;
    let out = Output::new();
    out.success("Initialized project configuration");
    out.field("Config", path.display());
    Ok(())
}
