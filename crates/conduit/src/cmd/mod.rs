//! Command implementations for the conduit CLI

pub mod connectors;
pub mod entities;
pub mod get;

use anyhow::{Context, Result};
use conduit_config::Config;
use std::path::Path;

/// Load the config file if one was given, otherwise use defaults
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}
