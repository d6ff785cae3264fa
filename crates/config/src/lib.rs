//! Conduit Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Every section is optional; an empty file is a valid config.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use conduit_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[connectors.files]\ntype = \"box\"").unwrap();
//! assert!(config.connectors.contains("files"));
//! ```
//!
//! # Example Config
//!
//! ```toml
//! [log]
//! level = "info"
//!
//! [connectors.books]
//! type = "zohobooks"
//! token = "1000.xxx"
//! default_filters = { organization_id = "10234695" }
//!
//! [connectors.support]
//! type = "zendesk"
//! token = "xxx"
//! params = { subdomain = "acme" }
//! timeout_secs = 10
//! ```

mod connectors;
mod error;
mod logging;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use connectors::{ConnectorsConfig, RawConnectorConfig};
pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogLevel};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Named connector instances
    pub connectors: ConnectorsConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or contains invalid TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Names of enabled connectors, sorted
    pub fn enabled_connectors(&self) -> Vec<&str> {
        self.connectors
            .iter()
            .filter(|(_, c)| c.is_enabled())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
