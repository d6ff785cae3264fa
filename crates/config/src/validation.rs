//! Configuration validation
//!
//! Checks that go beyond what serde can express. Vendor-specific checks
//! (unknown connector types, base URL params) happen when the connector is
//! built, since this crate does not know which vendors are compiled in.

use crate::Config;
use crate::error::{ConfigError, Result};

/// Validate the complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_connectors(config)?;
    Ok(())
}

fn validate_connectors(config: &Config) -> Result<()> {
    for (name, connector) in config.connectors.iter() {
        if name.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "connector",
                name.as_str(),
                "name",
                "must not be blank",
            ));
        }
        if connector.connector_type.trim().is_empty() {
            return Err(ConfigError::missing_field("connector", name.as_str(), "type"));
        }
    }
    Ok(())
}
