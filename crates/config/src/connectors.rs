//! Connector configuration types
//!
//! Named connector instances. Vendor-specific keys are parsed by the
//! connectors crate; this crate only knows `type` and `enabled`.
//!
//! # Example
//!
//! ```toml
//! [connectors.books]
//! type = "zohobooks"
//! token = "1000.xxx"
//! default_filters = { organization_id = "10234695" }
//!
//! [connectors.support]
//! type = "zendesk"
//! token = "xxx"
//! params = { subdomain = "acme" }
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;

/// Container for all connector configurations
///
/// Connectors are stored as a map of name -> raw config.
/// Each connector type parses its own config from the raw TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConnectorsConfig {
    /// Named connector instances
    #[serde(flatten)]
    connectors: BTreeMap<String, RawConnectorConfig>,
}

impl ConnectorsConfig {
    /// Get a connector config by name
    pub fn get(&self, name: &str) -> Option<&RawConnectorConfig> {
        self.connectors.get(name)
    }

    /// Check if a connector exists
    pub fn contains(&self, name: &str) -> bool {
        self.connectors.contains_key(name)
    }

    /// Iterate over all connectors, sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RawConnectorConfig)> {
        self.connectors.iter()
    }

    /// Get the number of configured connectors
    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    /// Check if no connectors are configured
    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    /// Get connectors filtered by type
    pub fn by_type(
        &self,
        connector_type: &str,
    ) -> impl Iterator<Item = (&String, &RawConnectorConfig)> {
        self.connectors
            .iter()
            .filter(move |(_, c)| c.connector_type.eq_ignore_ascii_case(connector_type))
    }
}

/// Raw connector configuration
///
/// Contains the connector type and raw config values.
/// Each connector implementation parses its specific config from `config`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConnectorConfig {
    /// Connector type (e.g., "zohobooks", "box")
    #[serde(rename = "type")]
    pub connector_type: String,

    /// Whether this connector is enabled
    /// Default: true
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Raw connector-specific configuration
    /// Parsed by the connector implementation
    #[serde(flatten)]
    pub config: toml::Value,
}

fn default_enabled() -> bool {
    true
}

impl RawConnectorConfig {
    /// Check if this connector is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_connectors() {
        let config: ConnectorsConfig = toml::from_str("").unwrap();
        assert!(config.is_empty());
        assert_eq!(config.len(), 0);
    }

    #[test]
    fn test_single_connector() {
        let toml = r#"
[books]
type = "zohobooks"
token = "abc"
"#;
        let config: ConnectorsConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.len(), 1);
        assert!(config.contains("books"));

        let connector = config.get("books").unwrap();
        assert_eq!(connector.connector_type, "zohobooks");
        assert!(connector.is_enabled());
        assert_eq!(
            connector.config.get("token").and_then(|v| v.as_str()),
            Some("abc")
        );
    }

    #[test]
    fn test_multiple_connectors() {
        let toml = r#"
[books_us]
type = "zohobooks"

[books_eu]
type = "zohobooks"
base_url = "https://www.zohoapis.eu/books/v3"

[files]
type = "box"
"#;
        let config: ConnectorsConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.len(), 3);
        assert_eq!(config.by_type("zohobooks").count(), 2);
        assert_eq!(config.by_type("BOX").count(), 1);

        let names: Vec<_> = config.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["books_eu", "books_us", "files"]);
    }

    #[test]
    fn test_disabled_connector() {
        let toml = r#"
[files_old]
type = "box"
enabled = false
"#;
        let config: ConnectorsConfig = toml::from_str(toml).unwrap();
        assert!(!config.get("files_old").unwrap().is_enabled());
    }

    #[test]
    fn test_nested_tables_kept_raw() {
        let toml = r#"
[support]
type = "zendesk"

[support.params]
subdomain = "acme"
"#;
        let config: ConnectorsConfig = toml::from_str(toml).unwrap();
        let connector = config.get("support").unwrap();
        let params = connector.config.get("params").unwrap();
        assert!(params.is_table());
    }

    #[test]
    fn test_missing_type_rejected() {
        let result: Result<ConnectorsConfig, _> = toml::from_str("[x]\ntoken = \"t\"");
        assert!(result.is_err());
    }
}
