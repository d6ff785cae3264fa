//! Connector configuration types
//!
//! Every vendor shares one config shape. Configs are parsed from the raw
//! TOML values provided by the config crate.

use crate::error::ConnectorError;
use crate::filter::Filter;
use crate::resilience::ResilienceConfig;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Connector instance configuration
///
/// # Example
///
/// ```toml
/// [connectors.books_eu]
/// type = "zohobooks"
/// token = "1000.xxx"
/// base_url = "https://www.zohoapis.eu/books/v3"  # optional override
/// timeout_secs = 30                             # optional, request timeout
/// max_retries = 3                               # optional, retry attempts
///
/// [connectors.books_eu.default_filters]
/// organization_id = 10234695
///
/// [connectors.support]
/// type = "zendesk"
/// token = "xxx"
/// params = { subdomain = "acme" }   # fills {subdomain} in the base URL
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// API token or session key (optional for public endpoints)
    pub token: Option<String>,

    /// Base URL override (default: the vendor's)
    pub base_url: Option<String>,

    /// Values for `{placeholders}` in the base URL
    #[serde(deserialize_with = "scalar_map")]
    pub params: BTreeMap<String, String>,

    /// Filters sent with every call unless the caller overrides them
    #[serde(deserialize_with = "scalar_map")]
    pub default_filters: BTreeMap<String, String>,

    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// Maximum retry attempts for transient failures (default: 3)
    pub max_retries: u32,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: None,
            params: BTreeMap::new(),
            default_filters: BTreeMap::new(),
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl ConnectorConfig {
    /// Parse config from raw TOML value
    pub fn from_toml(value: &toml::Value) -> Result<Self, ConnectorError> {
        let config: ConnectorConfig = value
            .clone()
            .try_into()
            .map_err(|e: toml::de::Error| {
                ConnectorError::ConfigError(format!("Invalid connector config: {}", e))
            })?;

        if config.timeout_secs == 0 {
            return Err(ConnectorError::ConfigError(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(config)
    }

    /// Build resilience config from these settings
    pub fn resilience_config(&self) -> ResilienceConfig {
        ResilienceConfig {
            timeout_secs: self.timeout_secs,
            max_retries: self.max_retries,
            ..Default::default()
        }
    }

    /// Configured default filters as engine filters
    pub fn default_filter_list(&self) -> Vec<Filter> {
        self.default_filters
            .iter()
            .map(|(name, value)| Filter::eq(name.as_str(), value.as_str()))
            .collect()
    }
}

/// TOML scalars people write for ids: `organization_id = 10234695`
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Str(s) => s,
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn scalar_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Scalar>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(k, v)| (k, v.into())).collect())
}
