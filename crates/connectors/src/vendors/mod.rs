//! Vendor profiles
//!
//! A profile is everything vendor-specific: the entity catalog, the base
//! URL, how the token is attached and how paging works. The engine itself
//! is the same [`RestConnector`] for all of them.

use crate::catalog::EntityCatalog;
use crate::config::ConnectorConfig;
use crate::connector::RestConnector;
use crate::error::ConnectorError;
use crate::filter::QueryMap;
use crate::pagination::PagingStrategy;
use crate::template::{placeholders, resolve_template};
use crate::transport::{AuthScheme, HttpTransport, Transport};
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "box")]
pub mod boxcloud;
#[cfg(feature = "mailchimp")]
pub mod mailchimp;
#[cfg(feature = "mediafire")]
pub mod mediafire;
#[cfg(feature = "opencart")]
pub mod opencart;
#[cfg(feature = "zendesk")]
pub mod zendesk;
#[cfg(feature = "zohobooks")]
pub mod zohobooks;

/// Static description of one vendor
#[derive(Debug)]
pub struct VendorProfile {
    /// Connector type name used in config and on the CLI
    pub name: &'static str,
    /// Default base URL; may contain `{placeholders}` filled from config params
    pub base_url: &'static str,
    pub auth: AuthScheme,
    pub paging: Option<PagingStrategy>,
    catalog: fn() -> Arc<EntityCatalog>,
}

impl VendorProfile {
    /// Shared, lazily built catalog
    pub fn catalog(&self) -> Arc<EntityCatalog> {
        (self.catalog)()
    }

    /// Params the default base URL needs (e.g. `subdomain`)
    pub fn base_url_params(&self) -> Vec<&'static str> {
        placeholders(self.base_url)
    }

    /// Base URL for a configured instance
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a base URL placeholder has no param value
    pub fn resolve_base_url(&self, config: &ConnectorConfig) -> Result<String, ConnectorError> {
        let template = config.base_url.as_deref().unwrap_or(self.base_url);
        let params: QueryMap = config.params.iter().collect();
        resolve_template(template, &params).map_err(|e| match e {
            ConnectorError::MissingPathParameter { parameter, .. } => {
                ConnectorError::ConfigError(format!(
                    "{} requires param '{}' (set params.{} or base_url)",
                    self.name, parameter, parameter
                ))
            }
            other => other,
        })
    }

    /// Engine over an arbitrary transport
    pub fn connector_with<T: Transport>(&self, transport: T) -> RestConnector<T> {
        let connector = RestConnector::new(self.name, self.catalog(), transport);
        match self.paging {
            Some(strategy) => connector.with_paging(strategy),
            None => connector,
        }
    }

    /// Engine over HTTP, configured from a `[connectors.<name>]` table
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for unresolved base URL params and `Init` if
    /// the HTTP client cannot be built
    pub fn connect(
        &self,
        config: &ConnectorConfig,
    ) -> Result<RestConnector<HttpTransport>, ConnectorError> {
        let base_url = self.resolve_base_url(config)?;
        debug!(connector = self.name, base_url = %base_url, "creating connector");

        let transport = HttpTransport::new(
            self.name,
            base_url,
            self.auth,
            config.token.clone(),
            config.resilience_config(),
        )?;

        Ok(self
            .connector_with(transport)
            .with_default_filters(config.default_filter_list()))
    }
}

static VENDORS: &[&VendorProfile] = &[
    #[cfg(feature = "zohobooks")]
    &zohobooks::PROFILE,
    #[cfg(feature = "box")]
    &boxcloud::PROFILE,
    #[cfg(feature = "mediafire")]
    &mediafire::PROFILE,
    #[cfg(feature = "zendesk")]
    &zendesk::PROFILE,
    #[cfg(feature = "opencart")]
    &opencart::PROFILE,
    #[cfg(feature = "mailchimp")]
    &mailchimp::PROFILE,
];

/// Every compiled-in vendor
pub fn vendors() -> &'static [&'static VendorProfile] {
    VENDORS
}

/// Look up a vendor by name (case-insensitive)
///
/// # Errors
///
/// Returns `UnknownConnector` if no such vendor is compiled in
pub fn vendor(name: &str) -> Result<&'static VendorProfile, ConnectorError> {
    VENDORS
        .iter()
        .copied()
        .find(|profile| profile.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| ConnectorError::UnknownConnector(name.to_string()))
}
