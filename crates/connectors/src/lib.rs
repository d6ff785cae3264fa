//! Conduit - Connectors
//!
//! One generic engine that turns "fetch entity X with filters F" into an
//! HTTP call against a vendor's REST API and returns schema-less records.
//!
//! # Pipeline
//!
//! - **Catalog**: entity name -> endpoint template, JSON root, required filters
//! - **Filters**: `(field, value)` pairs folded into a case-insensitive query map
//! - **Templates**: `{placeholders}` filled from the map and percent-encoded
//! - **Transport**: reqwest with auth, timeouts, retries and a circuit breaker
//! - **Unwrapping**: walk to the JSON root, one record per array element
//! - **Paging**: page/per_page or offset/count, reduced to one envelope
//!
//! Vendors only contribute data (a [`VendorProfile`]); there is no
//! per-vendor code path in the engine.
//!
//! # Feature Flags
//!
//! Vendors can be selectively compiled using feature flags:
//!
//! ```toml
//! [dependencies]
//! conduit-connectors = { version = "0.1", default-features = false, features = ["zendesk"] }
//! ```
//!
//! Available features (all default): `zohobooks`, `box`, `mediafire`,
//! `zendesk`, `opencart`, `mailchimp`.
//!
//! # Example
//!
//! ```ignore
//! use conduit_connectors::{ConnectorConfig, DataSource, Filter, vendor};
//!
//! let books = vendor("zohobooks")?.connect(&ConnectorConfig {
//!     token: Some("1000.xxx".into()),
//!     ..Default::default()
//! })?;
//!
//! let invoices = books
//!     .get_entity("invoices", &[Filter::eq("organization_id", "10234695")])
//!     .await?;
//! ```

pub mod blocking;
pub mod catalog;
pub mod config;
pub mod connector;
mod error;
pub mod filter;
pub mod pagination;
pub mod resilience;
pub mod response;
pub mod template;
mod traits;
pub mod transport;
pub mod vendors;

#[cfg(test)]
mod test_support;

// Re-exports
pub use blocking::BlockingConnector;
pub use catalog::{EndpointDescriptor, EntityCatalog};
pub use config::ConnectorConfig;
pub use connector::{FetchOutcome, PageOutcome, PreparedCall, RestConnector, TransportFailure};
pub use error::ConnectorError;
pub use filter::{Filter, QueryMap};
pub use pagination::{PageTotals, PagedResult, PagingStrategy};
pub use response::Record;
pub use traits::DataSource;
pub use transport::{AuthScheme, HttpMethod, HttpTransport, RawResponse, Transport, TransportRequest};
pub use vendors::{VendorProfile, vendor, vendors};

/// List of available connector types (compiled in)
pub fn available_connectors() -> &'static [&'static str] {
    &[
        #[cfg(feature = "zohobooks")]
        "zohobooks",
        #[cfg(feature = "box")]
        "box",
        #[cfg(feature = "mediafire")]
        "mediafire",
        #[cfg(feature = "zendesk")]
        "zendesk",
        #[cfg(feature = "opencart")]
        "opencart",
        #[cfg(feature = "mailchimp")]
        "mailchimp",
    ]
}
