//! Error types for connectors

use thiserror::Error;

/// Errors that can occur during connector operations
///
/// Validation variants (`UnknownEntity`, `MissingFilter`,
/// `MissingPathParameter`, `PagingUnsupported`, `ReadOnlyEntity`) are raised
/// before any network call is made.
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// Failed to initialize connector (e.g., HTTP client creation failed)
    #[error("failed to initialize connector: {0}")]
    Init(String),

    /// Entity name is not registered in the connector's catalog
    #[error("Unknown entity '{entity}' for connector {connector}")]
    UnknownEntity { connector: String, entity: String },

    /// One or more required filters are absent or blank
    #[error("Entity '{entity}' requires filters: {}", missing.join(", "))]
    MissingFilter { entity: String, missing: Vec<String> },

    /// A `{placeholder}` in the endpoint template could not be resolved
    #[error("Missing path parameter '{parameter}' for template '{template}'")]
    MissingPathParameter { template: String, parameter: String },

    /// Response body is not valid JSON
    #[error("Malformed response for '{entity}': {source}")]
    MalformedResponse {
        entity: String,
        #[source]
        source: serde_json::Error,
    },

    /// Paged fetch requested against a connector without a paging scheme
    #[error("Connector {0} does not support paging")]
    PagingUnsupported(String),

    /// Mutation requested against an entity that does not accept it
    #[error("Entity '{entity}' does not accept {method}")]
    ReadOnlyEntity { entity: String, method: String },

    /// Write rejected by the remote API
    #[error("Write failed with status {status}: {body}")]
    WriteFailed { status: u16, body: String },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Circuit breaker is open, request not attempted
    #[error("circuit breaker open for {0}")]
    CircuitOpen(String),

    /// All retry attempts exhausted
    #[error("failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    /// Caller cancelled the request before the transport answered
    #[error("request cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Unknown connector type
    #[error("Unknown connector type: {0}")]
    UnknownConnector(String),
}

impl ConnectorError {
    /// True for errors detected before any request was sent
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownEntity { .. }
                | Self::MissingFilter { .. }
                | Self::MissingPathParameter { .. }
                | Self::PagingUnsupported(_)
                | Self::ReadOnlyEntity { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_filter_lists_every_name() {
        let err = ConnectorError::MissingFilter {
            entity: "invoices".into(),
            missing: vec!["a".into(), "b".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("invoices"));
        assert!(msg.contains("a, b"));
    }

    #[test]
    fn test_missing_path_parameter_display() {
        let err = ConnectorError::MissingPathParameter {
            template: "invoices/{invoice_id}".into(),
            parameter: "invoice_id".into(),
        };
        assert!(err.to_string().contains("'invoice_id'"));
    }

    #[test]
    fn test_write_failed_display() {
        let err = ConnectorError::WriteFailed {
            status: 422,
            body: "{\"code\":4}".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("422"));
        assert!(msg.contains("\"code\""));
    }

    #[test]
    fn test_is_validation() {
        assert!(
            ConnectorError::UnknownEntity {
                connector: "box".into(),
                entity: "nope".into()
            }
            .is_validation()
        );
        assert!(!ConnectorError::Cancelled.is_validation());
        assert!(!ConnectorError::CircuitOpen("box".into()).is_validation());
    }
}
