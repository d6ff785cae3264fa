//! HTTP transport
//!
//! The engine talks to remote APIs through the [`Transport`] trait. The
//! production implementation is [`HttpTransport`] (reqwest), which owns
//! authentication headers, timeouts, retries and the circuit breaker.
//! Tests substitute an in-memory transport.

use crate::error::ConnectorError;
use crate::resilience::{
    CircuitBreaker, ResilienceConfig, RetryError, execute_with_retry, is_retryable_error,
    is_retryable_status,
};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// HTTP methods used by connectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    /// Safe to send twice (retries are limited to these)
    pub fn is_idempotent(self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Put)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved request
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    /// Path relative to the transport's base URL, or an absolute URL
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl TransportRequest {
    pub fn get(path: impl Into<String>, query: Vec<(String, String)>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query,
            body: None,
        }
    }
}

/// Raw status and body as returned by the remote API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can execute a [`TransportRequest`]
///
/// Any status code is a successful send; `Err` is reserved for requests
/// that produced no response at all (network failure, open circuit,
/// exhausted retries).
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<RawResponse, ConnectorError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<RawResponse, ConnectorError>> + Send {
        self.as_ref().send(request)
    }
}

/// How the API token is attached to each request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// No credentials
    None,
    /// `Authorization: Bearer <token>`
    Bearer,
    /// `Authorization: <prefix> <token>` (e.g. `Zoho-oauthtoken`)
    Prefixed(&'static str),
    /// Token in a custom header
    Header(&'static str),
    /// Token as a query parameter
    Query(&'static str),
    /// HTTP basic auth with a fixed user name and the token as password
    Basic(&'static str),
}

/// reqwest-backed transport for one connector
pub struct HttpTransport {
    name: String,
    base_url: String,
    auth: AuthScheme,
    token: Option<String>,
    client: reqwest::Client,
    resilience: ResilienceConfig,
    circuit_breaker: Arc<CircuitBreaker>,
}

impl HttpTransport {
    /// Create a transport rooted at `base_url`
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client creation fails (e.g., TLS or proxy misconfiguration)
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        auth: AuthScheme,
        token: Option<String>,
        resilience: ResilienceConfig,
    ) -> Result<Self, ConnectorError> {
        let name = name.into();
        let client = reqwest::Client::builder()
            .user_agent(concat!("conduit/", env!("CARGO_PKG_VERSION")))
            .timeout(resilience.timeout())
            .build()
            .map_err(|e| ConnectorError::Init(format!("{} HTTP client: {}", name, e)))?;

        let circuit_breaker = Arc::new(CircuitBreaker::new(name.clone(), &resilience));

        Ok(Self {
            name,
            base_url: base_url.into(),
            auth,
            token,
            client,
            resilience,
            circuit_breaker,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get circuit breaker status
    pub fn circuit_breaker_open(&self) -> bool {
        self.circuit_breaker.is_open()
    }

    /// Get current failure count
    pub fn failure_count(&self) -> u32 {
        self.circuit_breaker.failure_count()
    }

    /// Join base URL and path; absolute paths are used as-is
    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.is_empty() {
            return self.base_url.clone();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Build a request with auth attached
    fn build_request(&self, request: &TransportRequest) -> reqwest::RequestBuilder {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(ref token) = self.token {
            builder = match self.auth {
                AuthScheme::None => builder,
                AuthScheme::Bearer => builder.bearer_auth(token),
                AuthScheme::Prefixed(prefix) => {
                    builder.header(reqwest::header::AUTHORIZATION, format!("{} {}", prefix, token))
                }
                AuthScheme::Header(name) => builder.header(name, token),
                AuthScheme::Query(name) => builder.query(&[(name, token)]),
                AuthScheme::Basic(user) => builder.basic_auth(user, Some(token)),
            };
        }

        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        builder
    }

    /// Single attempt, no retry
    async fn send_once(&self, request: &TransportRequest) -> Result<RawResponse, reqwest::Error> {
        let response = self.build_request(request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, ConnectorError> {
        let resilience = if request.method.is_idempotent() {
            self.resilience.clone()
        } else {
            ResilienceConfig {
                max_retries: 0,
                ..self.resilience.clone()
            }
        };
        let operation = format!("{} {} {}", self.name, request.method, request.path);
        let request = &request;

        debug!(
            connector = %self.name,
            method = %request.method,
            path = %request.path,
            params = request.query.len(),
            "sending request"
        );

        let result = execute_with_retry(
            &resilience,
            Some(self.circuit_breaker.as_ref()),
            &operation,
            |outcome: &Result<RawResponse, reqwest::Error>| match outcome {
                Ok(response) => is_retryable_status(response.status),
                Err(e) => is_retryable_error(e),
            },
            || self.send_once(request),
        )
        .await;

        match result {
            Ok(response) => Ok(response),
            Err(RetryError::CircuitOpen) => Err(ConnectorError::CircuitOpen(self.name.clone())),
            Err(RetryError::Exhausted {
                attempts,
                last_error,
            }) => Err(ConnectorError::RetriesExhausted {
                attempts,
                last_error,
            }),
            Err(RetryError::Permanent(e)) => Err(ConnectorError::Http(e)),
        }
    }
}
