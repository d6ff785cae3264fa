//! Generic REST connector
//!
//! One engine drives every vendor. A vendor contributes its entity catalog,
//! paging scheme and transport; the engine does the rest:
//!
//! 1. catalog lookup
//! 2. filters -> query map, descriptor defaults, required-filter check
//! 3. template substitution (consumed keys leave the query string)
//! 4. transport call
//! 5. response unwrapping
//! 6. paging envelope
//!
//! Reads degrade gracefully: a transport failure is logged and surfaces as
//! [`FetchOutcome::Failed`] / [`PageOutcome::Failed`] (or an empty result
//! through [`DataSource`]). Writes never swallow failures, and their reply
//! is unwrapped with the method's write root.

use crate::catalog::{EndpointDescriptor, EntityCatalog};
use crate::error::ConnectorError;
use crate::filter::{Filter, QueryMap, enforce_required, translate};
use crate::pagination::{PagedResult, PagingStrategy};
use crate::response::{Record, unwrap_value};
use crate::template::{placeholders, resolve_template};
use crate::traits::DataSource;
use crate::transport::{HttpMethod, HttpTransport, RawResponse, Transport, TransportRequest};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Why a read produced no data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// Remote answered with a non-success status
    Status { status: u16, body: String },
    /// No response (network error, open circuit, exhausted retries)
    Unreachable(String),
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::Status { status, .. } => write!(f, "HTTP status {}", status),
            TransportFailure::Unreachable(reason) => f.write_str(reason),
        }
    }
}

/// Result of a read that distinguishes "empty" from "failed"
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Records(Vec<Record>),
    Failed(TransportFailure),
}

impl FetchOutcome {
    /// Collapse to records, treating a failure as no data
    pub fn into_records(self) -> Vec<Record> {
        match self {
            FetchOutcome::Records(records) => records,
            FetchOutcome::Failed(_) => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }

    pub fn failure(&self) -> Option<&TransportFailure> {
        match self {
            FetchOutcome::Failed(failure) => Some(failure),
            FetchOutcome::Records(_) => None,
        }
    }
}

/// Result of a paged read that distinguishes "empty page" from "failed"
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Page(PagedResult),
    /// The request failed; `page` is an envelope with nothing seen
    Failed {
        page: PagedResult,
        failure: TransportFailure,
    },
}

impl PageOutcome {
    /// Collapse to an envelope, treating a failure as an empty page
    pub fn into_page(self) -> PagedResult {
        match self {
            PageOutcome::Page(page) | PageOutcome::Failed { page, .. } => page,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PageOutcome::Failed { .. })
    }

    pub fn failure(&self) -> Option<&TransportFailure> {
        match self {
            PageOutcome::Failed { failure, .. } => Some(failure),
            PageOutcome::Page(_) => None,
        }
    }
}

/// A call that passed validation and is ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCall {
    pub entity: String,
    pub path: String,
    pub query: QueryMap,
    pub root_path: String,
}

/// Parsed body, or the reason there is none
enum Document {
    Parsed(Value),
    Failed(TransportFailure),
}

/// Entity engine bound to one vendor catalog and transport
pub struct RestConnector<T = HttpTransport> {
    name: String,
    catalog: Arc<EntityCatalog>,
    paging: Option<PagingStrategy>,
    default_filters: Vec<Filter>,
    transport: T,
}

impl<T: Transport> RestConnector<T> {
    pub fn new(name: impl Into<String>, catalog: Arc<EntityCatalog>, transport: T) -> Self {
        Self {
            name: name.into(),
            catalog,
            paging: None,
            default_filters: Vec::new(),
            transport,
        }
    }

    /// Enable paged fetches
    pub fn with_paging(mut self, strategy: PagingStrategy) -> Self {
        self.paging = Some(strategy);
        self
    }

    /// Filters applied to every call unless the caller overrides them
    /// (e.g. a ZohoBooks `organization_id` from the config file)
    pub fn with_default_filters(mut self, filters: Vec<Filter>) -> Self {
        self.default_filters = filters;
        self
    }

    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }

    pub fn paging(&self) -> Option<&PagingStrategy> {
        self.paging.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate and resolve a call without sending it
    ///
    /// # Errors
    ///
    /// `UnknownEntity`, `MissingFilter` or `MissingPathParameter`.
    pub fn prepare(&self, entity: &str, filters: &[Filter]) -> Result<PreparedCall, ConnectorError> {
        let descriptor = self.catalog.resolve(entity)?;
        let query = self.build_query(descriptor, filters);
        enforce_required(entity, &query, descriptor.required_filters())?;
        self.finish_call(entity, descriptor, query)
    }

    fn build_query(&self, descriptor: &EndpointDescriptor, filters: &[Filter]) -> QueryMap {
        let mut query = translate(&self.default_filters);
        for (name, value) in translate(filters).into_pairs() {
            query.insert(name, value);
        }
        for (name, value) in descriptor.defaults() {
            query.insert_default(name, value);
        }
        query
    }

    fn finish_call(
        &self,
        entity: &str,
        descriptor: &EndpointDescriptor,
        mut query: QueryMap,
    ) -> Result<PreparedCall, ConnectorError> {
        let path = resolve_template(descriptor.template(), &query)?;
        for name in placeholders(descriptor.template()) {
            query.remove(name);
        }
        for (name, value) in descriptor.fixed_query() {
            query.insert(name.as_str(), value.as_str());
        }

        Ok(PreparedCall {
            entity: entity.to_string(),
            path,
            query,
            root_path: descriptor.root_path().to_string(),
        })
    }

    /// Send a GET and parse the body, folding transport failures into
    /// [`Document::Failed`]
    async fn read_document(
        &self,
        call: &PreparedCall,
        extra: &[(&'static str, String)],
        cancel: Option<&CancellationToken>,
    ) -> Result<Document, ConnectorError> {
        let mut query = call.query.clone();
        for (name, value) in extra {
            query.insert(*name, value.as_str());
        }
        let request = TransportRequest::get(call.path.as_str(), query.into_pairs());

        let sent = match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(ConnectorError::Cancelled),
                response = self.transport.send(request) => response,
            },
            None => self.transport.send(request).await,
        };

        let failure = match sent {
            Ok(response) if response.is_success() => {
                return self.parse_body(&call.entity, &response).map(Document::Parsed);
            }
            Ok(RawResponse { status, body }) => TransportFailure::Status { status, body },
            Err(ConnectorError::Cancelled) => return Err(ConnectorError::Cancelled),
            Err(e) => TransportFailure::Unreachable(e.to_string()),
        };

        warn!(
            connector = %self.name,
            entity = %call.entity,
            path = %call.path,
            error = %failure,
            "read failed, returning no data"
        );
        Ok(Document::Failed(failure))
    }

    fn parse_body(&self, entity: &str, response: &RawResponse) -> Result<Value, ConnectorError> {
        // 204 and friends carry no body
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|source| ConnectorError::MalformedResponse {
            entity: entity.to_string(),
            source,
        })
    }

    async fn fetch(
        &self,
        entity: &str,
        filters: &[Filter],
        cancel: Option<&CancellationToken>,
    ) -> Result<FetchOutcome, ConnectorError> {
        let call = self.prepare(entity, filters)?;
        let outcome = match self.read_document(&call, &[], cancel).await? {
            Document::Parsed(document) => {
                FetchOutcome::Records(unwrap_value(document, &call.root_path))
            }
            Document::Failed(failure) => FetchOutcome::Failed(failure),
        };

        if let FetchOutcome::Records(ref records) = outcome {
            debug!(
                connector = %self.name,
                entity = %entity,
                records = records.len(),
                "fetched entity"
            );
        }
        Ok(outcome)
    }

    /// Unpaged read that keeps failures visible
    ///
    /// # Errors
    ///
    /// Validation errors and `MalformedResponse`; transport failures are
    /// reported through [`FetchOutcome::Failed`].
    pub async fn fetch_entity(
        &self,
        entity: &str,
        filters: &[Filter],
    ) -> Result<FetchOutcome, ConnectorError> {
        self.fetch(entity, filters, None).await
    }

    /// Unpaged read that gives up when `cancel` fires
    ///
    /// Cancellation only interrupts the transport call; once a response has
    /// arrived it is unwrapped to completion.
    pub async fn get_entity_cancellable(
        &self,
        entity: &str,
        filters: &[Filter],
        cancel: &CancellationToken,
    ) -> Result<Vec<Record>, ConnectorError> {
        self.fetch(entity, filters, Some(cancel))
            .await
            .map(FetchOutcome::into_records)
    }

    /// Paged read that keeps failures visible
    ///
    /// # Errors
    ///
    /// `PagingUnsupported`, validation errors and `MalformedResponse`;
    /// transport failures are reported through [`PageOutcome::Failed`].
    pub async fn fetch_entity_page(
        &self,
        entity: &str,
        filters: &[Filter],
        page_number: u32,
        page_size: u32,
    ) -> Result<PageOutcome, ConnectorError> {
        let strategy = self
            .paging
            .ok_or_else(|| ConnectorError::PagingUnsupported(self.name.clone()))?;
        let call = self.prepare(entity, filters)?;
        let page = strategy.request(page_number, page_size);

        let result = match self.read_document(&call, &page.params, None).await? {
            Document::Parsed(document) => {
                let data = unwrap_value(document.clone(), &call.root_path);
                page.envelope(data, &document)
            }
            Document::Failed(failure) => {
                return Ok(PageOutcome::Failed {
                    page: page.unanswered(),
                    failure,
                });
            }
        };

        debug!(
            connector = %self.name,
            entity = %entity,
            page = result.page_number,
            page_size = result.page_size,
            records = result.data.len(),
            has_next = result.has_next_page,
            "fetched page"
        );
        Ok(PageOutcome::Page(result))
    }

    /// POST a new entity
    ///
    /// # Errors
    ///
    /// Validation errors, `ReadOnlyEntity`, `WriteFailed` for a non-success
    /// status, and transport errors as-is.
    pub async fn create_entity(
        &self,
        entity: &str,
        filters: &[Filter],
        body: &Value,
    ) -> Result<Vec<Record>, ConnectorError> {
        self.write(HttpMethod::Post, entity, filters, body).await
    }

    /// PUT an update to an existing entity
    ///
    /// # Errors
    ///
    /// Same as [`RestConnector::create_entity`].
    pub async fn update_entity(
        &self,
        entity: &str,
        filters: &[Filter],
        body: &Value,
    ) -> Result<Vec<Record>, ConnectorError> {
        self.write(HttpMethod::Put, entity, filters, body).await
    }

    async fn write(
        &self,
        method: HttpMethod,
        entity: &str,
        filters: &[Filter],
        body: &Value,
    ) -> Result<Vec<Record>, ConnectorError> {
        let descriptor = self.catalog.resolve(entity)?;
        let Some(reply_root) = descriptor.write_root(method) else {
            return Err(ConnectorError::ReadOnlyEntity {
                entity: entity.to_string(),
                method: method.to_string(),
            });
        };
        let call = self.prepare(entity, filters)?;

        let request = TransportRequest {
            method,
            path: call.path.clone(),
            query: call.query.into_pairs(),
            body: Some(body.clone()),
        };
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            warn!(
                connector = %self.name,
                entity = %entity,
                method = %method,
                status = response.status,
                "write rejected"
            );
            return Err(ConnectorError::WriteFailed {
                status: response.status,
                body: response.body,
            });
        }

        let document = self.parse_body(entity, &response)?;
        debug!(
            connector = %self.name,
            entity = %entity,
            method = %method,
            status = response.status,
            "write accepted"
        );
        Ok(unwrap_value(document, reply_root))
    }
}

impl<T: Transport> DataSource for RestConnector<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn entity_names(&self) -> Vec<&str> {
        self.catalog.entity_names()
    }

    async fn get_entity(
        &self,
        entity: &str,
        filters: &[Filter],
    ) -> Result<Vec<Record>, ConnectorError> {
        self.fetch(entity, filters, None)
            .await
            .map(FetchOutcome::into_records)
    }

    async fn get_entity_page(
        &self,
        entity: &str,
        filters: &[Filter],
        page_number: u32,
        page_size: u32,
    ) -> Result<PagedResult, ConnectorError> {
        self.fetch_entity_page(entity, filters, page_number, page_size)
            .await
            .map(PageOutcome::into_page)
    }
}

#[cfg(test)]
#[path = "connector_test.rs"]
mod tests;
