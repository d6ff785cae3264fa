//! Blocking facade
//!
//! Wraps a [`RestConnector`] with a private current-thread runtime so hosts
//! without an async executor can call it directly. Must not be used from
//! inside a Tokio runtime (the nested `block_on` panics).

use crate::connector::{FetchOutcome, PageOutcome, RestConnector};
use crate::error::ConnectorError;
use crate::filter::Filter;
use crate::pagination::PagedResult;
use crate::response::Record;
use crate::traits::DataSource;
use crate::transport::{HttpTransport, Transport};
use serde_json::Value;
use tokio::runtime::{Builder, Runtime};

/// Synchronous wrapper around a connector
pub struct BlockingConnector<T = HttpTransport> {
    inner: RestConnector<T>,
    runtime: Runtime,
}

impl<T: Transport> BlockingConnector<T> {
    /// # Errors
    ///
    /// Returns `Init` if the runtime cannot be created
    pub fn new(inner: RestConnector<T>) -> Result<Self, ConnectorError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ConnectorError::Init(format!("blocking runtime: {}", e)))?;
        Ok(Self { inner, runtime })
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn entity_names(&self) -> Vec<&str> {
        self.inner.entity_names()
    }

    pub fn inner(&self) -> &RestConnector<T> {
        &self.inner
    }

    pub fn get_entity(&self, entity: &str, filters: &[Filter]) -> Result<Vec<Record>, ConnectorError> {
        self.runtime.block_on(self.inner.get_entity(entity, filters))
    }

    pub fn fetch_entity(
        &self,
        entity: &str,
        filters: &[Filter],
    ) -> Result<FetchOutcome, ConnectorError> {
        self.runtime.block_on(self.inner.fetch_entity(entity, filters))
    }

    pub fn get_entity_page(
        &self,
        entity: &str,
        filters: &[Filter],
        page_number: u32,
        page_size: u32,
    ) -> Result<PagedResult, ConnectorError> {
        self.runtime.block_on(
            self.inner
                .get_entity_page(entity, filters, page_number, page_size),
        )
    }

    pub fn fetch_entity_page(
        &self,
        entity: &str,
        filters: &[Filter],
        page_number: u32,
        page_size: u32,
    ) -> Result<PageOutcome, ConnectorError> {
        self.runtime.block_on(
            self.inner
                .fetch_entity_page(entity, filters, page_number, page_size),
        )
    }

    pub fn create_entity(
        &self,
        entity: &str,
        filters: &[Filter],
        body: &Value,
    ) -> Result<Vec<Record>, ConnectorError> {
        self.runtime
            .block_on(self.inner.create_entity(entity, filters, body))
    }

    pub fn update_entity(
        &self,
        entity: &str,
        filters: &[Filter],
        body: &Value,
    ) -> Result<Vec<Record>, ConnectorError> {
        self.runtime
            .block_on(self.inner.update_entity(entity, filters, body))
    }
}
