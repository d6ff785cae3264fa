//! Data source trait definition

use crate::error::ConnectorError;
use crate::filter::Filter;
use crate::pagination::PagedResult;
use crate::response::Record;

/// Read access to a remote system's entities
///
/// A data source maps logical entity names ("invoices", "folder_items") to
/// remote endpoints and returns schema-less records. Hosts that want to
/// treat every vendor uniformly hold a `DataSource` instead of a concrete
/// connector.
pub trait DataSource: Send + Sync {
    /// Connector name (e.g., "zohobooks", "box")
    fn name(&self) -> &str;

    /// Entities this source can serve, sorted
    fn entity_names(&self) -> Vec<&str>;

    /// Fetch every record the remote returns for one unpaged call
    ///
    /// Transport failures are logged and reported as an empty list.
    /// Validation problems (unknown entity, missing filters) are errors.
    fn get_entity(
        &self,
        entity: &str,
        filters: &[Filter],
    ) -> impl std::future::Future<Output = Result<Vec<Record>, ConnectorError>> + Send;

    /// Fetch one page
    ///
    /// `page_number` is 1-based; `page_size` is clamped to the vendor's
    /// accepted range.
    fn get_entity_page(
        &self,
        entity: &str,
        filters: &[Filter],
        page_number: u32,
        page_size: u32,
    ) -> impl std::future::Future<Output = Result<PagedResult, ConnectorError>> + Send;
}
