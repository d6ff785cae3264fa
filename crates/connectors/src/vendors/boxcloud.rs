//! Box
//!
//! Folder listings live under `entries` and report `total_count`, so paged
//! reads have an exact total. Folder id `0` is the account root.

use super::VendorProfile;
use crate::catalog::{EndpointDescriptor, EntityCatalog};
use crate::pagination::{PageTotals, PagingStrategy};
use crate::transport::{AuthScheme, HttpMethod};
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Box account root folder
const ROOT_FOLDER: &str = "0";

pub static PROFILE: VendorProfile = VendorProfile {
    name: "box",
    base_url: "https://api.box.com/2.0",
    auth: AuthScheme::Bearer,
    paging: Some(PagingStrategy::OffsetCount {
        offset_param: "offset",
        count_param: "limit",
        min_size: 1,
        max_size: 1000,
        totals: PageTotals::total("total_count"),
    }),
    catalog,
};

static CATALOG: Lazy<Arc<EntityCatalog>> = Lazy::new(|| {
    let catalog = EntityCatalog::builder("box")
        .entity(
            "folder_items",
            EndpointDescriptor::new("folders/{folder_id}/items", "entries")
                .default_value("folder_id", ROOT_FOLDER),
        )
        .entity(
            "folder",
            EndpointDescriptor::new("folders/{folder_id}", "")
                .default_value("folder_id", ROOT_FOLDER)
                .writable(HttpMethod::Put),
        )
        .entity(
            "folders",
            EndpointDescriptor::new("folders", "").writable(HttpMethod::Post),
        )
        .entity(
            "file",
            EndpointDescriptor::new("files/{file_id}", "").writable(HttpMethod::Put),
        )
        .entity(
            "file_versions",
            EndpointDescriptor::new("files/{file_id}/versions", "entries"),
        )
        .entity(
            "file_comments",
            EndpointDescriptor::new("files/{file_id}/comments", "entries"),
        )
        .entity(
            "file_collaborations",
            EndpointDescriptor::new("files/{file_id}/collaborations", "entries"),
        )
        .entity(
            "folder_collaborations",
            EndpointDescriptor::new("folders/{folder_id}/collaborations", "entries"),
        )
        .entity("users", EndpointDescriptor::new("users", "entries"))
        .entity("current_user", EndpointDescriptor::new("users/me", ""))
        .entity("groups", EndpointDescriptor::new("groups", "entries"))
        .entity(
            "search",
            EndpointDescriptor::new("search", "entries").require("query"),
        )
        .entity("trashed_items", EndpointDescriptor::new("folders/trash/items", "entries"))
        .build()
        .expect("box catalog");
    Arc::new(catalog)
});

fn catalog() -> Arc<EntityCatalog> {
    Arc::clone(&CATALOG)
}
