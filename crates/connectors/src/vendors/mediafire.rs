//! MediaFire
//!
//! Everything is a `.php` action under `/api/1.5` answering inside a
//! `response` envelope. Folder contents come back in chunks; the
//! `more_chunks` flag says whether another chunk follows.

use super::VendorProfile;
use crate::catalog::{EndpointDescriptor, EntityCatalog};
use crate::pagination::{PageTotals, PagingStrategy};
use crate::transport::AuthScheme;
use once_cell::sync::Lazy;
use std::sync::Arc;

const MY_FILES: &str = "myfiles";

pub static PROFILE: VendorProfile = VendorProfile {
    name: "mediafire",
    base_url: "https://www.mediafire.com/api/1.5",
    auth: AuthScheme::Query("session_token"),
    paging: Some(PagingStrategy::PagePerPage {
        page_param: "chunk",
        size_param: "chunk_size",
        min_size: 100,
        max_size: 1000,
        totals: PageTotals::has_more("response.folder_content.more_chunks"),
    }),
    catalog,
};

fn action(template: &str, root: &str) -> EndpointDescriptor {
    EndpointDescriptor::new(template, root).fixed("response_format", "json")
}

static CATALOG: Lazy<Arc<EntityCatalog>> = Lazy::new(|| {
    let catalog = EntityCatalog::builder("mediafire")
        .entity(
            "folder_files",
            action("folder/get_content.php", "response.folder_content.files")
                .default_value("folder_key", MY_FILES)
                .fixed("content_type", "files"),
        )
        .entity(
            "folder_folders",
            action("folder/get_content.php", "response.folder_content.folders")
                .default_value("folder_key", MY_FILES)
                .fixed("content_type", "folders"),
        )
        .entity(
            "folder_info",
            action("folder/get_info.php", "response.folder_info").default_value("folder_key", MY_FILES),
        )
        .entity(
            "file_info",
            action("file/get_info.php", "response.file_info").require("quick_key"),
        )
        .entity(
            "file_links",
            action("file/get_links.php", "response.links").require("quick_key"),
        )
        .entity(
            "folder_search",
            action("folder/search.php", "response.results").require("search_text"),
        )
        .entity("user_info", action("user/get_info.php", "response.user_info"))
        .build()
        .expect("mediafire catalog");
    Arc::new(catalog)
});

fn catalog() -> Arc<EntityCatalog> {
    Arc::clone(&CATALOG)
}
