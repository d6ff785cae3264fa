//! Zendesk Support
//!
//! The account subdomain is part of the host, so configs must set
//! `params.subdomain` (or a full `base_url`). Lists report `count`.

use super::VendorProfile;
use crate::catalog::{EndpointDescriptor, EntityCatalog};
use crate::pagination::{PageTotals, PagingStrategy};
use crate::transport::{AuthScheme, HttpMethod};
use once_cell::sync::Lazy;
use std::sync::Arc;

pub static PROFILE: VendorProfile = VendorProfile {
    name: "zendesk",
    base_url: "https://{subdomain}.zendesk.com/api/v2",
    auth: AuthScheme::Bearer,
    paging: Some(PagingStrategy::PagePerPage {
        page_param: "page",
        size_param: "per_page",
        min_size: 1,
        max_size: 100,
        totals: PageTotals::total("count"),
    }),
    catalog,
};

static CATALOG: Lazy<Arc<EntityCatalog>> = Lazy::new(|| {
    let catalog = EntityCatalog::builder("zendesk")
        .entity(
            "tickets",
            EndpointDescriptor::new("tickets.json", "tickets")
                .writable_into(HttpMethod::Post, "ticket"),
        )
        .entity(
            "ticket",
            EndpointDescriptor::new("tickets/{ticket_id}.json", "ticket").writable(HttpMethod::Put),
        )
        .entity(
            "ticket_comments",
            EndpointDescriptor::new("tickets/{ticket_id}/comments.json", "comments"),
        )
        .entity(
            "users",
            EndpointDescriptor::new("users.json", "users")
                .writable_into(HttpMethod::Post, "user"),
        )
        .entity(
            "user",
            EndpointDescriptor::new("users/{user_id}.json", "user").writable(HttpMethod::Put),
        )
        .entity(
            "organizations",
            EndpointDescriptor::new("organizations.json", "organizations"),
        )
        .entity("groups", EndpointDescriptor::new("groups.json", "groups"))
        .entity(
            "ticket_fields",
            EndpointDescriptor::new("ticket_fields.json", "ticket_fields"),
        )
        .entity("views", EndpointDescriptor::new("views.json", "views"))
        .entity("macros", EndpointDescriptor::new("macros.json", "macros"))
        .entity(
            "search",
            EndpointDescriptor::new("search.json", "results").require("query"),
        )
        .build()
        .expect("zendesk catalog");
    Arc::new(catalog)
});

fn catalog() -> Arc<EntityCatalog> {
    Arc::clone(&CATALOG)
}
