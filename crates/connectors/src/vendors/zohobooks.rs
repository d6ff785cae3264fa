//! Zoho Books
//!
//! Every entity except `organizations` is scoped to an organization, so
//! `organization_id` is required (usually set once through
//! `default_filters` in the config file). List responses carry
//! `page_context.has_more_page`; there is no total count. Creating an
//! entity answers with the singular wrapper (`POST invoices` -> `invoice`).

use super::VendorProfile;
use crate::catalog::{EndpointDescriptor, EntityCatalog};
use crate::pagination::{PageTotals, PagingStrategy};
use crate::transport::{AuthScheme, HttpMethod};
use once_cell::sync::Lazy;
use std::sync::Arc;

pub static PROFILE: VendorProfile = VendorProfile {
    name: "zohobooks",
    base_url: "https://www.zohoapis.com/books/v3",
    auth: AuthScheme::Prefixed("Zoho-oauthtoken"),
    paging: Some(PagingStrategy::PagePerPage {
        page_param: "page",
        size_param: "per_page",
        min_size: 10,
        max_size: 200,
        totals: PageTotals::has_more("page_context.has_more_page"),
    }),
    catalog,
};

static CATALOG: Lazy<Arc<EntityCatalog>> = Lazy::new(|| {
    let org = |template: &str, root: &str| {
        EndpointDescriptor::new(template, root).require("organization_id")
    };

    let catalog = EntityCatalog::builder("zohobooks")
        .entity(
            "invoices",
            org("invoices", "invoices").writable_into(HttpMethod::Post, "invoice"),
        )
        .entity(
            "invoice",
            org("invoices/{invoice_id}", "invoice").writable(HttpMethod::Put),
        )
        .entity(
            "contacts",
            org("contacts", "contacts").writable_into(HttpMethod::Post, "contact"),
        )
        .entity(
            "contact",
            org("contacts/{contact_id}", "contact").writable(HttpMethod::Put),
        )
        .entity("contact_persons", org("contacts/{contact_id}/contactpersons", "contact_persons"))
        .entity(
            "items",
            org("items", "items").writable_into(HttpMethod::Post, "item"),
        )
        .entity("item", org("items/{item_id}", "item").writable(HttpMethod::Put))
        .entity(
            "bills",
            org("bills", "bills").writable_into(HttpMethod::Post, "bill"),
        )
        .entity("bill", org("bills/{bill_id}", "bill"))
        .entity("customer_payments", org("customerpayments", "customerpayments"))
        .entity("vendor_payments", org("vendorpayments", "vendorpayments"))
        .entity("credit_notes", org("creditnotes", "creditnotes"))
        .entity(
            "estimates",
            org("estimates", "estimates").writable_into(HttpMethod::Post, "estimate"),
        )
        .entity("salesorders", org("salesorders", "salesorders"))
        .entity("purchaseorders", org("purchaseorders", "purchaseorders"))
        .entity(
            "expenses",
            org("expenses", "expenses").writable_into(HttpMethod::Post, "expense"),
        )
        .entity("chart_of_accounts", org("chartofaccounts", "chartofaccounts"))
        .entity("bank_accounts", org("bankaccounts", "bankaccounts"))
        .entity("taxes", org("settings/taxes", "taxes"))
        .entity("users", org("users", "users"))
        .entity("projects", org("projects", "projects"))
        .entity(
            "organizations",
            EndpointDescriptor::new("organizations", "organizations"),
        )
        .build()
        .expect("zohobooks catalog");
    Arc::new(catalog)
});

fn catalog() -> Arc<EntityCatalog> {
    Arc::clone(&CATALOG)
}
