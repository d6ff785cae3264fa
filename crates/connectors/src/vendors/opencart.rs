//! OpenCart REST admin API
//!
//! Self-hosted, so the host always comes from config (`params.host`, or a
//! full `base_url` when the shop runs on a non-default port or path).
//! Responses wrap everything in `data` and carry no totals.

use super::VendorProfile;
use crate::catalog::{EndpointDescriptor, EntityCatalog};
use crate::pagination::{PageTotals, PagingStrategy};
use crate::transport::{AuthScheme, HttpMethod};
use once_cell::sync::Lazy;
use std::sync::Arc;

pub static PROFILE: VendorProfile = VendorProfile {
    name: "opencart",
    base_url: "https://{host}/api/rest_admin",
    auth: AuthScheme::Header("X-Oc-Restadmin-Id"),
    paging: Some(PagingStrategy::PagePerPage {
        page_param: "page",
        size_param: "limit",
        min_size: 1,
        max_size: 100,
        totals: PageTotals::NONE,
    }),
    catalog,
};

static CATALOG: Lazy<Arc<EntityCatalog>> = Lazy::new(|| {
    let catalog = EntityCatalog::builder("opencart")
        .entity(
            "products",
            EndpointDescriptor::new("products", "data").writable(HttpMethod::Post),
        )
        .entity(
            "product",
            EndpointDescriptor::new("products/{product_id}", "data").writable(HttpMethod::Put),
        )
        .entity("categories", EndpointDescriptor::new("categories", "data"))
        .entity("category", EndpointDescriptor::new("categories/{category_id}", "data"))
        .entity("orders", EndpointDescriptor::new("orders", "data"))
        .entity(
            "order",
            EndpointDescriptor::new("orders/{order_id}", "data").writable(HttpMethod::Put),
        )
        .entity(
            "order_products",
            EndpointDescriptor::new("orders/{order_id}/products", "data"),
        )
        .entity("customers", EndpointDescriptor::new("customers", "data"))
        .entity("customer", EndpointDescriptor::new("customers/{customer_id}", "data"))
        .entity("manufacturers", EndpointDescriptor::new("manufacturers", "data"))
        .entity("order_statuses", EndpointDescriptor::new("order_statuses", "data"))
        .build()
        .expect("opencart catalog");
    Arc::new(catalog)
});

fn catalog() -> Arc<EntityCatalog> {
    Arc::clone(&CATALOG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectorConfig;
    use crate::filter::Filter;
    use crate::test_support::StaticTransport;
    use crate::traits::DataSource;
    use std::collections::BTreeMap;

    #[test]
    fn test_host_from_params() {
        let config = ConnectorConfig {
            params: BTreeMap::from([("host".to_string(), "shop.example.com".to_string())]),
            ..Default::default()
        };
        assert_eq!(
            PROFILE.resolve_base_url(&config).unwrap(),
            "https://shop.example.com/api/rest_admin"
        );
    }

    #[tokio::test]
    async fn test_order_products() {
        let body = r#"{"success":1,"error":[],"data":[{"product_id":"42","quantity":"2"}]}"#;
        let connector = PROFILE.connector_with(StaticTransport::new(200, body));

        let page = connector
            .get_entity_page("order_products", &[Filter::eq("order_id", "7")], 1, 20)
            .await
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert!(!page.has_next_page);
        assert_eq!(
            connector.transport().last_request().unwrap().path,
            "orders/7/products"
        );
        assert_eq!(connector.transport().last_query("limit").as_deref(), Some("20"));
    }
}
