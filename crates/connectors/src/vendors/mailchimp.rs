//! Mailchimp Marketing API
//!
//! The data center (`us6`, ...) is the suffix of the API key and part of
//! the host: set `params.dc`. Basic auth takes any user name with the key
//! as password. Created lists, members and campaigns come back bare.

use super::VendorProfile;
use crate::catalog::{EndpointDescriptor, EntityCatalog};
use crate::pagination::{PageTotals, PagingStrategy};
use crate::transport::{AuthScheme, HttpMethod};
use once_cell::sync::Lazy;
use std::sync::Arc;

pub static PROFILE: VendorProfile = VendorProfile {
    name: "mailchimp",
    base_url: "https://{dc}.api.mailchimp.com/3.0",
    auth: AuthScheme::Basic("anystring"),
    paging: Some(PagingStrategy::OffsetCount {
        offset_param: "offset",
        count_param: "count",
        min_size: 1,
        max_size: 1000,
        totals: PageTotals::total("total_items"),
    }),
    catalog,
};

static CATALOG: Lazy<Arc<EntityCatalog>> = Lazy::new(|| {
    let catalog = EntityCatalog::builder("mailchimp")
        .entity(
            "lists",
            EndpointDescriptor::new("lists", "lists")
                .writable_into(HttpMethod::Post, ""),
        )
        .entity("list", EndpointDescriptor::new("lists/{list_id}", ""))
        .entity(
            "members",
            EndpointDescriptor::new("lists/{list_id}/members", "members")
                .writable_into(HttpMethod::Post, ""),
        )
        .entity(
            "member",
            EndpointDescriptor::new("lists/{list_id}/members/{subscriber_hash}", "")
                .writable(HttpMethod::Put),
        )
        .entity(
            "segments",
            EndpointDescriptor::new("lists/{list_id}/segments", "segments"),
        )
        .entity(
            "campaigns",
            EndpointDescriptor::new("campaigns", "campaigns")
                .writable_into(HttpMethod::Post, ""),
        )
        .entity("campaign", EndpointDescriptor::new("campaigns/{campaign_id}", ""))
        .entity("reports", EndpointDescriptor::new("reports", "reports"))
        .entity("automations", EndpointDescriptor::new("automations", "automations"))
        .entity("templates", EndpointDescriptor::new("templates", "templates"))
        .build()
        .expect("mailchimp catalog");
    Arc::new(catalog)
});

fn catalog() -> Arc<EntityCatalog> {
    Arc::clone(&CATALOG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;
    use crate::test_support::StaticTransport;
    use crate::traits::DataSource;
    use serde_json::json;

    #[tokio::test]
    async fn test_lists_offset_paging() {
        let rows: Vec<_> = (0..50).map(|i| json!({ "id": format!("l{i}") })).collect();
        let body = json!({ "lists": rows, "total_items": 237 }).to_string();
        let connector = PROFILE.connector_with(StaticTransport::new(200, &body));

        let page = connector.get_entity_page("lists", &[], 3, 50).await.unwrap();

        let transport = connector.transport();
        assert_eq!(transport.last_query("offset").as_deref(), Some("100"));
        assert_eq!(transport.last_query("count").as_deref(), Some("50"));
        assert_eq!(page.total_pages, 5);
        assert!(page.has_next_page);
    }

    #[tokio::test]
    async fn test_create_member_returns_bare_object() {
        let body = r#"{"id":"852aaa9532cb36adfb5e9fef7a4206a9","email_address":"urist@example.com","status":"subscribed","list_id":"57afe96172"}"#;
        let connector = PROFILE.connector_with(StaticTransport::new(200, body));

        let created = connector
            .create_entity(
                "members",
                &[Filter::eq("list_id", "57afe96172")],
                &json!({"email_address": "urist@example.com", "status": "subscribed"}),
            )
            .await
            .unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(created[0].get_str("status"), Some("subscribed"));
        assert_eq!(
            connector.transport().last_request().unwrap().path,
            "lists/57afe96172/members"
        );
    }

    #[tokio::test]
    async fn test_member_needs_both_path_params() {
        let connector = PROFILE.connector_with(StaticTransport::new(200, "{}"));
        let err = connector
            .get_entity("member", &[Filter::eq("list_id", "abc")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("subscriber_hash"));
        assert!(connector.transport().requests().is_empty());
    }
}
