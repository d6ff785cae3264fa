//! Get command - fetch entity records from a connector
//!
//! The target is either a `[connectors.<name>]` entry from the config file
//! or a bare connector type. CLI flags are layered on top of the config.

use super::load_config;
use anyhow::{Context, Result, bail};
use clap::Args;
use conduit_config::Config;
use conduit_connectors::{
    ConnectorConfig, FetchOutcome, Filter, HttpTransport, PageOutcome, PagedResult, RestConnector,
    VendorProfile, vendor,
};
use serde::Serialize;
use std::path::Path;

/// Get command arguments
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configured connector name or connector type (e.g., books, zohobooks)
    #[arg(value_name = "CONNECTOR")]
    pub target: String,

    /// Entity to fetch (see `conduit entities <connector>`)
    #[arg(value_name = "ENTITY")]
    pub entity: String,

    /// Filter as field=value (repeatable)
    #[arg(short, long = "filter", value_name = "FIELD=VALUE")]
    pub filters: Vec<Filter>,

    /// Fetch a single page (1-based) instead of one unpaged call
    #[arg(long)]
    pub page: Option<u32>,

    /// Page size, clamped to what the connector accepts
    #[arg(long, default_value_t = 50)]
    pub page_size: u32,

    /// API token (overrides config)
    #[arg(short, long)]
    pub token: Option<String>,

    /// Base URL param as key=value, e.g. subdomain=acme (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Output format: json (default), compact
    #[arg(short, long, default_value = "json")]
    pub output: String,
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("invalid param '{}', expected key=value", s)),
    }
}

/// Run the get command
pub async fn run(args: GetArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let (profile, connector_config) = resolve_target(&config, &args)?;

    let connector = profile
        .connect(&connector_config)
        .with_context(|| format!("failed to create {} connector", profile.name))?;

    tracing::info!(
        connector = %args.target,
        entity = %args.entity,
        filters = args.filters.len(),
        "fetching entity"
    );

    match args.page {
        Some(page) => {
            let outcome = tokio::select! {
                outcome = fetch_page(&connector, &args, page) => outcome?,
                _ = tokio::signal::ctrl_c() => bail!("interrupted"),
            };
            let result = page_or_bail(outcome, profile.name, &args.entity)?;
            print_output(&result, &args.output)
        }
        None => {
            let outcome = tokio::select! {
                outcome = fetch(&connector, &args) => outcome?,
                _ = tokio::signal::ctrl_c() => bail!("interrupted"),
            };
            match outcome {
                FetchOutcome::Records(records) => print_output(&records, &args.output),
                FetchOutcome::Failed(failure) => {
                    bail!("{} {} request failed: {}", profile.name, args.entity, failure)
                }
            }
        }
    }
}

async fn fetch(connector: &RestConnector<HttpTransport>, args: &GetArgs) -> Result<FetchOutcome> {
    connector
        .fetch_entity(&args.entity, &args.filters)
        .await
        .with_context(|| format!("failed to fetch {}", args.entity))
}

async fn fetch_page(
    connector: &RestConnector<HttpTransport>,
    args: &GetArgs,
    page: u32,
) -> Result<PageOutcome> {
    connector
        .fetch_entity_page(&args.entity, &args.filters, page, args.page_size)
        .await
        .with_context(|| format!("failed to fetch {}", args.entity))
}

/// A failed page is an error, not an empty envelope
fn page_or_bail(outcome: PageOutcome, connector: &str, entity: &str) -> Result<PagedResult> {
    match outcome {
        PageOutcome::Page(page) => Ok(page),
        PageOutcome::Failed { failure, .. } => {
            bail!("{} {} request failed: {}", connector, entity, failure)
        }
    }
}

/// Pick the vendor profile and effective config for the target
fn resolve_target(
    config: &Config,
    args: &GetArgs,
) -> Result<(&'static VendorProfile, ConnectorConfig)> {
    let (profile, mut connector_config) = match config.connectors.get(&args.target) {
        Some(raw) => {
            if !raw.is_enabled() {
                bail!("connector '{}' is disabled in config", args.target);
            }
            let profile = vendor(&raw.connector_type).with_context(|| {
                format!(
                    "connector '{}' has unknown type '{}'",
                    args.target, raw.connector_type
                )
            })?;
            let parsed = ConnectorConfig::from_toml(&raw.config)
                .with_context(|| format!("invalid config for connector '{}'", args.target))?;
            (profile, parsed)
        }
        None => {
            let profile = vendor(&args.target).with_context(|| {
                format!(
                    "unknown connector '{}'. Available: {:?}",
                    args.target,
                    conduit_connectors::available_connectors()
                )
            })?;
            (profile, ConnectorConfig::default())
        }
    };

    if let Some(ref token) = args.token {
        connector_config.token = Some(token.clone());
    }
    for (key, value) in &args.params {
        connector_config.params.insert(key.clone(), value.clone());
    }

    Ok((profile, connector_config))
}

fn print_output<T: Serialize>(value: &T, format: &str) -> Result<()> {
    match format {
        "compact" => println!("{}", serde_json::to_string(value)?),
        _ => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_connectors::TransportFailure;
    use std::str::FromStr;

    fn args(target: &str) -> GetArgs {
        GetArgs {
            target: target.to_string(),
            entity: "invoices".to_string(),
            filters: Vec::new(),
            page: None,
            page_size: 50,
            token: None,
            params: Vec::new(),
            output: "json".to_string(),
        }
    }

    #[test]
    fn test_resolve_bare_vendor() {
        let (profile, config) = resolve_target(&Config::default(), &args("ZohoBooks")).unwrap();
        assert_eq!(profile.name, "zohobooks");
        assert!(config.token.is_none());
    }

    #[test]
    fn test_resolve_configured_name_with_overrides() {
        let config = Config::from_str(
            r#"
[connectors.support]
type = "zendesk"
token = "from-config"
params = { subdomain = "acme" }
"#,
        )
        .unwrap();
        let mut get = args("support");
        get.token = Some("from-cli".into());
        get.params = vec![("subdomain".into(), "other".into())];

        let (profile, resolved) = resolve_target(&config, &get).unwrap();
        assert_eq!(profile.name, "zendesk");
        assert_eq!(resolved.token.as_deref(), Some("from-cli"));
        assert_eq!(resolved.params.get("subdomain").map(String::as_str), Some("other"));
    }

    #[test]
    fn test_resolve_disabled_or_unknown() {
        let config = Config::from_str(
            r#"
[connectors.old]
type = "box"
enabled = false

[connectors.weird]
type = "nosuchvendor"
"#,
        )
        .unwrap();
        assert!(resolve_target(&config, &args("old")).is_err());
        assert!(resolve_target(&config, &args("weird")).is_err());
        assert!(resolve_target(&config, &args("nosuchvendor")).is_err());
    }

    #[test]
    fn test_failed_page_is_an_error() {
        let page = conduit_connectors::PagingStrategy::PagePerPage {
            page_param: "page",
            size_param: "per_page",
            min_size: 10,
            max_size: 200,
            totals: conduit_connectors::PageTotals::NONE,
        }
        .request(3, 20);

        let failed = PageOutcome::Failed {
            page: page.unanswered(),
            failure: TransportFailure::Status {
                status: 401,
                body: "unauthorized".into(),
            },
        };
        let err = page_or_bail(failed, "zohobooks", "invoices").unwrap_err();
        assert!(err.to_string().contains("401"));

        let empty = PageOutcome::Page(page.envelope(Vec::new(), &serde_json::Value::Null));
        assert!(page_or_bail(empty, "zohobooks", "invoices").unwrap().data.is_empty());
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("dc=us6").unwrap(),
            ("dc".to_string(), "us6".to_string())
        );
        assert!(parse_key_value("dc").is_err());
        assert!(parse_key_value("=x").is_err());
    }
}
