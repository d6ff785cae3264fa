//! Entities command - show what a connector can fetch

use anyhow::{Context, Result};
use clap::Args;
use conduit_connectors::{EndpointDescriptor, HttpMethod, vendor};

/// Entities command arguments
#[derive(Args, Debug)]
pub struct EntitiesArgs {
    /// Connector type (see `conduit connectors`)
    #[arg(value_name = "CONNECTOR")]
    connector: String,
}

/// Run the entities command
pub fn run(args: EntitiesArgs) -> Result<()> {
    let profile = vendor(&args.connector).with_context(|| {
        format!(
            "unknown connector '{}'. Available: {:?}",
            args.connector,
            conduit_connectors::available_connectors()
        )
    })?;
    let catalog = profile.catalog();

    println!("{:<24} {:<48} {}", "ENTITY", "ENDPOINT", "REQUIRES");
    for (name, descriptor) in catalog.iter() {
        println!(
            "{:<24} {:<48} {}",
            name,
            descriptor.template(),
            describe(descriptor)
        );
    }

    Ok(())
}

/// Required filters plus writable methods, e.g. `organization_id [POST]`
fn describe(descriptor: &EndpointDescriptor) -> String {
    let mut out = descriptor.required_filters().join(", ");
    let writes: Vec<&str> = [HttpMethod::Post, HttpMethod::Put]
        .into_iter()
        .filter(|m| descriptor.accepts(*m))
        .map(HttpMethod::as_str)
        .collect();
    if !writes.is_empty() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("[{}]", writes.join(", ")));
    }
    out
}
