//! Connectors command - list compiled-in vendors and configured instances

use super::load_config;
use anyhow::Result;
use conduit_connectors::vendors;
use std::path::Path;

/// Run the connectors command
pub fn run(config_path: Option<&Path>) -> Result<()> {
    println!("{:<12} {:<44} {}", "CONNECTOR", "BASE URL", "PARAMS");
    for profile in vendors() {
        println!(
            "{:<12} {:<44} {}",
            profile.name,
            profile.base_url,
            profile.base_url_params().join(", ")
        );
    }

    let config = load_config(config_path)?;
    if !config.connectors.is_empty() {
        println!();
        println!("{:<20} {:<12} {}", "CONFIGURED", "TYPE", "ENABLED");
        for (name, connector) in config.connectors.iter() {
            println!(
                "{:<20} {:<12} {}",
                name,
                connector.connector_type,
                connector.is_enabled()
            );
        }
    }

    Ok(())
}
