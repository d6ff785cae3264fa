//! Conduit - REST entity connectors from the command line
//!
//! # Usage
//!
//! ```bash
//! # What is compiled in
//! conduit connectors
//! conduit entities zohobooks
//!
//! # Fetch records (vendor name or a [connectors.<name>] entry)
//! conduit get box folder_items -f folder_id=0 --token $BOX_TOKEN
//! conduit --config conduit.toml get books invoices -f status=unpaid --page 2 --page-size 50
//! ```
//!
//! Records go to stdout, logs to stderr.

mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use conduit_config::Config;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Conduit - fetch entities from REST APIs
#[derive(Parser, Debug)]
#[command(name = "conduit")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List compiled-in connectors and configured instances
    Connectors,

    /// List the entities a connector can fetch
    Entities(cmd::entities::EntitiesArgs),

    /// Fetch records for one entity
    Get(cmd::get::GetArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = resolve_log_level(cli.log_level.as_deref(), cli.config.as_deref());
    init_logging(&log_level)?;

    match cli.command {
        Command::Connectors => cmd::connectors::run(cli.config.as_deref()),
        Command::Entities(args) => cmd::entities::run(args),
        Command::Get(args) => cmd::get::run(args, cli.config.as_deref()).await,
    }
}

/// Resolve log level: CLI flag > config file > default "info"
fn resolve_log_level(cli_level: Option<&str>, config_path: Option<&Path>) -> String {
    if let Some(level) = cli_level {
        return level.to_string();
    }

    if let Some(path) = config_path
        && path.exists()
        && let Ok(config) = Config::from_file(path)
    {
        return config.log.level.as_str().to_string();
    }

    "info".to_string()
}

/// Initialize the tracing subscriber, writing to stderr
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_level_flag_wins() {
        assert_eq!(resolve_log_level(Some("trace"), None), "trace");
        assert_eq!(resolve_log_level(None, None), "info");
        assert_eq!(
            resolve_log_level(None, Some(Path::new("/definitely/not/here.toml"))),
            "info"
        );
    }

    #[test]
    fn test_parse_get() {
        let cli = Cli::try_parse_from([
            "conduit",
            "--log-level",
            "debug",
            "get",
            "zohobooks",
            "invoices",
            "-f",
            "organization_id=1",
            "-f",
            "status=unpaid",
            "--page",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Command::Get(args) => {
                assert_eq!(args.filters.len(), 2);
                assert_eq!(args.page, Some(2));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_bad_filter_rejected() {
        let result = Cli::try_parse_from(["conduit", "get", "box", "users", "-f", "novalue"]);
        assert!(result.is_err());
    }
}
