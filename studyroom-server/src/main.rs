//! Studyroom Server Binary
//!
//! Serves the attendance REST API over a SQLite-backed session store.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;

use studyroom_config::{ConfigLoader, StudyroomConfig};
use studyroom_server::{init_tracing, Server};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Server bind address override, host:port
    #[arg(short, long)]
    bind: Option<String>,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Log level override
    #[arg(long)]
    log_level: Option<String>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration with environment overrides, then apply CLI flags
    let mut config = ConfigLoader::new().load(cli.config.as_ref())?;
    apply_cli_overrides(&mut config, &cli)?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    init_tracing(&config.logging)?;

    let server = Server::new(config).await?;
    server.start().await
}

/// Apply CLI argument overrides to configuration
fn apply_cli_overrides(config: &mut StudyroomConfig, cli: &Cli) -> Result<()> {
    if let Some(bind) = &cli.bind {
        let (host, port) = bind
            .rsplit_once(':')
            .ok_or_else(|| anyhow!("Invalid bind address '{}': expected host:port", bind))?;
        config.server.bind_address = host.to_string();
        config.server.port = port
            .parse()
            .map_err(|e| anyhow!("Invalid bind address '{}': {}", bind, e))?;
    }

    if let Some(url) = &cli.database_url {
        config.database.url = url.clone();
    }

    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    config.validate_all()?;
    Ok(())
}
