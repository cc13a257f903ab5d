use anyhow::{Context, Result};
use clap::Parser;
use coursegraph_api::Server;
use coursegraph_core::{
    telemetry::{init_tracing, with_bootstrap_logging},
    ConfigManager, DatabaseBackend,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coursegraph-api")]
#[command(about = "CourseGraph Query Service - read-only REST API over the course catalog", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding default.toml, {env}.toml and local.toml
    #[arg(long, env = "COURSEGRAPH_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Configuration environment (development, production, ...)
    #[arg(long, env = "COURSEGRAPH_ENV")]
    env: Option<String>,

    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// Bind port
    #[arg(short, long)]
    port: Option<u16>,

    /// Serve the catalog from a JSON fixture instead of MySQL
    #[arg(long)]
    fixture: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = with_bootstrap_logging(|| {
        ConfigManager::new_with(cli.config_dir, cli.env, |settings| {
            if let Some(host) = cli.host {
                settings.server.host = host;
            }
            if let Some(port) = cli.port {
                settings.server.port = port;
            }
            if let Some(path) = cli.fixture {
                settings.database.backend = DatabaseBackend::Fixture;
                settings.database.fixture_path = Some(path);
            }
        })
    })
    .context("loading configuration")?;
    let settings = config.into_settings();
    settings
        .validate_api()
        .context("validating configuration")?;

    init_tracing(&settings.logging, "tower_http=debug");

    let server = Server::new(settings)
        .await
        .context("opening catalog store")?;
    server.run().await.context("running API server")?;
    Ok(())
}
