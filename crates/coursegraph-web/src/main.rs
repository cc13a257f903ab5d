use anyhow::{Context, Result};
use clap::Parser;
use coursegraph_core::{
    telemetry::{init_tracing, with_bootstrap_logging},
    ConfigManager,
};
use coursegraph_web::WebServer;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coursegraph-web")]
#[command(about = "CourseGraph web - course list and detail pages", long_about = None)]
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

    /// Base URL of the Query Service, e.g. http://localhost:3001/api
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = with_bootstrap_logging(|| {
        ConfigManager::new_with(cli.config_dir, cli.env, |settings| {
            if let Some(host) = cli.host {
                settings.web.host = host;
            }
            if let Some(port) = cli.port {
                settings.web.port = port;
            }
            if let Some(api_url) = cli.api_url {
                settings.web.api_base_url = api_url;
            }
        })
    })
    .context("loading configuration")?;
    let settings = config.into_settings();
    settings
        .validate_web()
        .context("validating configuration")?;

    init_tracing(&settings.logging, "tower_http=debug");

    WebServer::new(&settings.web)?.run().await
}
