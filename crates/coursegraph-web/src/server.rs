use crate::client::CatalogClient;
use crate::routes::{create_router, WebState};
use anyhow::{Context, Result};
use coursegraph_core::WebConfig;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

pub struct WebServer {
    state: WebState,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: &WebConfig) -> Result<Self> {
        let client = CatalogClient::new(config).context("building catalog client")?;
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .with_context(|| format!("invalid web address {}:{}", config.host, config.port))?;
        Ok(Self {
            state: WebState::new(client),
            addr,
        })
    }

    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("binding {}", self.addr))?;
        info!(
            "CourseGraph web listening on http://{} (catalog API at {})",
            listener.local_addr()?,
            self.state.client.base_url()
        );

        axum::serve(listener, create_router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("serving web pages")?;
        info!("Web server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down gracefully"),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}
