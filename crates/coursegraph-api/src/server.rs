use crate::{create_router, store::open_store, AppState};
use coursegraph_core::{CourseGraphError, CourseStore, Result, Settings};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

pub struct Server {
    state: AppState,
    store: Arc<dyn CourseStore>,
    settings: Settings,
}

impl Server {
    /// Open the configured store. The store lives as long as the server.
    pub async fn new(settings: Settings) -> Result<Self> {
        let store = open_store(&settings.database).await?;
        Ok(Self::with_store(settings, store))
    }

    pub fn with_store(settings: Settings, store: Arc<dyn CourseStore>) -> Self {
        let state = AppState::new(store.clone(), settings.api.clone());
        Self {
            state,
            store,
            settings,
        }
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        let host = &self.settings.server.host;
        format!("{}:{}", host, self.settings.server.port)
            .parse()
            .map_err(|e| CourseGraphError::Config(format!("invalid server address {host}: {e}")))
    }

    pub async fn run(self) -> Result<()> {
        let addr = self.addr()?;
        let listener = bind(addr)?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until a shutdown signal, then close
    /// the store.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let router = create_router(self.state, &self.settings.cors);

        info!(
            "CourseGraph API listening on http://{}",
            listener.local_addr()?
        );
        info!("  GET /api/courses - Course list with average GPA");
        info!("  GET /api/courses/{{code}} - Course detail");
        info!("  GET /health, /health/ready - Liveness and readiness");

        let served = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        self.store.close().await;
        info!("Catalog store closed");
        served.map_err(CourseGraphError::Io)
    }
}

/// Bind with tuned socket options for better keep-alive behavior.
fn bind(addr: SocketAddr) -> Result<TcpListener> {
    let socket = if addr.is_ipv6() {
        tokio::net::TcpSocket::new_v6()
    } else {
        tokio::net::TcpSocket::new_v4()
    }?;

    let _ = socket.set_reuseaddr(true);
    let _ = socket.set_keepalive(true);
    socket.bind(addr)?;
    Ok(socket.listen(1024)?)
}

pub async fn shutdown_signal() {
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
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}
