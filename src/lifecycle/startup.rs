//! Startup orchestration.
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - The listener binds last, so traffic arrives only once resources are ready

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::AppConfig;
use crate::http::server::{AppState, HttpServer};
use crate::lifecycle::resources::{ResourceError, SharedResources};
use crate::observability::metrics;

/// Error type for starting and running the service.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to install metrics recorder: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
    #[error(transparent)]
    Resources(#[from] ResourceError),
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// A fully initialized service, bound and ready to accept traffic.
pub struct Application {
    server: HttpServer,
    listener: TcpListener,
    resources: Arc<SharedResources>,
}

impl Application {
    /// Install metrics, initialize shared resources, bind the listener.
    pub async fn build(config: AppConfig) -> Result<Self, StartupError> {
        let handle = metrics::install()?;

        let resources = Arc::new(SharedResources::new(config.http_client.clone()));
        resources.initialize()?;

        let address = config.bind_address();
        let listener = match TcpListener::bind(&address).await {
            Ok(listener) => listener,
            Err(source) => {
                // Nothing will serve requests; release what was acquired.
                let _ = resources.close();
                return Err(StartupError::Bind { address, source });
            }
        };

        let state = AppState::new(config, resources.clone(), handle);
        let server = HttpServer::new(state);

        Ok(Self {
            server,
            listener,
            resources,
        })
    }

    /// Address the listener is bound to (useful with port 0).
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Shared resources, for observing lifecycle state.
    pub fn resources(&self) -> Arc<SharedResources> {
        self.resources.clone()
    }

    /// Serve until `shutdown` fires, drain, then close shared resources.
    pub async fn run_until_stopped(
        self,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), StartupError> {
        let served = self.server.run(self.listener, shutdown).await;
        let closed = self.resources.close();

        served?;
        closed?;
        tracing::info!("Shutdown complete");
        Ok(())
    }
}
