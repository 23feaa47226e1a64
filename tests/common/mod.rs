//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use hello_service::config::AppConfig;
use hello_service::lifecycle::{Application, SharedResources, Shutdown, StartupError};
use tokio::task::JoinHandle;

/// A service instance running on an ephemeral port.
pub struct TestApp {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub resources: Arc<SharedResources>,
    pub handle: JoinHandle<Result<(), StartupError>>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Build and start the service with the given configuration on 127.0.0.1:0.
pub async fn spawn_app_with(mut config: AppConfig) -> TestApp {
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;

    let app = Application::build(config).await.unwrap();
    let addr = app.local_addr().unwrap();
    let resources = app.resources();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(app.run_until_stopped(shutdown.subscribe()));

    TestApp {
        addr,
        shutdown,
        resources,
        handle,
        client: reqwest::Client::new(),
    }
}

#[allow(dead_code)]
pub async fn spawn_app() -> TestApp {
    spawn_app_with(AppConfig::default()).await
}
