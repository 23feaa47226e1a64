//! Hello Service
//!
//! A minimal HTTP service built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (router, CORS, panic guard)
//!                         │
//!                         ├─▶ http::request (X-Request-ID, access log, metrics)
//!                         │
//!                         ├─▶ api (GET {prefix}/hello/world → greeting)
//!                         ├─▶ health (liveness, readiness)
//!                         └─▶ docs, /metrics, /
//!
//!     Cross-cutting: config, observability, lifecycle (startup/shutdown)
//! ```

use std::path::PathBuf;

use clap::Parser;

use hello_service::config::{load_config, process_env, validate_config, ConfigError};
use hello_service::lifecycle::{Application, Shutdown};
use hello_service::observability::logging;

#[derive(Parser)]
#[command(name = "hello-service")]
#[command(about = "Minimal HTTP service with greeting, health and metrics endpoints", long_about = None)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is not an error
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref(), process_env)?;
    if let Some(host) = cli.host {
        config.listener.host = host;
    }
    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config);

    tracing::info!(
        name = %config.project.name,
        version = %config.project.version,
        environment = %config.environment,
        "Starting application"
    );
    tracing::info!(
        bind_address = %config.bind_address(),
        api_prefix = %config.api.prefix,
        debug = config.debug,
        "Configuration loaded"
    );

    let app = Application::build(config).await?;
    tracing::info!(address = %app.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let stop = shutdown.trigger_on_signal();

    app.run_until_stopped(stop).await?;
    Ok(())
}
