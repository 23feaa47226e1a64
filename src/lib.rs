//! Minimal HTTP service: greeting, health probes, Prometheus metrics.

pub mod api;
pub mod config;
pub mod greeting;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::{Application, Shutdown};
