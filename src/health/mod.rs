//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! GET /health        → handlers::liveness  (no dependencies consulted)
//! GET /health/ready  → handlers::readiness
//!                        → readiness.rs queries every registered check
//!                        → AND over the results → ReadyResponse
//! ```
//!
//! # Design Decisions
//! - Checks are synchronous and cheap; they read state, they do not probe
//! - Readiness is reported in the body, the status code is always 200
//! - Adding a dependency means registering one more `HealthCheck`

pub mod handlers;
pub mod readiness;

use axum::{routing::get, Router};

use crate::http::server::AppState;

pub use readiness::{ApplicationCheck, HealthCheck, HttpClientCheck, Readiness};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::liveness))
        .route("/health/ready", get(handlers::readiness))
}
