//! Versioned API routes, nested under the configured prefix.

pub mod hello;

use axum::Router;
use utoipa::OpenApi;

use crate::http::response::{ErrorResponse, GreetingResponse, ResponseStatus};
use crate::http::server::AppState;

/// OpenAPI paths of the v1 API, relative to the prefix.
#[derive(OpenApi)]
#[openapi(
    paths(hello::hello_world),
    components(schemas(GreetingResponse, ResponseStatus, ErrorResponse)),
    tags((name = "hello", description = "Greeting"))
)]
pub struct V1Api;

/// Routes of the v1 API.
pub fn v1_router() -> Router<AppState> {
    Router::new().nest("/hello", hello::router())
}
