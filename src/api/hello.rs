//! Hello world endpoint.

use axum::{routing::get, Json, Router};

use crate::greeting;
use crate::http::response::GreetingResponse;
use crate::http::server::AppState;

/// Return the greeting.
#[utoipa::path(
    get,
    path = "/hello/world",
    tag = "hello",
    responses(
        (status = 200, description = "Greeting", body = GreetingResponse),
        (status = 500, description = "Unexpected failure", body = crate::http::response::ErrorResponse)
    )
)]
#[tracing::instrument(name = "hello_world", skip_all)]
pub async fn hello_world() -> Json<GreetingResponse> {
    let greeting = greeting::get_greeting();
    tracing::debug!("greeting served");
    Json(greeting)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/world", get(hello_world))
}
