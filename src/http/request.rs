//! Request instrumentation.
//!
//! # Responsibilities
//! - Generate a short correlation id for every inbound request
//! - Keep it in request-scoped context for handlers and the error normalizer
//! - Stamp it on the response as `X-Request-ID`
//! - Emit the access log line and request metrics
//!
//! # Design Decisions
//! - Ids are always generated here; inbound `X-Request-ID` headers are ignored
//! - The id lives in a task-local for the lifetime of the request future,
//!   so nothing outside the request can observe it

use std::fmt;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::observability::metrics;

/// Response header carrying the correlation id.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Length of a generated correlation id.
pub const REQUEST_ID_LEN: usize = 8;

tokio::task_local! {
    static CURRENT_REQUEST_ID: RequestId;
}

/// Per-request correlation id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a fresh id: the first 8 hex digits of a random v4 UUID.
    pub fn generate() -> Self {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(REQUEST_ID_LEN);
        Self(id)
    }

    /// The id assigned to the request currently being served, if any.
    pub fn current() -> Option<Self> {
        CURRENT_REQUEST_ID.try_with(Clone::clone).ok()
    }

    /// The current id, or a freshly generated one when called outside an
    /// instrumented request.
    pub fn current_or_generate() -> Self {
        Self::current().unwrap_or_else(Self::generate)
    }

    /// Run `fut` with `self` as the current request id.
    pub async fn scope<F: std::future::Future>(self, fut: F) -> F::Output {
        CURRENT_REQUEST_ID.scope(self, fut).await
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Middleware wrapping every request, including ones that never reach a
/// handler (unknown paths, CORS preflight, panics).
pub async fn instrument_request(mut request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = RequestId::generate();
    request.extensions_mut().insert(request_id.clone());

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let handler = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "none".to_string());

    let mut response = request_id.clone().scope(next.run(request)).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = response.status();
    let elapsed = start.elapsed();
    metrics::record_request(method.as_str(), &handler, status.as_u16(), elapsed);

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = status.as_u16(),
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "Request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_short_hex() {
        let id = RequestId::generate();
        assert_eq!(id.as_str().len(), REQUEST_ID_LEN);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_ids_do_not_repeat() {
        let ids: HashSet<_> = (0..200).map(|_| RequestId::generate()).collect();
        assert_eq!(ids.len(), 200);
    }

    #[tokio::test]
    async fn current_is_visible_only_inside_scope() {
        assert!(RequestId::current().is_none());

        let id = RequestId::generate();
        let seen = id.clone().scope(async { RequestId::current() }).await;
        assert_eq!(seen, Some(id));

        assert!(RequestId::current().is_none());
    }

    #[test]
    fn current_or_generate_falls_back() {
        let id = RequestId::current_or_generate();
        assert_eq!(id.as_str().len(), REQUEST_ID_LEN);
    }
}
