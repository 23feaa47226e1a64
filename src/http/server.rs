//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (request instrumentation, tracing, CORS, panics)
//! - Serve on a listener until the shutdown signal

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::openapi::OpenApi as OpenApiDoc;

use crate::api;
use crate::config::{AppConfig, CorsOrigins};
use crate::health::{self, Readiness};
use crate::http::docs::{self, DOCS_URL};
use crate::http::error;
use crate::http::request::instrument_request;
use crate::http::response::RootResponse;
use crate::lifecycle::SharedResources;
use crate::observability::metrics::EXPOSITION_CONTENT_TYPE;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub resources: Arc<SharedResources>,
    pub readiness: Readiness,
    pub metrics: PrometheusHandle,
    pub openapi: Arc<OpenApiDoc>,
}

impl AppState {
    pub fn new(config: AppConfig, resources: Arc<SharedResources>, metrics: PrometheusHandle) -> Self {
        let readiness = Readiness::standard(resources.clone());
        let openapi = Arc::new(docs::build_openapi(&config));
        Self {
            config: Arc::new(config),
            resources,
            readiness,
            metrics,
            openapi,
        }
    }
}

/// HTTP server for the service.
pub struct HttpServer {
    router: Router,
    config: Arc<AppConfig>,
}

impl HttpServer {
    /// Create a new HTTP server over the given state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(state: AppState) -> Router {
        let config = state.config.clone();
        Self::with_layers(Self::routes(&state).with_state(state), &config)
    }

    /// Every route, fallbacks included, without middleware.
    fn routes(state: &AppState) -> Router<AppState> {
        let config = &state.config;

        Router::new()
            .route("/", get(root))
            .route("/metrics", get(metrics))
            .merge(docs::router::<AppState>(config, state.openapi.as_ref().clone()))
            .merge(health::router())
            .nest(&config.api.prefix, api::v1_router())
            .fallback(error::not_found)
            .method_not_allowed_fallback(error::method_not_allowed)
    }

    /// Wrap a router in the middleware stack.
    ///
    /// Layers run outermost first: instrumentation sees every request and
    /// response, the panic catcher sits innermost so a panicking handler
    /// still produces a normalized body with the request's id.
    fn with_layers(router: Router, config: &AppConfig) -> Router {
        router
            .layer(CatchPanicLayer::custom(error::handle_panic))
            .layer(cors_layer(config))
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn(instrument_request))
    }

    /// The router, for serving or for driving directly in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires. In-flight requests are drained before returning.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            environment = %self.config.environment,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS];
    let base = CorsLayer::new().allow_methods(methods);

    if config.is_production() && config.cors.origins() == CorsOrigins::Any {
        tracing::warn!(
            replacement = ?config.cors.production_origins,
            "Wildcard CORS origin rejected in production"
        );
    }

    match config.cors_origins() {
        // Credentials cannot be combined with a wildcard origin.
        CorsOrigins::Any => base.allow_origin(Any).allow_headers(Any),
        CorsOrigins::List(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            base.allow_origin(AllowOrigin::list(origins))
                .allow_headers(AllowHeaders::mirror_request())
                .allow_credentials(true)
        }
    }
}

/// Service banner.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = RootResponse))
)]
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let project = &state.config.project;
    Json(RootResponse {
        message: format!("Welcome to {} API", project.name),
        version: project.version.clone(),
        docs_url: DOCS_URL.to_string(),
    })
}

/// Prometheus scrape endpoint.
#[utoipa::path(
    get,
    path = "/metrics",
    responses((status = 200, description = "Metrics in text exposition format", content_type = "text/plain", body = String))
)]
pub async fn metrics(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        state.metrics.render(),
    )
        .into_response()
}
