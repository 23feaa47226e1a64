//! Shared resources that outlive individual requests.
//!
//! # States
//! ```text
//! Uninitialized → Ready → Closed
//! ```
//! `initialize()` runs once at startup before the listener accepts traffic;
//! `close()` runs once after the server has drained. Handlers only ever see
//! `Ready`; anything else is a wiring bug and [`SharedResources::client`]
//! panics on it.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::config::HttpClientConfig;
use crate::observability::metrics;

/// Lifecycle state of [`SharedResources`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    Uninitialized,
    Ready,
    Closed,
}

impl ResourceState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ResourceState::Uninitialized,
            1 => ResourceState::Ready,
            _ => ResourceState::Closed,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            ResourceState::Uninitialized => 0,
            ResourceState::Ready => 1,
            ResourceState::Closed => 2,
        }
    }
}

/// Error type for resource lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("invalid lifecycle transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: ResourceState,
        to: ResourceState,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// The long-lived outbound HTTP client.
///
/// `reqwest` pools connections but does not cap them, so a semaphore bounds
/// the number of requests in flight.
#[derive(Debug)]
pub struct OutboundClient {
    http: reqwest::Client,
    permits: Arc<Semaphore>,
    max_connections: usize,
}

impl OutboundClient {
    pub fn new(config: &HttpClientConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(config.max_idle_connections)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            http,
            permits: Arc::new(Semaphore::new(config.max_connections)),
            max_connections: config.max_connections,
        })
    }

    /// The underlying client, for building requests.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Wait for an outbound slot. Hold the permit until the response body
    /// has been consumed.
    pub async fn acquire(&self) -> OwnedSemaphorePermit {
        self.permits
            .clone()
            .acquire_owned()
            .await
            .expect("outbound semaphore is never closed")
    }

    /// Send a request built from [`Self::http`], respecting the concurrency cap.
    ///
    /// The slot stays taken until the returned response, body included, is
    /// consumed or dropped.
    pub async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<OutboundResponse, reqwest::Error> {
        let permit = self.acquire().await;
        let response = request.send().await?;
        Ok(OutboundResponse {
            response,
            _permit: permit,
        })
    }

    /// Outbound slots currently free.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }
}

/// A response that holds its outbound slot until the body is read.
#[derive(Debug)]
pub struct OutboundResponse {
    response: reqwest::Response,
    _permit: OwnedSemaphorePermit,
}

impl OutboundResponse {
    pub fn status(&self) -> reqwest::StatusCode {
        self.response.status()
    }

    pub fn headers(&self) -> &reqwest::header::HeaderMap {
        self.response.headers()
    }

    /// Read the body as text, then release the slot.
    pub async fn text(self) -> Result<String, reqwest::Error> {
        self.response.text().await
    }

    /// Read the body as JSON, then release the slot.
    pub async fn json<T: serde::de::DeserializeOwned>(self) -> Result<T, reqwest::Error> {
        self.response.json().await
    }
}

/// Container for resources shared by all handlers.
///
/// Constructed explicitly at startup and handed to the router through the
/// app state.
#[derive(Debug)]
pub struct SharedResources {
    config: HttpClientConfig,
    state: AtomicU8,
    http_client: ArcSwapOption<OutboundClient>,
}

impl SharedResources {
    /// Create the container in the `Uninitialized` state.
    pub fn new(config: HttpClientConfig) -> Self {
        Self {
            config,
            state: AtomicU8::new(ResourceState::Uninitialized.as_u8()),
            http_client: ArcSwapOption::empty(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ResourceState {
        ResourceState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_ready(&self) -> bool {
        self.state() == ResourceState::Ready && self.http_client.load().is_some()
    }

    /// `Uninitialized → Ready`: build the outbound client.
    pub fn initialize(&self) -> Result<(), ResourceError> {
        let client = OutboundClient::new(&self.config)?;
        self.transition(ResourceState::Uninitialized, ResourceState::Ready)?;
        self.http_client.store(Some(Arc::new(client)));
        metrics::record_resources_ready(true);

        tracing::info!(
            timeout_secs = self.config.timeout_secs,
            connect_timeout_secs = self.config.connect_timeout_secs,
            max_connections = self.config.max_connections,
            max_idle_connections = self.config.max_idle_connections,
            "Shared resources initialized"
        );
        Ok(())
    }

    /// `Ready → Closed`: drop the outbound client.
    ///
    /// Requests still holding an `Arc` to the client finish with it; the
    /// pool is released once the last one drops.
    pub fn close(&self) -> Result<(), ResourceError> {
        self.transition(ResourceState::Ready, ResourceState::Closed)?;
        self.http_client.store(None);
        metrics::record_resources_ready(false);
        tracing::info!("Shared resources closed");
        Ok(())
    }

    /// The outbound client, if present.
    pub fn try_client(&self) -> Option<Arc<OutboundClient>> {
        self.http_client.load_full()
    }

    /// The outbound client.
    ///
    /// # Panics
    /// If the resources are not `Ready`. Handlers are only reachable after
    /// `initialize()` and before `close()`, so this indicates broken wiring.
    pub fn client(&self) -> Arc<OutboundClient> {
        match (self.state(), self.try_client()) {
            (ResourceState::Ready, Some(client)) => client,
            (state, _) => panic!("shared HTTP client accessed in state {state:?}"),
        }
    }

    fn transition(&self, from: ResourceState, to: ResourceState) -> Result<(), ResourceError> {
        self.state
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|actual| ResourceError::InvalidTransition {
                from: ResourceState::from_u8(actual),
                to,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resources() -> SharedResources {
        SharedResources::new(HttpClientConfig::default())
    }

    #[test]
    fn starts_uninitialized_without_client() {
        let res = resources();
        assert_eq!(res.state(), ResourceState::Uninitialized);
        assert!(!res.is_ready());
        assert!(res.try_client().is_none());
    }

    #[test]
    fn full_lifecycle() {
        let res = resources();
        res.initialize().unwrap();
        assert_eq!(res.state(), ResourceState::Ready);
        assert!(res.is_ready());
        assert_eq!(res.client().max_connections(), 100);

        res.close().unwrap();
        assert_eq!(res.state(), ResourceState::Closed);
        assert!(!res.is_ready());
        assert!(res.try_client().is_none());
    }

    #[test]
    fn initialize_happens_once() {
        let res = resources();
        res.initialize().unwrap();
        let err = res.initialize().unwrap_err();
        assert!(matches!(
            err,
            ResourceError::InvalidTransition {
                from: ResourceState::Ready,
                to: ResourceState::Ready
            }
        ));
    }

    #[test]
    fn close_requires_ready() {
        let res = resources();
        assert!(res.close().is_err());

        res.initialize().unwrap();
        res.close().unwrap();
        assert!(res.close().is_err());
        assert!(res.initialize().is_err());
    }

    #[test]
    #[should_panic(expected = "Uninitialized")]
    fn client_before_initialize_panics() {
        resources().client();
    }

    #[test]
    #[should_panic(expected = "Closed")]
    fn client_after_close_panics() {
        let res = resources();
        res.initialize().unwrap();
        res.close().unwrap();
        res.client();
    }

    async fn pong_server() -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = axum::Router::new().route("/", axum::routing::get(|| async { "pong" }));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn slot_is_held_until_body_is_read() {
        let addr = pong_server().await;

        let mut config = HttpClientConfig::default();
        config.max_connections = 2;
        let client = OutboundClient::new(&config).unwrap();

        let response = client
            .send(client.http().get(format!("http://{addr}/")))
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(client.available_permits(), 1);

        assert_eq!(response.text().await.unwrap(), "pong");
        assert_eq!(client.available_permits(), 2);
    }

    #[tokio::test]
    async fn dropped_response_releases_its_slot() {
        let addr = pong_server().await;

        let client = OutboundClient::new(&HttpClientConfig::default()).unwrap();
        let response = client
            .send(client.http().get(format!("http://{addr}/")))
            .await
            .unwrap();
        assert_eq!(client.available_permits(), 99);

        drop(response);
        assert_eq!(client.available_permits(), 100);
    }

    #[tokio::test]
    async fn permits_bound_outbound_concurrency() {
        let mut config = HttpClientConfig::default();
        config.max_connections = 2;
        let client = OutboundClient::new(&config).unwrap();

        let first = client.acquire().await;
        let _second = client.acquire().await;
        assert_eq!(client.available_permits(), 0);

        drop(first);
        assert_eq!(client.available_permits(), 1);
    }
}
