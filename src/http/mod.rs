//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, middleware stack)
//!     → request.rs (correlation id, access log, metrics)
//!     → handlers (health, api, docs)
//!         → extract.rs (validated inputs)
//!         → response.rs (typed bodies)
//!         → error.rs (ApiError → ErrorResponse)
//!     → response with X-Request-ID
//! ```

pub mod docs;
pub mod error;
pub mod extract;
pub mod request;
pub mod response;
pub mod server;

pub use error::{ApiError, FieldError};
pub use extract::{Validate, ValidatedJson, ValidatedQuery};
pub use request::{RequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
