//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request instrumentation and error normalizer produce:
//!     → logging.rs (structured log events, request_id on every line)
//!     → metrics.rs (counters, histograms, lifecycle gauge)
//!
//! Consumers:
//!     → stdout (compact or JSON)
//!     → GET /metrics (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
