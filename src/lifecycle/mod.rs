//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Install metrics → Initialize shared resources → Bind listener
//!
//! Serving:
//!     HttpServer::run until Shutdown fires
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger → Stop accepting → Drain
//!     → Close shared resources → Exit
//! ```
//!
//! # Design Decisions
//! - Resources are Ready before the first request can be accepted
//! - Resources close only after the server has drained

pub mod resources;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use resources::{OutboundClient, OutboundResponse, ResourceError, ResourceState, SharedResources};
pub use shutdown::Shutdown;
pub use startup::{Application, StartupError};
