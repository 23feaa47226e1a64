//! Structured logging.
//!
//! `RUST_LOG` wins when set; otherwise the level follows the debug flag.
//! `LOG_FORMAT=json` selects JSON lines, anything else the compact format.

use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LogFormat};

/// Default filter directives for the given debug flag.
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "hello_service=debug,tower_http=debug"
    } else {
        "hello_service=info,tower_http=info"
    }
}

/// Initialize the global subscriber and the panic hook.
pub fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config.debug)));

    match config.observability.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init(),
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init(),
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}
