//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files, and
//! every section has defaults so an empty file (or no file) is valid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Project metadata shown on `/` and in the OpenAPI document.
    pub project: ProjectConfig,

    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Path prefix for versioned API routes.
    pub api: ApiConfig,

    /// Cross-origin resource sharing.
    pub cors: CorsConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Outbound HTTP client bounds.
    pub http_client: HttpClientConfig,

    /// Deployment environment.
    pub environment: Environment,

    /// Debug mode (verbose logging).
    pub debug: bool,
}

impl AppConfig {
    /// Whether the service runs in production.
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Bind address in `host:port` form.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listener.host, self.listener.port)
    }

    /// Effective CORS allow-list.
    ///
    /// In production a wildcard is never honored; the explicit production
    /// list takes its place.
    pub fn cors_origins(&self) -> CorsOrigins {
        match self.cors.origins() {
            CorsOrigins::Any if self.is_production() => {
                CorsOrigins::List(self.cors.production_origins.clone())
            }
            origins => origins,
        }
    }

    /// Servers advertised in the OpenAPI document.
    pub fn servers(&self) -> Vec<ServerEntry> {
        let production = ServerEntry {
            url: PRODUCTION_SERVER_URL.to_string(),
            description: "Production server".to_string(),
        };
        if self.is_production() {
            vec![production]
        } else {
            vec![
                ServerEntry {
                    url: DEVELOPMENT_SERVER_URL.to_string(),
                    description: "Development server".to_string(),
                },
                production,
            ]
        }
    }
}

pub const DEVELOPMENT_SERVER_URL: &str = "http://localhost:8000";
pub const PRODUCTION_SERVER_URL: &str = "https://api.example.com";

/// An entry of the OpenAPI `servers` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEntry {
    pub url: String,
    pub description: String,
}

/// Project metadata.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub description: String,
    pub version: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_url: Option<String>,
    pub license_name: Option<String>,
    pub license_url: Option<String>,
    pub terms_of_service: Option<String>,
}

impl ProjectConfig {
    /// True when any contact field is set.
    pub fn has_contact(&self) -> bool {
        self.contact_name.is_some() || self.contact_email.is_some() || self.contact_url.is_some()
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Hello Service".to_string(),
            description: "Minimal HTTP service template with health checks and Prometheus metrics"
                .to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_name: None,
            contact_email: None,
            contact_url: None,
            license_name: None,
            license_url: None,
            terms_of_service: None,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind host (e.g., "0.0.0.0").
    pub host: String,

    /// Bind port.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Versioned API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Prefix the v1 routes are nested under (e.g., "/api/v1").
    pub prefix: String,
}

impl ApiConfig {
    /// Location of the OpenAPI document.
    pub fn openapi_url(&self) -> String {
        format!("{}/openapi.json", self.prefix)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: "/api/v1".to_string(),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Raw origin setting: `*` or a comma-separated list.
    pub allow_origins: String,

    /// Allow-list used in production when `allow_origins` is `*`.
    pub production_origins: Vec<String>,
}

impl CorsConfig {
    /// Parse the raw origin setting.
    pub fn origins(&self) -> CorsOrigins {
        parse_origins(&self.allow_origins)
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: "*".to_string(),
            production_origins: vec![PRODUCTION_SERVER_URL.to_string()],
        }
    }
}

/// Parsed CORS origins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// Any origin.
    Any,
    /// An explicit allow-list.
    List(Vec<String>),
}

/// Split a `*` or comma-separated origin string.
///
/// A `*` anywhere in the list means any origin.
pub fn parse_origins(raw: &str) -> CorsOrigins {
    let origins: Vec<String> = raw.split(',').map(|o| o.trim().to_string()).collect();
    if origins.iter().any(|o| o == "*") {
        CorsOrigins::Any
    } else {
        CorsOrigins::List(origins)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Compact,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Json,
}

/// Outbound HTTP client bounds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Total request timeout in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Maximum concurrent outbound requests.
    pub max_connections: usize,

    /// Idle connections kept alive per host.
    pub max_idle_connections: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_connections: 100,
            max_idle_connections: 20,
        }
    }
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}
