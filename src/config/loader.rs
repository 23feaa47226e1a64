//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::config::schema::{AppConfig, Environment, LogFormat};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {var}: {message}")]
    Env { var: &'static str, message: String },
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: defaults, then the optional TOML file, then the
/// environment, then validation.
///
/// `env` looks up a variable by name; pass [`process_env`] in production.
pub fn load_config<F>(path: Option<&Path>, env: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    apply_env(&mut config, env)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Read variables from the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Overlay environment variables onto a configuration.
pub fn apply_env<F>(config: &mut AppConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = env("PROJECT_NAME") {
        config.project.name = v;
    }
    if let Some(v) = env("PROJECT_DESCRIPTION") {
        config.project.description = v;
    }
    if let Some(v) = env("VERSION") {
        config.project.version = v;
    }
    if let Some(v) = env("API_V1_STR") {
        config.api.prefix = v;
    }
    if let Some(v) = env("BACKEND_CORS_ORIGINS") {
        config.cors.allow_origins = v;
    }
    if let Some(v) = env("PRODUCTION_CORS_ORIGINS") {
        config.cors.production_origins = v.split(',').map(|o| o.trim().to_string()).collect();
    }
    if let Some(v) = env("HOST") {
        config.listener.host = v;
    }
    if let Some(v) = env("PORT") {
        config.listener.port = parse_var("PORT", &v)?;
    }
    if let Some(v) = env("DEBUG") {
        config.debug = parse_bool("DEBUG", &v)?;
    }
    if let Some(v) = env("ENVIRONMENT") {
        config.environment =
            Environment::from_str(&v).map_err(|message| ConfigError::Env {
                var: "ENVIRONMENT",
                message,
            })?;
    }
    if let Some(v) = env("LOG_FORMAT") {
        config.observability.log_format = match v.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        };
    }

    let optional = |key: &str| env(key).filter(|v| !v.trim().is_empty());
    if let Some(v) = optional("CONTACT_NAME") {
        config.project.contact_name = Some(v);
    }
    if let Some(v) = optional("CONTACT_EMAIL") {
        config.project.contact_email = Some(v);
    }
    if let Some(v) = optional("CONTACT_URL") {
        config.project.contact_url = Some(v);
    }
    if let Some(v) = optional("LICENSE_NAME") {
        config.project.license_name = Some(v);
    }
    if let Some(v) = optional("LICENSE_URL") {
        config.project.license_url = Some(v);
    }
    if let Some(v) = optional("TERMS_OF_SERVICE") {
        config.project.terms_of_service = Some(v);
    }

    Ok(())
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        var,
        message: e.to_string(),
    })
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::Env {
            var,
            message: format!("expected a boolean, got '{other}'"),
        }),
    }
}
