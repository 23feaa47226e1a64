//! Configuration validation.
//!
//! Serde handles the syntax; this checks value ranges and shapes.
//! All problems are reported, not just the first one.

use crate::config::schema::{AppConfig, CorsOrigins};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::new("listener.host", "must not be empty"));
    }
    if config.listener.port == 0 {
        errors.push(ValidationError::new("listener.port", "must be non-zero"));
    }

    let prefix = &config.api.prefix;
    if prefix == "/" {
        errors.push(ValidationError::new("api.prefix", "must not be the root path"));
    } else if !prefix.starts_with('/') {
        errors.push(ValidationError::new("api.prefix", "must start with '/'"));
    }
    if prefix.len() > 1 && prefix.ends_with('/') {
        errors.push(ValidationError::new("api.prefix", "must not end with '/'"));
    }

    if config.project.version.trim().is_empty() {
        errors.push(ValidationError::new("project.version", "must not be empty"));
    }

    if let CorsOrigins::List(origins) = config.cors.origins() {
        if origins.iter().any(|o| o.is_empty()) {
            errors.push(ValidationError::new(
                "cors.allow_origins",
                "contains an empty origin",
            ));
        }
    }
    if config.cors.production_origins.iter().any(|o| o.trim().is_empty() || o == "*") {
        errors.push(ValidationError::new(
            "cors.production_origins",
            "must list explicit origins",
        ));
    }

    if config.http_client.max_connections == 0 {
        errors.push(ValidationError::new(
            "http_client.max_connections",
            "must be non-zero",
        ));
    }
    if config.http_client.timeout_secs == 0 || config.http_client.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "http_client",
            "timeouts must be non-zero",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = AppConfig::default();
        config.listener.port = 0;
        config.api.prefix = "api/v1/".into();
        config.cors.allow_origins = "https://a.com,,https://b.com".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["listener.port", "api.prefix", "api.prefix", "cors.allow_origins"]
        );
    }

    #[test]
    fn rejects_wildcard_in_production_list() {
        let mut config = AppConfig::default();
        config.cors.production_origins = vec!["*".into()];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "cors.production_origins");
    }
}
