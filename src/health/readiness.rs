//! Readiness aggregation.
//!
//! Each dependency contributes one named boolean check. The aggregate is a
//! plain AND: one unhealthy check makes the service `not_ready`.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use crate::http::response::{CheckStatus, ReadyResponse};
use crate::lifecycle::SharedResources;

/// A single readiness dependency.
pub trait HealthCheck: Send + Sync {
    /// Key under which the result appears in `checks`.
    fn name(&self) -> &'static str;

    fn is_healthy(&self) -> bool;
}

/// The shared outbound client is initialized.
pub struct HttpClientCheck {
    resources: Arc<SharedResources>,
}

impl HttpClientCheck {
    pub fn new(resources: Arc<SharedResources>) -> Self {
        Self { resources }
    }
}

impl HealthCheck for HttpClientCheck {
    fn name(&self) -> &'static str {
        "http_client"
    }

    fn is_healthy(&self) -> bool {
        self.resources.is_ready()
    }
}

/// The process is up and serving; always healthy.
pub struct ApplicationCheck;

impl HealthCheck for ApplicationCheck {
    fn name(&self) -> &'static str {
        "application"
    }

    fn is_healthy(&self) -> bool {
        true
    }
}

/// Registered readiness checks.
#[derive(Clone, Default)]
pub struct Readiness {
    checks: Vec<Arc<dyn HealthCheck>>,
}

impl Readiness {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard set: shared HTTP client plus the application itself.
    pub fn standard(resources: Arc<SharedResources>) -> Self {
        Self::new()
            .with_check(HttpClientCheck::new(resources))
            .with_check(ApplicationCheck)
    }

    pub fn with_check(mut self, check: impl HealthCheck + 'static) -> Self {
        self.checks.push(Arc::new(check));
        self
    }

    /// Query every check now and fold the results.
    pub fn evaluate(&self) -> ReadyResponse {
        let checks: BTreeMap<String, CheckStatus> = self
            .checks
            .iter()
            .map(|check| (check.name().to_string(), CheckStatus::from(check.is_healthy())))
            .collect();

        for (name, status) in &checks {
            if *status == CheckStatus::Unhealthy {
                tracing::warn!(check = %name, "Readiness check unhealthy");
            }
        }

        ReadyResponse::from_checks(checks, Utc::now())
    }
}
