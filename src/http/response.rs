//! Response schemas.
//!
//! Every body the service returns is one of these records. They are built
//! fully before serialization and carry UTC timestamps, which serialize as
//! RFC 3339 (ISO-8601) strings.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome reported by the greeting endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Body of `GET {prefix}/hello/world`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GreetingResponse {
    /// Greeting text.
    #[schema(example = "Hello, World!")]
    pub message: String,
    pub status: ResponseStatus,
    pub timestamp: DateTime<Utc>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy(timestamp: DateTime<Utc>) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp,
        }
    }
}

/// State of one readiness dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Healthy,
    Unhealthy,
}

impl From<bool> for CheckStatus {
    fn from(healthy: bool) -> Self {
        if healthy {
            CheckStatus::Healthy
        } else {
            CheckStatus::Unhealthy
        }
    }
}

/// Aggregated readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReadyStatus {
    Ready,
    NotReady,
}

/// Body of `GET /health/ready`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReadyResponse {
    pub status: ReadyStatus,
    pub checks: BTreeMap<String, CheckStatus>,
    pub timestamp: DateTime<Utc>,
}

impl ReadyResponse {
    /// Fold check results; ready iff every check is healthy.
    pub fn from_checks(checks: BTreeMap<String, CheckStatus>, timestamp: DateTime<Utc>) -> Self {
        let status = if checks.values().all(|c| *c == CheckStatus::Healthy) {
            ReadyStatus::Ready
        } else {
            ReadyStatus::NotReady
        };
        Self {
            status,
            checks,
            timestamp,
        }
    }
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub docs_url: String,
}

/// The one error envelope every failure is normalized into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable code, e.g. `VALIDATION_ERROR`.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Field-level errors for validation failures; absent otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub detail: Option<serde_json::Value>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn greeting_serializes_iso_timestamp() {
        let body = GreetingResponse {
            message: "Hello, World!".into(),
            status: ResponseStatus::Success,
            timestamp: fixed_time(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "message": "Hello, World!",
                "status": "success",
                "timestamp": "2024-05-01T12:30:00Z"
            })
        );
    }

    #[test]
    fn ready_iff_all_checks_healthy() {
        let mut checks = BTreeMap::new();
        assert_eq!(
            ReadyResponse::from_checks(checks.clone(), fixed_time()).status,
            ReadyStatus::Ready
        );

        checks.insert("a".to_string(), CheckStatus::Healthy);
        checks.insert("b".to_string(), CheckStatus::Healthy);
        assert_eq!(
            ReadyResponse::from_checks(checks.clone(), fixed_time()).status,
            ReadyStatus::Ready
        );

        checks.insert("c".to_string(), CheckStatus::Unhealthy);
        let ready = ReadyResponse::from_checks(checks, fixed_time());
        assert_eq!(ready.status, ReadyStatus::NotReady);
        assert_eq!(serde_json::to_value(&ready).unwrap()["status"], "not_ready");
    }

    #[test]
    fn error_envelope_omits_missing_detail() {
        let body = ErrorResponse {
            error: "INTERNAL_SERVER_ERROR".into(),
            message: "An unexpected error occurred".into(),
            detail: None,
            request_id: Some("abcd1234".into()),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("detail").is_none());
        assert_eq!(value["request_id"], "abcd1234");
    }
}
