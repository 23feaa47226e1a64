//! Validating extractors.
//!
//! Deserialization failures and schema-constraint failures both surface as
//! [`ApiError::Validation`], so handlers receive either a typed, checked value
//! or never run at all.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::http::error::{ApiError, FieldError};

/// Schema constraints beyond what deserialization checks.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// JSON body, deserialized then validated.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate().map_err(ApiError::Validation)?;
        Ok(Self(value))
    }
}

/// Query string, deserialized then validated.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(query_rejection)?;
        value.validate().map_err(ApiError::Validation)?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    let kind = match rejection {
        JsonRejection::JsonDataError(_) => "json_data",
        JsonRejection::JsonSyntaxError(_) => "json_invalid",
        JsonRejection::MissingJsonContentType(_) => "content_type",
        _ => "body",
    };
    ApiError::Validation(vec![FieldError::new(&["body"], rejection.body_text(), kind)])
}

fn query_rejection(rejection: QueryRejection) -> ApiError {
    ApiError::Validation(vec![FieldError::new(
        &["query"],
        rejection.body_text(),
        "query_invalid",
    )])
}
