//! # error
//!
//! Centralised application error type.
//!
//! Every handler returns `Result<_, AppError>`. Axum's `IntoResponse` impl
//! converts these into JSON error bodies so the dashboard always gets a
//! machine-readable `error` field, even on failure.
//!
//! A failing *secondary* source is not an `AppError`; see
//! [`crate::engine::aggregator::Degraded`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::providers::ProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, blank or malformed symbol / query parameter.
    #[error("{0}")]
    InvalidInput(String),

    /// The quote lookup failed; without a price there is no dashboard.
    #[error("Failed to fetch data")]
    UpstreamPrimaryFailure(#[source] ProviderError),

    /// `API_KEY` is configured and the request did not carry it.
    #[error("Unauthorized: invalid or missing X-API-Key header")]
    Unauthorized,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamPrimaryFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::UpstreamPrimaryFailure(source) => json!({
                "ok":      false,
                "error":   self.to_string(),
                "details": source.to_string(),
            }),
            _ => json!({
                "ok":    false,
                "error": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
