//! # auth — API Key Middleware
//!
//! Guards the API with an `X-API-Key` header.
//!
//! ## Mode
//! - `API_KEY` unset (or empty) → **Allow All** (dev mode, the default for a
//!   public dashboard)
//! - `API_KEY` set → every request must send `X-API-Key: <key>`
//!
//! ## Exempt
//! `/health` never requires a key.
//!
//! ## Usage
//! ```bash
//! API_KEY=super-secret-key-here cargo run
//! curl -H "X-API-Key: super-secret-key-here" "http://localhost:3000/api?symbol=2330"
//! ```

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::{error::AppError, state::SharedState};

pub const API_KEY_HEADER: &str = "X-API-Key";

pub async fn require_api_key(
    State(state): State<SharedState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = state.config.api_key.as_deref() else {
        return next.run(request).await;
    };

    let path = request.uri().path();
    if path == "/health" {
        return next.run(request).await;
    }

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if provided == expected {
        next.run(request).await
    } else {
        warn!(path, "❌ Unauthorized request — invalid or missing X-API-Key");
        AppError::Unauthorized.into_response()
    }
}
