//! # routes::dashboard
//!
//! `GET /api?symbol=2330.TW` — the composite dashboard document.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{error::AppError, state::SharedState};

pub const DEGRADED_SOURCES_HEADER: &str = "x-degraded-sources";

#[derive(Debug, Deserialize)]
pub struct SymbolQuery {
    pub symbol: Option<String>,
}

pub async fn get_dashboard(
    State(state): State<SharedState>,
    Query(query): Query<SymbolQuery>,
) -> Result<impl IntoResponse, AppError> {
    let aggregated = state
        .aggregator
        .aggregate(query.symbol.as_deref(), Utc::now())
        .await?;

    let mut headers = no_store_headers();
    if let Some(sources) = aggregated.degraded_header() {
        if let Ok(value) = HeaderValue::from_str(&sources) {
            headers.insert(HeaderName::from_static(DEGRADED_SOURCES_HEADER), value);
        }
    }

    Ok((headers, Json(aggregated.document)))
}

/// Quotes are time-sensitive: no browser or proxy may reuse them.
fn no_store_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, proxy-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    headers
}
