//! # routes::symbols
//!
//! `GET /api/symbols/resolve?q=台積電` — what the search box would query.

use axum::{extract::Query, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::{engine::symbol, error::AppError};

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub q: Option<String>,
}

pub async fn resolve_symbol(Query(query): Query<ResolveQuery>) -> Result<impl IntoResponse, AppError> {
    let ticker = symbol::resolve(query.q.as_deref())?;

    Ok(Json(json!({
        "ok":      true,
        "query":   query.q.as_deref().map(str::trim),
        "symbol":  ticker.market_symbol,
        "stockId": ticker.stock_id,
        "source":  ticker.resolution,
    })))
}
