//! # StockLens — stock dashboard aggregator
//!
//! ```text
//!  ┌─────────────┐  GET /api?symbol=2330   ┌──────────────────────────┐   quote / news / chart
//!  │  Dashboard  │ ──────────────────────▶ │  Aggregator              │ ────────────────────▶ Yahoo Finance
//!  │  (browser)  │ ◀────────────────────── │  join + degrade + reshape │ ────────────────────▶ FinMind
//!  └─────────────┘  DashboardDocument      └──────────────────────────┘   institutional flow
//! ```
//!
//! The binary in `main.rs` only loads configuration and serves
//! [`build_router`].

pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod providers;
pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use auth::require_api_key;
use routes::{dashboard::get_dashboard, health::health_check, symbols::resolve_symbol};
use state::SharedState;

/// Full router with middleware, ready for `axum::serve` or `oneshot` tests.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Dashboard ─────────────────────────────────────────────────────────
        .route("/api",                 get(get_dashboard))
        .route("/api/stock",           get(get_dashboard))
        .route("/api/symbols/resolve", get(resolve_symbol))
        // ── Ops ───────────────────────────────────────────────────────────────
        .route("/health",              get(health_check))
        // ── Middleware ────────────────────────────────────────────────────────
        .layer(axum::middleware::from_fn_with_state(state.clone(), require_api_key))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
