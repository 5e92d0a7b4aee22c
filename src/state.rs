//! # state
//!
//! Shared, read-only application state. Nothing in here changes after
//! startup: every request builds its own document from scratch.

use std::sync::Arc;

use anyhow::Context;

use crate::config::Config;
use crate::engine::Aggregator;
use crate::providers::{yahoo, FinMindClient, InstitutionalFlowProvider, MarketDataProvider, YahooClient};

// ─── AppState ─────────────────────────────────────────────────────────────────

/// Top-level state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub config:     Arc<Config>,
    pub aggregator: Aggregator,
}

impl AppState {
    /// Wires arbitrary providers; tests pass fakes here.
    pub fn with_providers(
        config: Config,
        market: Arc<dyn MarketDataProvider>,
        flows: Arc<dyn InstitutionalFlowProvider>,
    ) -> Self {
        let config = Arc::new(config);
        Self {
            aggregator: Aggregator::new(market, flows, Arc::clone(&config)),
            config,
        }
    }
}

/// Convenience type alias
pub type SharedState = Arc<AppState>;

/// Builds the production state: one pooled reqwest client shared by both
/// providers.
pub fn build_state(config: Config) -> anyhow::Result<SharedState> {
    let http_client = reqwest::Client::builder()
        .user_agent(yahoo::USER_AGENT)
        .timeout(config.upstream_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let market = YahooClient::new(http_client.clone(), &config.yahoo_base_url, config.upstream_timeout);
    let flows = FinMindClient::new(
        http_client,
        &config.finmind_base_url,
        config.finmind_token.clone(),
        config.upstream_timeout,
    );

    Ok(Arc::new(AppState::with_providers(config, Arc::new(market), Arc::new(flows))))
}
