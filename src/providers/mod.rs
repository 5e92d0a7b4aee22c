//! # providers — upstream data sources
//!
//! The aggregator only talks to the two traits below. Production wires in
//! [`yahoo::YahooClient`] and [`finmind::FinMindClient`]; tests inject fakes.
//!
//! Raw types keep every field the upstream may omit as `Option` so that
//! filtering decisions stay in [`crate::engine::reshape`].

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

pub mod finmind;
pub mod yahoo;

pub use finmind::FinMindClient;
pub use yahoo::YahooClient;

// ─── Raw upstream records ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawQuote {
    pub symbol:     String,
    pub long_name:  Option<String>,
    pub short_name: Option<String>,
    pub price:      Option<f64>,
    pub change:     Option<f64>,
    pub change_pct: Option<f64>,
    pub volume:     Option<u64>,
    pub day_high:   Option<f64>,
    pub day_low:    Option<f64>,
    pub open:       Option<f64>,
    pub prev_close: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawNews {
    pub title:        Option<String>,
    pub link:         Option<String>,
    pub publisher:    Option<String>,
    /// Unix seconds
    pub published_at: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawBar {
    /// Unix seconds
    pub timestamp: i64,
    pub close:     Option<f64>,
    pub volume:    Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFlowRecord {
    pub date: NaiveDate,
    /// Provider sub-category, e.g. `"Foreign_Investor"`
    pub name: String,
    /// Shares bought
    pub buy:  i64,
    /// Shares sold
    pub sell: i64,
}

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection / TLS / body read failure. The URL is stripped before the
    /// error is stored so query strings never reach a response body.
    #[error("{provider} unreachable: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned HTTP {status}")]
    Status {
        provider: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("{provider} response could not be decoded: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },

    /// The provider answered but reported an error of its own.
    #[error("{provider} reported an error: {message}")]
    Upstream {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} has no data for {symbol}")]
    NotFound {
        provider: &'static str,
        symbol: String,
    },

    #[error("upstream call timed out after {0:?}")]
    Timeout(Duration),
}

impl ProviderError {
    pub(crate) fn transport(provider: &'static str, err: reqwest::Error) -> Self {
        Self::Transport { provider, source: err.without_url() }
    }

    pub(crate) fn decode(provider: &'static str, err: reqwest::Error) -> Self {
        Self::Decode { provider, message: err.without_url().to_string() }
    }
}

// ─── Traits ───────────────────────────────────────────────────────────────────

/// Quote, news and chart source (market-suffixed symbols, e.g. `2330.TW`).
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn quote(&self, symbol: &str) -> Result<RawQuote, ProviderError>;

    /// Instrument-scoped headlines, most recent first.
    async fn news(&self, symbol: &str, count: usize) -> Result<Vec<RawNews>, ProviderError>;

    /// Bars in `[since, until]` at the given sampling interval (`"5m"`).
    async fn intraday(
        &self,
        symbol: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        interval: &str,
    ) -> Result<Vec<RawBar>, ProviderError>;
}

/// Institutional buy/sell source (bare numeric stock ids, e.g. `2330`).
#[async_trait]
pub trait InstitutionalFlowProvider: Send + Sync {
    async fn flows(&self, stock_id: &str, start: NaiveDate) -> Result<Vec<RawFlowRecord>, ProviderError>;
}

/// Bounds any provider call, mapping an elapsed limit to
/// [`ProviderError::Timeout`].
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(limit)),
    }
}
