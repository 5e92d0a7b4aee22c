//! # engine::aggregator
//!
//! One request in, four concurrent upstream lookups, one document out.
//!
//! ```text
//!            ┌─ quote ──────────┐   failure ─▶ AppError::UpstreamPrimaryFailure
//! symbol ─▶ ├─ news ───────────┤
//!            ├─ intraday chart ─┤   failure ─▶ placeholder + Degraded
//!            └─ institutional ──┘
//!                     │ join (all four settle, none retried)
//!                     ▼
//!              DashboardDocument
//! ```

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use serde::Serialize;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::{commentary, reshape, symbol};
use crate::config::Config;
use crate::error::AppError;
use crate::models::{DashboardDocument, InstitutionalFlow};
use crate::providers::{with_timeout, InstitutionalFlowProvider, MarketDataProvider, ProviderError};

/// Headlines requested upstream; leaves room for the ones filtering drops.
const NEWS_FETCH_COUNT: usize = 10;

/// A non-critical source that failed and was replaced by its placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    News,
    Chart,
    Chips,
}

impl DataSource {
    pub fn as_str(self) -> &'static str {
        match self {
            DataSource::News => "news",
            DataSource::Chart => "chart",
            DataSource::Chips => "chips",
        }
    }
}

/// Informational: never turned into an error response.
#[derive(Debug)]
pub struct Degraded {
    pub source: DataSource,
    pub error:  ProviderError,
}

#[derive(Debug)]
pub struct Aggregated {
    pub document: DashboardDocument,
    pub degraded: Vec<Degraded>,
}

impl Aggregated {
    /// `"news,chips"`; `None` when every source delivered.
    pub fn degraded_header(&self) -> Option<String> {
        if self.degraded.is_empty() {
            return None;
        }
        Some(
            self.degraded
                .iter()
                .map(|d| d.source.as_str())
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

#[derive(Clone)]
pub struct Aggregator {
    market: Arc<dyn MarketDataProvider>,
    flows:  Arc<dyn InstitutionalFlowProvider>,
    config: Arc<Config>,
}

impl Aggregator {
    pub fn new(
        market: Arc<dyn MarketDataProvider>,
        flows: Arc<dyn InstitutionalFlowProvider>,
        config: Arc<Config>,
    ) -> Self {
        Self { market, flows, config }
    }

    /// Builds the dashboard for `raw_symbol` as of `now`.
    ///
    /// Input is validated before any upstream call is made.
    pub async fn aggregate(
        &self,
        raw_symbol: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Aggregated, AppError> {
        let ticker = symbol::resolve(raw_symbol)?;

        let span = info_span!(
            "aggregate",
            request_id = %Uuid::new_v4(),
            symbol = %ticker.market_symbol,
        );

        async move {
            let config = &self.config;
            let limit = config.upstream_timeout;
            let offset = config.market_offset();

            let (chart_since, flow_start) = lookup_windows(config, now);

            let market_symbol = ticker.market_symbol.as_str();

            let flow_lookup = async {
                if ticker.has_numeric_id() {
                    Some(with_timeout(limit, self.flows.flows(&ticker.stock_id, flow_start)).await)
                } else {
                    None
                }
            };

            let (quote, news, bars, flows) = tokio::join!(
                with_timeout(limit, self.market.quote(market_symbol)),
                with_timeout(limit, self.market.news(market_symbol, NEWS_FETCH_COUNT)),
                with_timeout(
                    limit,
                    self.market.intraday(market_symbol, chart_since, now, &config.intraday_interval),
                ),
                flow_lookup,
            );

            // ── Primary source: fatal ─────────────────────────────────────────
            let quote = quote
                .and_then(|raw| reshape::quote_snapshot(raw, market_symbol))
                .map_err(|e| {
                    error!(error = %e, "Quote lookup failed");
                    AppError::UpstreamPrimaryFailure(e)
                })?;

            // ── Secondary sources: degrade ────────────────────────────────────
            let mut degraded = Vec::new();

            let news = match news {
                Ok(raw) => reshape::news_items(raw, offset),
                Err(error) => {
                    degraded.push(Degraded { source: DataSource::News, error });
                    Vec::new()
                }
            };

            let chart = match bars {
                Ok(raw) => reshape::intraday_series(&raw, offset),
                Err(error) => {
                    degraded.push(Degraded { source: DataSource::Chart, error });
                    Vec::new()
                }
            };

            let flow = match flows {
                Some(Ok(records)) => reshape::institutional_flow(&records),
                Some(Err(error)) => {
                    degraded.push(Degraded { source: DataSource::Chips, error });
                    InstitutionalFlow::unavailable()
                }
                None => InstitutionalFlow::unavailable(),
            };

            for d in &degraded {
                warn!(source = d.source.as_str(), error = %d.error, "Source degraded to placeholder");
            }

            let ai_analysis = commentary::derive_commentary(quote.pct, quote.volume);

            info!(
                price = quote.price,
                pct = quote.pct,
                chart_points = chart.len(),
                news = news.len(),
                degraded = degraded.len(),
                "Dashboard assembled"
            );

            Ok::<_, AppError>(Aggregated {
                document: DashboardDocument {
                    quote,
                    chart,
                    ai_analysis,
                    news,
                    chips: flow.entries,
                    chips_date: flow.as_of,
                },
                degraded,
            })
        }
        .instrument(span)
        .await
    }
}

/// Start of the chart window and first flow date for a request at `now`.
///
/// Clamps to chrono's minimum instead of overflowing when the configured
/// lookbacks reach past the representable range.
fn lookup_windows(config: &Config, now: DateTime<Utc>) -> (DateTime<Utc>, NaiveDate) {
    let chart_since = now
        .checked_sub_signed(config.intraday_lookback)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let flow_start = ChronoDuration::try_days(config.flow_lookback_days)
        .and_then(|days| {
            now.with_timezone(&config.market_offset())
                .date_naive()
                .checked_sub_signed(days)
        })
        .unwrap_or(NaiveDate::MIN);

    (chart_since, flow_start)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 3, 0, 0).unwrap()
    }

    #[test]
    fn windows_follow_market_date() {
        let (since, start) = lookup_windows(&Config::default(), now());

        assert_eq!(since, Utc.with_ymd_and_hms(2024, 5, 6, 3, 0, 0).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());
    }

    #[test]
    fn flow_start_uses_local_date_after_utc_midnight() {
        // 2024-05-09 17:00 UTC is already the 10th in Taipei
        let late = Utc.with_ymd_and_hms(2024, 5, 9, 17, 0, 0).unwrap();
        let config = Config { flow_lookback_days: 1, ..Config::default() };

        let (_, start) = lookup_windows(&config, late);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 5, 9).unwrap());
    }

    #[test]
    fn oversized_lookbacks_clamp_instead_of_overflowing() {
        let config = Config {
            flow_lookback_days: 200_000_000,
            intraday_lookback:  ChronoDuration::days(200_000_000),
            ..Config::default()
        };

        let (since, start) = lookup_windows(&config, now());
        assert_eq!(since, DateTime::<Utc>::MIN_UTC);
        assert_eq!(start, NaiveDate::MIN);

        let beyond_delta = Config { flow_lookback_days: i64::MAX, ..Config::default() };
        assert_eq!(lookup_windows(&beyond_delta, now()).1, NaiveDate::MIN);
    }
}
