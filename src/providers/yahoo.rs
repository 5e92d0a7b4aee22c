//! # providers::yahoo — Yahoo Finance public JSON endpoints
//!
//! | Lookup   | Endpoint                                              |
//! |----------|-------------------------------------------------------|
//! | quote    | `GET /v8/finance/chart/{symbol}?range=1d&interval=1d` |
//! | news     | `GET /v1/finance/search?q=&newsCount=`                |
//! | intraday | `GET /v8/finance/chart/{symbol}?period1=&period2=`    |
//!
//! The quote comes from the chart `meta` block: `/v7/finance/quote` needs a
//! cookie + crumb session, the chart endpoint does not.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

use super::{MarketDataProvider, ProviderError, RawBar, RawNews, RawQuote};

const PROVIDER: &str = "yahoo";

/// Yahoo rejects requests without a browser-looking agent.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Clone)]
pub struct YahooClient {
    client:   reqwest::Client,
    base_url: String,
    timeout:  Duration,
}

impl YahooClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "Calling Yahoo Finance...");

        let resp = self
            .client
            .get(&url)
            .query(query)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        if !resp.status().is_success() {
            return Err(ProviderError::Status { provider: PROVIDER, status: resp.status() });
        }

        resp.json().await.map_err(|e| ProviderError::decode(PROVIDER, e))
    }
}

// ─── Wire formats ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct YahooErrorBody {
    code:        Option<String>,
    description: Option<String>,
}

impl YahooErrorBody {
    fn into_error(self) -> ProviderError {
        let message = match (self.code, self.description) {
            (Some(code), Some(desc)) => format!("{code}: {desc}"),
            (Some(code), None) => code,
            (None, Some(desc)) => desc,
            (None, None) => "unknown error".to_string(),
        };
        ProviderError::Upstream { provider: PROVIDER, message }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<SearchNews>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNews {
    title:                 Option<String>,
    link:                  Option<String>,
    publisher:             Option<String>,
    provider_publish_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error:  Option<YahooErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta:       ChartMeta,
    #[serde(default)]
    timestamp:  Vec<i64>,
    #[serde(default)]
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol:                  Option<String>,
    long_name:               Option<String>,
    short_name:              Option<String>,
    regular_market_price:    Option<f64>,
    regular_market_volume:   Option<f64>,
    regular_market_day_high: Option<f64>,
    regular_market_day_low:  Option<f64>,
    previous_close:          Option<f64>,
    chart_previous_close:    Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open:   Vec<Option<f64>>,
    #[serde(default)]
    close:  Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

fn to_shares(v: f64) -> u64 {
    if v.is_finite() && v > 0.0 { v.round() as u64 } else { 0 }
}

impl YahooClient {
    /// First chart result for `symbol`, `None` when Yahoo returns no series.
    async fn chart(&self, symbol: &str, query: &[(&str, String)]) -> Result<Option<ChartResult>, ProviderError> {
        let envelope: ChartEnvelope = self.get_json(&format!("/v8/finance/chart/{symbol}"), query).await?;

        if let Some(err) = envelope.chart.error {
            return Err(err.into_error());
        }

        Ok(envelope.chart.result.and_then(|r| r.into_iter().next()))
    }
}

/// Quote fields from a one-day daily chart. Change figures are derived from
/// the previous close since the chart meta does not carry them.
fn quote_from_chart(result: ChartResult, requested: &str) -> RawQuote {
    let meta = result.meta;
    let prev_close = meta.previous_close.or(meta.chart_previous_close);
    let price = meta.regular_market_price;

    let change = price.zip(prev_close).map(|(p, prev)| p - prev);
    let change_pct = change
        .zip(prev_close)
        .filter(|(_, prev)| *prev != 0.0)
        .map(|(c, prev)| c / prev * 100.0);

    let open = result
        .indicators
        .quote
        .first()
        .and_then(|q| q.open.iter().rev().find_map(|o| *o));

    RawQuote {
        symbol:     meta.symbol.unwrap_or_else(|| requested.to_string()),
        long_name:  meta.long_name,
        short_name: meta.short_name,
        price,
        change,
        change_pct,
        volume:     meta.regular_market_volume.map(to_shares),
        day_high:   meta.regular_market_day_high,
        day_low:    meta.regular_market_day_low,
        open,
        prev_close,
    }
}

// ─── MarketDataProvider ───────────────────────────────────────────────────────

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn quote(&self, symbol: &str) -> Result<RawQuote, ProviderError> {
        let result = self
            .chart(symbol, &[("range", "1d".to_string()), ("interval", "1d".to_string())])
            .await?
            .ok_or_else(|| ProviderError::NotFound { provider: PROVIDER, symbol: symbol.to_string() })?;

        Ok(quote_from_chart(result, symbol))
    }

    async fn news(&self, symbol: &str, count: usize) -> Result<Vec<RawNews>, ProviderError> {
        let resp: SearchResponse = self
            .get_json(
                "/v1/finance/search",
                &[
                    ("q", symbol.to_string()),
                    ("quotesCount", "0".to_string()),
                    ("newsCount", count.to_string()),
                ],
            )
            .await?;

        Ok(resp
            .news
            .into_iter()
            .map(|n| RawNews {
                title:        n.title,
                link:         n.link,
                publisher:    n.publisher,
                published_at: n.provider_publish_time,
            })
            .collect())
    }

    async fn intraday(
        &self,
        symbol: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        interval: &str,
    ) -> Result<Vec<RawBar>, ProviderError> {
        let query = [
            ("period1", since.timestamp().to_string()),
            ("period2", until.timestamp().to_string()),
            ("interval", interval.to_string()),
            ("includePrePost", "false".to_string()),
        ];

        let Some(result) = self.chart(symbol, &query).await? else {
            return Ok(Vec::new());
        };

        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

        Ok(result
            .timestamp
            .iter()
            .enumerate()
            .map(|(i, &timestamp)| RawBar {
                timestamp,
                close:  quote.close.get(i).copied().flatten(),
                volume: quote.volume.get(i).copied().flatten().map(to_shares),
            })
            .collect())
    }
}
