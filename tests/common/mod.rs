//! Shared fakes and fixtures for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use stocklens::config::Config;
use stocklens::engine::Aggregator;
use stocklens::providers::{
    InstitutionalFlowProvider, MarketDataProvider, ProviderError, RawBar, RawFlowRecord, RawNews, RawQuote,
};
use stocklens::state::{AppState, SharedState};

/// How a fake lookup behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    Succeed,
    Fail,
    Hang,
}

async fn settle<T>(behaviour: Behaviour, value: T) -> Result<T, ProviderError> {
    match behaviour {
        Behaviour::Succeed => Ok(value),
        Behaviour::Fail => Err(ProviderError::Upstream { provider: "fake", message: "boom".to_string() }),
        Behaviour::Hang => std::future::pending().await,
    }
}

// ─── Market data ──────────────────────────────────────────────────────────────

pub struct FakeMarket {
    pub quote:   Behaviour,
    pub news:    Behaviour,
    pub chart:   Behaviour,
    pub calls:   AtomicUsize,
    pub symbols: Mutex<Vec<String>>,
    pub chart_windows: Mutex<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
}

impl FakeMarket {
    pub fn healthy() -> Self {
        Self::with(Behaviour::Succeed, Behaviour::Succeed, Behaviour::Succeed)
    }

    pub fn with(quote: Behaviour, news: Behaviour, chart: Behaviour) -> Self {
        Self {
            quote,
            news,
            chart,
            calls: AtomicUsize::new(0),
            symbols: Mutex::new(Vec::new()),
            chart_windows: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self, symbol: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.symbols.lock().unwrap().push(symbol.to_string());
    }
}

#[async_trait]
impl MarketDataProvider for FakeMarket {
    async fn quote(&self, symbol: &str) -> Result<RawQuote, ProviderError> {
        self.record(symbol);
        settle(self.quote, tsmc_quote(symbol)).await
    }

    async fn news(&self, symbol: &str, _count: usize) -> Result<Vec<RawNews>, ProviderError> {
        self.record(symbol);
        settle(self.news, sample_news()).await
    }

    async fn intraday(
        &self,
        symbol: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        _interval: &str,
    ) -> Result<Vec<RawBar>, ProviderError> {
        self.record(symbol);
        self.chart_windows.lock().unwrap().push((since, until));
        settle(self.chart, sample_bars()).await
    }
}

// ─── Institutional flow ───────────────────────────────────────────────────────

pub struct FakeFlows {
    pub behaviour: Behaviour,
    pub requests:  Mutex<Vec<(String, NaiveDate)>>,
}

impl FakeFlows {
    pub fn new(behaviour: Behaviour) -> Self {
        Self { behaviour, requests: Mutex::new(Vec::new()) }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl InstitutionalFlowProvider for FakeFlows {
    async fn flows(&self, stock_id: &str, start: NaiveDate) -> Result<Vec<RawFlowRecord>, ProviderError> {
        self.requests.lock().unwrap().push((stock_id.to_string(), start));
        settle(self.behaviour, sample_flows()).await
    }
}

// ─── Fixtures ─────────────────────────────────────────────────────────────────

/// 2024-05-10 09:00 Taipei
pub const SESSION_OPEN: i64 = 1_715_302_800;

pub fn test_config() -> Config {
    Config { upstream_timeout: Duration::from_millis(200), ..Config::default() }
}

/// 2024-05-10 11:00 Taipei
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 3, 0, 0).unwrap()
}

pub fn tsmc_quote(symbol: &str) -> RawQuote {
    RawQuote {
        symbol:     symbol.to_string(),
        long_name:  Some("Taiwan Semiconductor Manufacturing Company Limited".to_string()),
        short_name: Some("TAIWAN SEMICONDUCTOR MANUFACTUR".to_string()),
        price:      Some(578.0),
        change:     Some(5.0),
        change_pct: Some(0.87),
        volume:     Some(25_000_000),
        day_high:   Some(580.0),
        day_low:    Some(570.0),
        open:       Some(573.0),
        prev_close: Some(573.0),
    }
}

pub fn sample_news() -> Vec<RawNews> {
    let item = |title: &str, link: Option<&str>| RawNews {
        title:        Some(title.to_string()),
        link:         link.map(str::to_string),
        publisher:    Some("Reuters".to_string()),
        published_at: Some(SESSION_OPEN),
    };
    vec![
        item("TSMC April revenue jumps", Some("https://example.com/1")),
        item("Missing link", None),
        item("Foreign investors return", Some("https://example.com/2")),
        item("AI demand lifts chipmakers", Some("https://example.com/3")),
        item("Fourth headline", Some("https://example.com/4")),
    ]
}

pub fn sample_bars() -> Vec<RawBar> {
    vec![
        RawBar { timestamp: SESSION_OPEN, close: Some(574.0), volume: Some(1_200_000) },
        RawBar { timestamp: SESSION_OPEN + 300, close: Some(575.0), volume: Some(0) },
        RawBar { timestamp: SESSION_OPEN + 600, close: Some(578.0), volume: Some(800_000) },
    ]
}

pub fn sample_flows() -> Vec<RawFlowRecord> {
    let date = |s: &str| s.parse::<NaiveDate>().unwrap();
    vec![
        RawFlowRecord { date: date("2024-05-09"), name: "Foreign_Investor".into(), buy: 1_000_000, sell: 0 },
        RawFlowRecord { date: date("2024-05-10"), name: "Foreign_Investor".into(), buy: 15_500_000, sell: 3_000_000 },
        RawFlowRecord { date: date("2024-05-10"), name: "Investment_Trust".into(), buy: 200_000, sell: 450_000 },
        RawFlowRecord { date: date("2024-05-10"), name: "Dealer_self".into(), buy: 30_000, sell: 10_000 },
    ]
}

// ─── Wiring ───────────────────────────────────────────────────────────────────

pub fn aggregator(market: Arc<FakeMarket>, flows: Arc<FakeFlows>) -> Aggregator {
    Aggregator::new(market, flows, Arc::new(test_config()))
}

pub fn shared_state(config: Config, market: Arc<FakeMarket>, flows: Arc<FakeFlows>) -> SharedState {
    Arc::new(AppState::with_providers(config, market, flows))
}
