//! # config — read service configuration from environment variables
//!
//! `.env` is loaded by `main` before this runs; real env vars win.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use chrono::{Duration as ChronoDuration, FixedOffset, Offset, Utc};

/// Ten years of daily flow rows is already far more than the dataset serves.
pub const MAX_FLOW_LOOKBACK_DAYS: i64 = 3650;
/// One leap year of chart history.
pub const MAX_INTRADAY_LOOKBACK_HOURS: i64 = 24 * 366;

/// Everything the aggregator needs to reach its upstreams.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address Axum listens on
    pub bind_addr:          SocketAddr,
    /// Quote / chart / news provider
    pub yahoo_base_url:     String,
    /// Institutional-flow provider
    pub finmind_base_url:   String,
    /// Optional FinMind bearer token (anonymous quota without it)
    pub finmind_token:      Option<String>,
    /// Upper bound for every single upstream call
    pub upstream_timeout:   Duration,
    /// Sampling interval passed to the chart endpoint, e.g. `"5m"`
    pub intraday_interval:  String,
    /// How far back the chart request reaches. Wide enough to cover a weekend
    /// so the latest session is always inside the window.
    pub intraday_lookback:  ChronoDuration,
    /// How many calendar days of flow rows to request
    pub flow_lookback_days: i64,
    /// Exchange-local UTC offset in hours (Taipei = 8)
    pub market_utc_offset:  i32,
    /// When set, every route except `/health` requires `X-API-Key`
    pub api_key:            Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr:          SocketAddr::from(([0, 0, 0, 0], 3000)),
            yahoo_base_url:     "https://query1.finance.yahoo.com".to_string(),
            finmind_base_url:   "https://api.finmindtrade.com".to_string(),
            finmind_token:      None,
            upstream_timeout:   Duration::from_secs(8),
            intraday_interval:  "5m".to_string(),
            intraday_lookback:  ChronoDuration::hours(96),
            flow_lookback_days: 10,
            market_utc_offset:  8,
            api_key:            None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(non_empty_var)
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_addr = match lookup("BIND_ADDR") {
            Some(v) => v.parse().with_context(|| format!("BIND_ADDR is not a socket address: '{v}'"))?,
            None => defaults.bind_addr,
        };

        let timeout_secs: u64 =
            parse_var(&lookup, "UPSTREAM_TIMEOUT_SECS", defaults.upstream_timeout.as_secs())?;
        let lookback_hours: i64 =
            parse_var(&lookup, "INTRADAY_LOOKBACK_HOURS", defaults.intraday_lookback.num_hours())?;
        let flow_lookback_days: i64 =
            parse_var(&lookup, "FLOW_LOOKBACK_DAYS", defaults.flow_lookback_days)?;
        let market_utc_offset: i32 =
            parse_var(&lookup, "MARKET_UTC_OFFSET_HOURS", defaults.market_utc_offset)?;

        if timeout_secs == 0 {
            anyhow::bail!("UPSTREAM_TIMEOUT_SECS must be greater than zero");
        }
        if !(1..=MAX_INTRADAY_LOOKBACK_HOURS).contains(&lookback_hours) {
            anyhow::bail!(
                "INTRADAY_LOOKBACK_HOURS must be between 1 and {MAX_INTRADAY_LOOKBACK_HOURS}, got {lookback_hours}"
            );
        }
        if !(1..=MAX_FLOW_LOOKBACK_DAYS).contains(&flow_lookback_days) {
            anyhow::bail!(
                "FLOW_LOOKBACK_DAYS must be between 1 and {MAX_FLOW_LOOKBACK_DAYS}, got {flow_lookback_days}"
            );
        }
        if !(-12..=14).contains(&market_utc_offset) {
            anyhow::bail!("MARKET_UTC_OFFSET_HOURS out of range: {market_utc_offset}");
        }

        let intraday_lookback = ChronoDuration::try_hours(lookback_hours)
            .with_context(|| format!("INTRADAY_LOOKBACK_HOURS overflows: {lookback_hours}"))?;

        Ok(Self {
            bind_addr,
            yahoo_base_url:     lookup("YAHOO_BASE_URL").unwrap_or(defaults.yahoo_base_url),
            finmind_base_url:   lookup("FINMIND_BASE_URL").unwrap_or(defaults.finmind_base_url),
            finmind_token:      lookup("FINMIND_TOKEN"),
            upstream_timeout:   Duration::from_secs(timeout_secs),
            intraday_interval:  lookup("INTRADAY_INTERVAL").unwrap_or(defaults.intraday_interval),
            intraday_lookback,
            flow_lookback_days,
            market_utc_offset,
            api_key:            lookup("API_KEY"),
        })
    }

    /// Exchange-local timezone used for session dates and news timestamps.
    pub fn market_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.market_utc_offset * 3600)
            .unwrap_or_else(|| Utc.fix())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(v) => v.parse().with_context(|| format!("{key} must be a number, got '{v}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()))
    }

    #[test]
    fn default_offset_is_taipei() {
        let config = Config::default();
        assert_eq!(config.market_offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn parse_var_falls_back_when_unset() {
        let value: u64 = parse_var(&|_: &str| None, "STOCKLENS_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn empty_environment_matches_defaults() {
        let config = config_from(&[]).unwrap();
        let defaults = Config::default();

        assert_eq!(config.upstream_timeout, defaults.upstream_timeout);
        assert_eq!(config.intraday_lookback, defaults.intraday_lookback);
        assert_eq!(config.flow_lookback_days, defaults.flow_lookback_days);
        assert_eq!(config.yahoo_base_url, defaults.yahoo_base_url);
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("UPSTREAM_TIMEOUT_SECS", "3"),
            ("INTRADAY_LOOKBACK_HOURS", "48"),
            ("FLOW_LOOKBACK_DAYS", "30"),
            ("API_KEY", "secret"),
        ])
        .unwrap();

        assert_eq!(config.upstream_timeout, Duration::from_secs(3));
        assert_eq!(config.intraday_lookback, ChronoDuration::hours(48));
        assert_eq!(config.flow_lookback_days, 30);
        assert_eq!(config.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn lookback_bounds_are_inclusive() {
        let config = config_from(&[
            ("INTRADAY_LOOKBACK_HOURS", "8784"),
            ("FLOW_LOOKBACK_DAYS", "3650"),
        ])
        .unwrap();

        assert_eq!(config.intraday_lookback.num_hours(), MAX_INTRADAY_LOOKBACK_HOURS);
        assert_eq!(config.flow_lookback_days, MAX_FLOW_LOOKBACK_DAYS);
    }

    #[test]
    fn oversized_flow_lookback_is_rejected() {
        let err = config_from(&[("FLOW_LOOKBACK_DAYS", "200000000")]).unwrap_err();
        assert!(err.to_string().contains("FLOW_LOOKBACK_DAYS"));
    }

    #[test]
    fn oversized_intraday_lookback_is_rejected() {
        for hours in ["8785", "9223372036854775807"] {
            let err = config_from(&[("INTRADAY_LOOKBACK_HOURS", hours)]).unwrap_err();
            assert!(err.to_string().contains("INTRADAY_LOOKBACK_HOURS"), "{hours}");
        }
    }

    #[test]
    fn non_positive_values_are_rejected() {
        assert!(config_from(&[("FLOW_LOOKBACK_DAYS", "0")]).is_err());
        assert!(config_from(&[("INTRADAY_LOOKBACK_HOURS", "-1")]).is_err());
        assert!(config_from(&[("UPSTREAM_TIMEOUT_SECS", "0")]).is_err());
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let err = config_from(&[("UPSTREAM_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("UPSTREAM_TIMEOUT_SECS"));
    }
}
