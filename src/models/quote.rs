//! # models::quote
//!
//! [`QuoteSnapshot`] and [`PricePoint`] — the real-time part of the dashboard
//! document. Field names on the wire are part of the frontend contract.

use serde::{Deserialize, Serialize};

/// Latest quote for one instrument, built fresh for every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSnapshot {
    /// Market symbol the quote was fetched with, e.g. `"2330.TW"`.
    pub symbol: String,

    /// Display name; falls back to the symbol when the provider has none.
    pub name: String,

    pub price: f64,

    /// Absolute change against the previous close.
    pub change: f64,

    /// Percent change against the previous close (`0.87` means +0.87 %).
    pub pct: f64,

    /// Session volume in shares.
    pub volume: u64,

    pub high: Option<f64>,
    pub low: Option<f64>,
    pub open: Option<f64>,
    pub prev_close: Option<f64>,
}

/// One traded sample of the intraday series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix seconds (UTC) at the start of the sampling interval.
    pub time: i64,
    /// Close of the interval.
    pub price: f64,
    pub volume: u64,
}
