//! # engine::reshape
//!
//! Pure conversions from raw provider records into dashboard models. No I/O,
//! no clock: the caller passes the market offset in.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::models::{
    ChipEntry, InstitutionalActor, InstitutionalFlow, NewsItem, PricePoint, QuoteSnapshot, SHARES_PER_LOT,
};
use crate::providers::{ProviderError, RawBar, RawFlowRecord, RawNews, RawQuote};

/// Headlines kept in the document.
pub const NEWS_LIMIT: usize = 3;

// ─── Quote ────────────────────────────────────────────────────────────────────

/// A quote without a price is as good as no quote.
pub fn quote_snapshot(raw: RawQuote, requested: &str) -> Result<QuoteSnapshot, ProviderError> {
    let price = raw
        .price
        .filter(|p| p.is_finite())
        .ok_or_else(|| ProviderError::NotFound { provider: "quote", symbol: requested.to_string() })?;

    let symbol = if raw.symbol.is_empty() { requested.to_string() } else { raw.symbol };
    let name = raw
        .long_name
        .or(raw.short_name)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| symbol.clone());

    Ok(QuoteSnapshot {
        symbol,
        name,
        price,
        change:     raw.change.unwrap_or(0.0),
        pct:        raw.change_pct.unwrap_or(0.0),
        volume:     raw.volume.unwrap_or(0),
        high:       raw.day_high,
        low:        raw.day_low,
        open:       raw.open,
        prev_close: raw.prev_close,
    })
}

// ─── Intraday ─────────────────────────────────────────────────────────────────

/// Drops bars without a trade (no close, or zero / missing volume), keeping
/// the order of the rest.
pub fn traded_points(bars: &[RawBar]) -> Vec<PricePoint> {
    bars.iter()
        .filter_map(|bar| {
            let price = bar.close.filter(|c| c.is_finite())?;
            let volume = bar.volume.filter(|v| *v > 0)?;
            Some(PricePoint { time: bar.timestamp, price, volume })
        })
        .collect()
}

/// Keeps only points on the same exchange-local date as the last point.
pub fn latest_session(points: Vec<PricePoint>, offset: FixedOffset) -> Vec<PricePoint> {
    let Some(last) = points.last().and_then(|p| local_date(p.time, offset)) else {
        return points;
    };
    points
        .into_iter()
        .filter(|p| local_date(p.time, offset) == Some(last))
        .collect()
}

pub fn intraday_series(bars: &[RawBar], offset: FixedOffset) -> Vec<PricePoint> {
    latest_session(traded_points(bars), offset)
}

fn local_date(ts: i64, offset: FixedOffset) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|utc| utc.with_timezone(&offset).date_naive())
}

// ─── News ─────────────────────────────────────────────────────────────────────

/// Drops items missing a title or link, then keeps the first [`NEWS_LIMIT`].
pub fn news_items(raw: Vec<RawNews>, offset: FixedOffset) -> Vec<NewsItem> {
    raw.into_iter()
        .filter_map(|n| {
            let title = n.title.filter(|t| !t.trim().is_empty())?;
            let link = n.link.filter(|l| !l.trim().is_empty())?;
            Some(NewsItem {
                title,
                link,
                publisher: n.publisher.unwrap_or_default(),
                time: n.published_at.map(|ts| format_local_time(ts, offset)).unwrap_or_default(),
            })
        })
        .take(NEWS_LIMIT)
        .collect()
}

pub fn format_local_time(ts: i64, offset: FixedOffset) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|utc| utc.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

// ─── Institutional flow ───────────────────────────────────────────────────────

/// Reduces provider rows to one net lot figure per actor for the most recent
/// date present. Sub-categories are summed before scaling; scaling floors
/// toward negative infinity. Actors without rows on that date stay `None`.
pub fn institutional_flow(records: &[RawFlowRecord]) -> InstitutionalFlow {
    let Some(latest) = records.iter().map(|r| r.date).max() else {
        return InstitutionalFlow::unavailable();
    };

    let mut totals: HashMap<InstitutionalActor, (i64, i64)> = HashMap::new();
    for record in records.iter().filter(|r| r.date == latest) {
        if let Some(actor) = InstitutionalActor::from_provider_name(&record.name) {
            let entry = totals.entry(actor).or_insert((0, 0));
            entry.0 += record.buy;
            entry.1 += record.sell;
        }
    }

    let entries = InstitutionalActor::ALL
        .iter()
        .map(|actor| ChipEntry {
            name: actor.label().to_string(),
            val: totals.get(actor).map(|(buy, sell)| to_lots(buy - sell)),
        })
        .collect();

    InstitutionalFlow { as_of: Some(latest), entries }
}

/// Shares → lots, `floor(net / 1000)`.
pub fn to_lots(net_shares: i64) -> i64 {
    net_shares.div_euclid(SHARES_PER_LOT)
}
