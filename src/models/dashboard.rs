//! # models::dashboard
//!
//! [`DashboardDocument`] — the single JSON document returned by `GET /api`.
//!
//! ```text
//! { name, price, change, pct, volume, high, low, open, prevClose, symbol,
//!   chart[]: { time, price, volume },
//!   aiAnalysis: { opinions: { gemini, gpt, deepseek }, summary },
//!   news[]: { title, link, publisher, time },
//!   chips[]: { name, val }, chipsDate }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ChipEntry, CommentaryBlock, NewsItem, PricePoint, QuoteSnapshot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDocument {
    #[serde(flatten)]
    pub quote: QuoteSnapshot,

    /// Latest trading session, traded points only. Empty when degraded.
    pub chart: Vec<PricePoint>,

    pub ai_analysis: CommentaryBlock,

    /// At most three items. Empty when degraded.
    pub news: Vec<NewsItem>,

    /// Always one entry per actor; values are null when degraded.
    pub chips: Vec<ChipEntry>,

    /// Trading date the chips refer to.
    pub chips_date: Option<NaiveDate>,
}
