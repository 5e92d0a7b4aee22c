use serde::{Deserialize, Serialize};

/// A headline shown under the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub publisher: String,
    /// Exchange-local publish time, `YYYY-MM-DD HH:MM`. Empty when unknown.
    pub time: String,
}
