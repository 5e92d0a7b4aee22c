//! # providers::finmind — FinMind open data API
//!
//! Institutional investors buy/sell per stock per trading date:
//! `GET /api/v4/data?dataset=TaiwanStockInstitutionalInvestorsBuySell&data_id=2330&start_date=2024-05-01`
//!
//! The token travels in the `Authorization` header, never in the query string.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use super::{InstitutionalFlowProvider, ProviderError, RawFlowRecord};

const PROVIDER: &str = "finmind";
const DATASET: &str = "TaiwanStockInstitutionalInvestorsBuySell";

#[derive(Clone)]
pub struct FinMindClient {
    client:   reqwest::Client,
    base_url: String,
    token:    Option<String>,
    timeout:  Duration,
}

impl FinMindClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DataResponse {
    #[serde(default)]
    msg:    String,
    status: u16,
    #[serde(default)]
    data:   Vec<FlowRow>,
}

#[derive(Debug, Deserialize)]
struct FlowRow {
    date: NaiveDate,
    name: String,
    #[serde(default)]
    buy:  i64,
    #[serde(default)]
    sell: i64,
}

#[async_trait]
impl InstitutionalFlowProvider for FinMindClient {
    async fn flows(&self, stock_id: &str, start: NaiveDate) -> Result<Vec<RawFlowRecord>, ProviderError> {
        let url = format!("{}/api/v4/data", self.base_url);
        debug!(%url, stock_id, %start, "Calling FinMind...");

        let mut request = self
            .client
            .get(&url)
            .query(&[
                ("dataset", DATASET.to_string()),
                ("data_id", stock_id.to_string()),
                ("start_date", start.format("%Y-%m-%d").to_string()),
            ])
            .timeout(self.timeout);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        if !resp.status().is_success() {
            return Err(ProviderError::Status { provider: PROVIDER, status: resp.status() });
        }

        let body: DataResponse = resp.json().await.map_err(|e| ProviderError::decode(PROVIDER, e))?;

        // FinMind reports quota and parameter errors in the body with HTTP 200.
        if body.status != 200 {
            let message = if body.msg.is_empty() {
                format!("status {}", body.status)
            } else {
                body.msg
            };
            return Err(ProviderError::Upstream { provider: PROVIDER, message });
        }

        Ok(body
            .data
            .into_iter()
            .map(|row| RawFlowRecord { date: row.date, name: row.name, buy: row.buy, sell: row.sell })
            .collect())
    }
}
