//! # briefing::oanda — direct OANDA v3 fallback
//!
//! Used only when no dashboard answers. Builds a minimal [`CloudStatus`]
//! from the account summary and the current prices of the briefing
//! instruments.

use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use serde_json::{json, Map};
use tracing::debug;

use crate::config::Config;
use crate::models::{AccountStatus, CloudStatus};

const INSTRUMENTS: &[&str] = &["EUR_USD", "GBP_USD", "USD_JPY", "XAU_USD", "AUD_USD"];
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ─── OANDA Responses ──────────────────────────────────────────────────────────
// OANDA sends every decimal as a string.

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    account: AccountSummary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountSummary {
    balance:             String,
    #[serde(default)]
    open_position_count: u64,
}

#[derive(Debug, Deserialize)]
struct PricingResponse {
    #[serde(default)]
    prices: Vec<Price>,
}

#[derive(Debug, Deserialize)]
struct Price {
    instrument: String,
    #[serde(default)]
    bids:       Vec<PriceBucket>,
    #[serde(default)]
    asks:       Vec<PriceBucket>,
}

#[derive(Debug, Deserialize)]
struct PriceBucket {
    price: String,
}

impl Price {
    fn best(buckets: &[PriceBucket]) -> Option<f64> {
        buckets.first().and_then(|b| b.price.parse().ok())
    }
}

// ─── Client ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OandaClient {
    client:     reqwest::Client,
    base_url:   String,
    api_key:    String,
    account_id: String,
}

impl OandaClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url:   base_url.into().trim_end_matches('/').to_string(),
            api_key:    api_key.into(),
            account_id: account_id.into(),
        }
    }

    /// `None` unless both the API key and an account id are configured.
    pub fn from_config(client: reqwest::Client, config: &Config) -> Option<Self> {
        let api_key = config.oanda_api_key.clone()?;
        let account_id = config.oanda_account_id.clone()?;
        let base_url = format!("https://{}", config.oanda_environment.api_host());
        Some(Self::new(client, base_url, api_key, account_id))
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> anyhow::Result<T> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "OANDA request");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .context("OANDA API unreachable")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("OANDA API error {status}: {body}");
        }

        resp.json().await.context("OANDA response parse error")
    }

    /// Status snapshot built straight from OANDA.
    pub async fn cloud_status(&self) -> anyhow::Result<CloudStatus> {
        let summary: SummaryResponse = self
            .get(&format!("/v3/accounts/{}/summary", self.account_id))
            .await?;

        let balance: f64 = summary
            .account
            .balance
            .parse()
            .with_context(|| format!("Bad balance from OANDA: '{}'", summary.account.balance))?;

        let pricing: PricingResponse = self
            .get(&format!(
                "/v3/accounts/{}/pricing?instruments={}",
                self.account_id,
                INSTRUMENTS.join(",")
            ))
            .await?;

        let now = chrono::Local::now().to_rfc3339();
        let mut market_data = Map::new();
        for price in pricing.prices {
            if let (Some(bid), Some(ask)) = (Price::best(&price.bids), Price::best(&price.asks)) {
                market_data.insert(
                    price.instrument,
                    json!({ "bid": bid, "ask": ask, "timestamp": now }),
                );
            }
        }

        let mut status = CloudStatus { market_data, ..CloudStatus::default() };
        status.account_statuses.insert(
            self.account_id.clone(),
            AccountStatus {
                balance,
                open_positions: summary.account.open_position_count,
                active:         true,
            },
        );
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    #[tokio::test]
    async fn builds_status_from_summary_and_pricing() {
        let server = MockServer::start_async().await;
        let summary = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v3/accounts/101-004-1-008/summary")
                    .header("authorization", "Bearer KEY");
                then.status(200)
                    .json_body(json!({ "account": { "balance": "98765.4321", "openPositionCount": 3 } }));
            })
            .await;
        let pricing = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v3/accounts/101-004-1-008/pricing")
                    .query_param("instruments", "EUR_USD,GBP_USD,USD_JPY,XAU_USD,AUD_USD")
                    .header("authorization", "Bearer KEY");
                then.status(200).json_body(json!({ "prices": [
                    { "instrument": "EUR_USD", "bids": [{ "price": "1.10000" }], "asks": [{ "price": "1.10020" }] },
                    { "instrument": "XAU_USD", "bids": [], "asks": [{ "price": "2400.5" }] }
                ]}));
            })
            .await;

        let oanda = OandaClient::new(reqwest::Client::new(), server.base_url(), "KEY", "101-004-1-008");
        let status = oanda.cloud_status().await.unwrap();

        assert_eq!(status.total_balance(), 98765.4321);
        assert_eq!(status.total_open_positions(), 3);
        let quotes = status.quotes(5);
        assert_eq!(quotes.len(), 1, "instrument without a bid is skipped");
        assert_eq!(quotes[0].0, "EUR_USD");

        summary.assert_async().await;
        pricing.assert_async().await;
    }

    #[tokio::test]
    async fn http_error_is_reported() {
        let server = MockServer::start_async().await;
        let summary = server
            .mock_async(|when, then| {
                when.method(GET).path("/v3/accounts/1/summary");
                then.status(401).json_body(json!({ "errorMessage": "bad token" }));
            })
            .await;

        let oanda = OandaClient::new(reqwest::Client::new(), server.base_url(), "KEY", "1");
        let err = oanda.cloud_status().await.unwrap_err();
        assert!(err.to_string().contains("401"));
        summary.assert_async().await;
    }
}
