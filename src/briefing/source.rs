//! # briefing::source — where the briefing gets its numbers
//!
//! Dashboards first, in configured order; OANDA directly if none of them
//! answers. `None` means the briefing has nothing to report.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::models::CloudStatus;

use super::oanda::OandaClient;

const DASHBOARD_TIMEOUT: Duration = Duration::from_secs(15);

#[async_trait]
pub trait StatusProvider: Send + Sync {
    async fn fetch(&self) -> Option<CloudStatus>;
}

pub struct StatusSource {
    client: reqwest::Client,
    urls:   Vec<String>,
    oanda:  Option<OandaClient>,
}

impl StatusSource {
    pub fn new(client: reqwest::Client, urls: Vec<String>, oanda: Option<OandaClient>) -> Self {
        Self { client, urls, oanda }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        let oanda = OandaClient::from_config(client.clone(), config);
        Self::new(client, config.status_urls.clone(), oanda)
    }

    async fn fetch_dashboard(&self, url: &str) -> anyhow::Result<CloudStatus> {
        let resp = self
            .client
            .get(url)
            .timeout(DASHBOARD_TIMEOUT)
            .send()
            .await
            .context("dashboard unreachable")?;

        if resp.status() != StatusCode::OK {
            anyhow::bail!("dashboard answered HTTP {}", resp.status());
        }

        resp.json().await.context("dashboard status parse error")
    }
}

#[async_trait]
impl StatusProvider for StatusSource {
    async fn fetch(&self) -> Option<CloudStatus> {
        for url in &self.urls {
            match self.fetch_dashboard(url).await {
                Ok(status) => {
                    info!(url = %url, "✅ Connected to dashboard");
                    return Some(status);
                }
                Err(e) => warn!(url = %url, error = %format!("{e:#}"), "⚠️ Dashboard unavailable"),
            }
        }

        let Some(oanda) = &self.oanda else {
            warn!("No dashboard answered and OANDA credentials are not set");
            return None;
        };

        warn!("Dashboard unavailable, fetching data directly from OANDA...");
        match oanda.cloud_status().await {
            Ok(status) => Some(status),
            Err(e) => {
                error!(error = %format!("{e:#}"), "❌ Error getting OANDA data");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn falls_through_to_next_dashboard() {
        let bad = MockServer::start_async().await;
        let down = bad
            .mock_async(|when, then| {
                when.method(GET).path("/api/status");
                then.status(503).json_body(json!({}));
            })
            .await;
        let good = MockServer::start_async().await;
        let up = good
            .mock_async(|when, then| {
                when.method(GET).path("/api/status");
                then.status(200).json_body(json!({ "trade_phase": "Prime" }));
            })
            .await;

        let source = StatusSource::new(
            reqwest::Client::new(),
            vec![bad.url("/api/status"), good.url("/api/status")],
            None,
        );
        let status = source.fetch().await.unwrap();
        assert_eq!(status.trade_phase, "Prime");
        down.assert_async().await;
        up.assert_async().await;
    }

    #[tokio::test]
    async fn non_200_success_is_not_accepted() {
        let dashboard = MockServer::start_async().await;
        dashboard
            .mock_async(|when, then| {
                when.method(GET).path("/api/status");
                then.status(204);
            })
            .await;

        let source = StatusSource::new(reqwest::Client::new(), vec![dashboard.url("/api/status")], None);
        assert!(source.fetch().await.is_none());
    }

    #[tokio::test]
    async fn falls_back_to_oanda() {
        let oanda_server = MockServer::start_async().await;
        let summary = oanda_server
            .mock_async(|when, then| {
                when.method(GET).path("/v3/accounts/acc/summary");
                then.status(200)
                    .json_body(json!({ "account": { "balance": "10.00", "openPositionCount": 0 } }));
            })
            .await;
        oanda_server
            .mock_async(|when, then| {
                when.method(GET).path("/v3/accounts/acc/pricing");
                then.status(200).json_body(json!({ "prices": [] }));
            })
            .await;
        let oanda = OandaClient::new(reqwest::Client::new(), oanda_server.base_url(), "k", "acc");

        // port 9 (discard) on loopback is closed in test environments
        let source = StatusSource::new(
            reqwest::Client::new(),
            vec!["http://127.0.0.1:9/api/status".into()],
            Some(oanda),
        );
        let status = source.fetch().await.unwrap();
        assert_eq!(status.total_balance(), 10.0);
        assert_eq!(status.ai_recommendation, "MONITOR");
        summary.assert_async().await;
    }

    #[tokio::test]
    async fn nothing_answers() {
        let source = StatusSource::new(reqwest::Client::new(), vec![], None);
        assert!(source.fetch().await.is_none());
    }
}
