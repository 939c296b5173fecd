//! # notify::telegram — Telegram Bot API `sendMessage`
//!
//! Messages are sent with `parse_mode = HTML`, so callers format with
//! `<b>` tags rather than Markdown.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info};

use crate::config::Config;
use crate::error::NotifyError;

use super::Notifier;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id:    &'a str,
    text:       &'a str,
    parse_mode: &'a str,
}

/// Telegram credentials; `None` on the notifier when not configured
#[derive(Debug, Clone)]
struct Credentials {
    token:   String,
    chat_id: String,
}

#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client:      reqwest::Client,
    api_url:     String,
    credentials: Option<Credentials>,
}

impl TelegramNotifier {
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        token: Option<String>,
        chat_id: Option<String>,
    ) -> Self {
        let credentials = match (token, chat_id) {
            (Some(token), Some(chat_id)) => Some(Credentials { token, chat_id }),
            _ => None,
        };
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(
            client,
            config.telegram_api_url.clone(),
            config.telegram_token.clone(),
            config.telegram_chat_id.clone(),
        )
    }

    pub fn enabled(&self) -> bool {
        self.credentials.is_some()
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let creds = self.credentials.as_ref().ok_or(NotifyError::Disabled)?;
        let url = format!("{}/bot{}/sendMessage", self.api_url, creds.token);

        let resp = self
            .client
            .post(&url)
            .json(&SendMessage { chat_id: &creds.chat_id, text, parse_mode: "HTML" })
            .timeout(SEND_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                // reqwest puts the URL (and so the token) in its Display
                let e = e.without_url();
                error!(error = %e, "Telegram unreachable");
                NotifyError::Transport(e)
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            error!(http_status = status, body = %body, "Telegram rejected message");
            return Err(NotifyError::Rejected { status, body });
        }

        info!(chars = text.len(), "📨 Telegram message sent");
        Ok(())
    }
}
