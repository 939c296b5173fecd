//! # error
//!
//! Error types for the delivery path. Checks and HTTP fetches stay on
//! `anyhow`; anything the forwarder has to branch on is typed here.

use thiserror::Error;

/// Failure of a single notification send.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Token or chat id not configured, nothing was sent.
    #[error("Telegram notifier not enabled (TELEGRAM_TOKEN / TELEGRAM_CHAT_ID missing)")]
    Disabled,

    /// Request never got a response.
    #[error("Telegram unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// Telegram answered with a non-2xx status.
    #[error("Telegram rejected message: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Failure of the update-generation routine.
#[derive(Debug, Error)]
pub enum BriefingError {
    #[error("briefing delivery failed: {0}")]
    Notify(#[from] NotifyError),

    /// Catch-all for anything else the generator runs into.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Terminal failure of the forwarder: the fallback notice itself failed.
#[derive(Debug, Error)]
#[error("fallback notification failed after update error ({cause}): {source}")]
pub struct FallbackFailed {
    /// Description of the primary failure the notice was about.
    pub cause:  String,
    #[source]
    pub source: NotifyError,
}
