//! # notify
//!
//! The "send text notification" primitive. Everything that pushes a message
//! to the operator goes through [`Notifier`], so the forwarder and the
//! briefing can be driven by a fake in tests.

use async_trait::async_trait;

use crate::error::NotifyError;

pub mod telegram;

pub use telegram::TelegramNotifier;

/// Delivers one pre-formatted (HTML) message.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}
