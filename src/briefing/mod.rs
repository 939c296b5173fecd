//! # briefing — Morning Briefing
//!
//! The "generate and send morning update" routine the forwarder triggers.
//!
//! ## Flow
//! ```text
//! StatusProvider::fetch()
//!   ├─ Some(status) → message::morning_briefing → Notifier::send
//!   └─ None         → message::system_issue     → Notifier::send
//! ```
//! The send result is the routine's result: a failed send is what makes
//! the forwarder fall back.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::BriefingError;
use crate::notify::Notifier;
use crate::Clock;

pub mod message;
pub mod oanda;
pub mod source;

pub use source::{StatusProvider, StatusSource};

/// Fetches fresh data and delivers an update on its own. Success or
/// failure is all the caller gets back.
#[async_trait]
pub trait UpdateGenerator: Send + Sync {
    async fn generate_and_send(&self) -> Result<(), BriefingError>;
}

pub struct MorningBriefing {
    source:   Box<dyn StatusProvider>,
    notifier: Arc<dyn Notifier>,
    clock:    Clock,
}

impl MorningBriefing {
    pub fn new(source: Box<dyn StatusProvider>, notifier: Arc<dyn Notifier>, clock: Clock) -> Self {
        Self { source, notifier, clock }
    }
}

#[async_trait]
impl UpdateGenerator for MorningBriefing {
    async fn generate_and_send(&self) -> Result<(), BriefingError> {
        let now = (self.clock)();
        info!(time = %now.format("%I:%M %p"), "🌅 MORNING BRIEFING");

        let text = match self.source.fetch().await {
            Some(status) => {
                info!(
                    accounts = status.account_statuses.len(),
                    balance  = status.total_balance(),
                    phase    = %status.trade_phase,
                    "Status fetched"
                );
                message::morning_briefing(&status, now)
            }
            None => message::system_issue(),
        };

        self.notifier.send(&text).await?;
        info!("✅ Morning briefing sent successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::*;
    use crate::models::CloudStatus;
    use crate::notify::testing::RecordingNotifier;

    struct Fixed(Option<CloudStatus>);

    #[async_trait]
    impl StatusProvider for Fixed {
        async fn fetch(&self) -> Option<CloudStatus> {
            self.0.clone()
        }
    }

    fn clock() -> Clock {
        Arc::new(|| Local.with_ymd_and_hms(2025, 10, 13, 6, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn sends_briefing_when_status_available() {
        let notifier = Arc::new(RecordingNotifier::default());
        let briefing = MorningBriefing::new(
            Box::new(Fixed(Some(CloudStatus::default()))),
            notifier.clone(),
            clock(),
        );

        briefing.generate_and_send().await.unwrap();

        let sent = notifier.messages();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("GOOD MORNING - MONDAY OCT 13"));
    }

    #[tokio::test]
    async fn sends_system_issue_when_nothing_answers() {
        let notifier = Arc::new(RecordingNotifier::default());
        let briefing = MorningBriefing::new(Box::new(Fixed(None)), notifier.clone(), clock());

        briefing.generate_and_send().await.unwrap();

        assert!(notifier.messages()[0].contains("System Issue"));
    }

    #[tokio::test]
    async fn failed_send_is_an_error() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let briefing = MorningBriefing::new(Box::new(Fixed(None)), notifier, clock());

        let err = briefing.generate_and_send().await.unwrap_err();
        assert!(matches!(err, BriefingError::Notify(_)));
    }
}
