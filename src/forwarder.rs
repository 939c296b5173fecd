//! # forwarder — Notification Forwarder
//!
//! Triggers the update routine once and, if it fails, sends exactly one
//! error notice through the same channel.
//!
//! ```text
//! Start → Sending ─┬─ Ok  → Delivered
//!                  └─ Err → FallbackSending ─┬─ Ok  → FallbackDelivered
//!                                            └─ Err → FallbackFailed (fatal)
//! ```
//!
//! Progress goes to the writer the caller passes in (stdout in the binary).

use std::io::Write;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::briefing::{message, UpdateGenerator};
use crate::error::FallbackFailed;
use crate::notify::Notifier;
use crate::Clock;

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The update routine delivered on its own.
    Delivered,
    /// The routine failed with `cause`; the error notice went out.
    FallbackDelivered { cause: String },
}

pub struct Forwarder {
    generator: Arc<dyn UpdateGenerator>,
    notifier:  Arc<dyn Notifier>,
    clock:     Clock,
}

impl Forwarder {
    pub fn new(generator: Arc<dyn UpdateGenerator>, notifier: Arc<dyn Notifier>, clock: Clock) -> Self {
        Self { generator, notifier, clock }
    }

    /// Run one delivery. `Err` only when the fallback send itself failed.
    pub async fn run(&self, out: &mut dyn Write) -> Result<Outcome, FallbackFailed> {
        // console output is best-effort; a closed stdout must not change the outcome
        writeln!(out, "🚀 Sending market update NOW...").ok();
        writeln!(out, "{}", "=".repeat(60)).ok();

        let cause = match self.generator.generate_and_send().await {
            Ok(()) => {
                writeln!(out, "\n✅ Market update sent successfully!").ok();
                info!("Market update delivered");
                return Ok(Outcome::Delivered);
            }
            Err(e) => e.to_string(),
        };

        writeln!(out, "\n❌ Error: {cause}").ok();
        warn!(error = %cause, "Market update failed, sending fallback notice");

        let notice = message::fallback_notice(&cause, (self.clock)());
        match self.notifier.send(&notice).await {
            Ok(()) => {
                info!("Fallback notice delivered");
                Ok(Outcome::FallbackDelivered { cause })
            }
            Err(source) => {
                error!(error = %source, "❌ Fallback notice failed");
                Err(FallbackFailed { cause, source })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{Local, TimeZone};

    use super::*;
    use crate::error::BriefingError;
    use crate::notify::testing::RecordingNotifier;

    struct Generator {
        fail_with: Option<&'static str>,
        calls:     AtomicUsize,
    }

    impl Generator {
        fn ok() -> Arc<Self> {
            Arc::new(Self { fail_with: None, calls: AtomicUsize::new(0) })
        }

        fn failing(msg: &'static str) -> Arc<Self> {
            Arc::new(Self { fail_with: Some(msg), calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl UpdateGenerator for Generator {
        async fn generate_and_send(&self) -> Result<(), BriefingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.fail_with {
                None => Ok(()),
                Some(msg) => Err(BriefingError::Other(anyhow::anyhow!(msg))),
            }
        }
    }

    fn quarter_past_nine() -> Clock {
        Arc::new(|| Local.with_ymd_and_hms(2025, 10, 14, 9, 15, 0).unwrap())
    }

    #[tokio::test]
    async fn success_sends_no_fallback() {
        let generator = Generator::ok();
        let notifier = Arc::new(RecordingNotifier::default());
        let forwarder = Forwarder::new(generator.clone(), notifier.clone(), quarter_past_nine());

        let mut out = Vec::new();
        let outcome = forwarder.run(&mut out).await.unwrap();

        assert_eq!(outcome, Outcome::Delivered);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert!(notifier.messages().is_empty());

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("🚀 Sending market update NOW..."));
        assert_eq!(out.matches("sent successfully").count(), 1);
    }

    #[tokio::test]
    async fn failure_sends_one_notice_with_cause_and_time() {
        let notifier = Arc::new(RecordingNotifier::default());
        let forwarder = Forwarder::new(Generator::failing("timeout"), notifier.clone(), quarter_past_nine());

        let mut out = Vec::new();
        let outcome = forwarder.run(&mut out).await.unwrap();

        assert_eq!(outcome, Outcome::FallbackDelivered { cause: "timeout".into() });
        let sent = notifier.messages();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("timeout"));
        assert!(sent[0].contains("09:15 AM"));
        assert!(String::from_utf8(out).unwrap().contains("❌ Error: timeout"));
    }

    #[tokio::test]
    async fn failed_fallback_is_fatal_and_not_retried() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let forwarder = Forwarder::new(Generator::failing("dashboard down"), notifier.clone(), quarter_past_nine());

        let err = forwarder.run(&mut std::io::sink()).await.unwrap_err();

        assert_eq!(err.cause, "dashboard down");
        assert_eq!(notifier.messages().len(), 1);
    }
}
