//! # status — Status Reporter
//!
//! Runs a fixed list of independent [`Check`]s against a fresh
//! [`StatusSnapshot`] and collects one report [`Section`] per check.
//!
//! A check that returns `Err` costs an issue entry, never the run:
//!
//! ```text
//! for check in checks:
//!     Ok   → section + snapshot updates kept
//!     Err  → issues += "<title> check failed: <error>"
//! ```

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::config::{Config, SearchRoots};
use crate::models::StatusSnapshot;

pub mod checks;
pub mod report;
pub mod scanner;

use checks::{
    AccountsCheck, CriticalFilesCheck, EnvCheck, LogActivityCheck, NetworkCheck, ProcessCheck,
    ScannerCheck, ServiceFilesCheck,
};
use scanner::AccountsScanner;

/// Detail lines printed under one check's heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: &'static str,
    pub lines: Vec<String>,
}

impl Section {
    pub fn new(title: &'static str) -> Self {
        Self { title, lines: Vec::new() }
    }

    pub fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }
}

/// One diagnostic step.
#[async_trait]
pub trait Check: Send + Sync {
    fn title(&self) -> &'static str;

    async fn run(&self, snapshot: &mut StatusSnapshot, section: &mut Section) -> anyhow::Result<()>;
}

/// Everything one run produced, ready to render.
#[derive(Debug, Clone)]
pub struct Report {
    pub checked_at: DateTime<Local>,
    pub sections:   Vec<Section>,
    pub snapshot:   StatusSnapshot,
}

pub struct StatusReporter {
    checks: Vec<Box<dyn Check>>,
}

impl StatusReporter {
    pub fn new(checks: Vec<Box<dyn Check>>) -> Self {
        Self { checks }
    }

    /// The standard eight checks for a trading system deployment.
    pub fn standard(config: &Config, roots: SearchRoots) -> Self {
        let accounts_path = roots.locate(Path::new("accounts.yaml"));
        let trading_root = config.trading_root();

        Self::new(vec![
            Box::new(ProcessCheck),
            Box::new(ScannerCheck::new(Box::new(AccountsScanner::new(
                accounts_path.clone(),
                config.known_strategies.clone(),
            )))),
            Box::new(AccountsCheck::new(accounts_path)),
            Box::new(EnvCheck::from_process()),
            Box::new(ServiceFilesCheck::new(&config.base_dir, &trading_root)),
            Box::new(LogActivityCheck::new(roots)),
            Box::new(CriticalFilesCheck::new(trading_root)),
            Box::new(NetworkCheck::new(config.oanda_environment.api_host(), 443)),
        ])
    }

    pub async fn run(&self) -> Report {
        let checked_at = Local::now();
        let mut snapshot = StatusSnapshot::new();
        let mut sections = Vec::with_capacity(self.checks.len());

        for check in &self.checks {
            let mut section = Section::new(check.title());
            match check.run(&mut snapshot, &mut section).await {
                Ok(()) => debug!(check = check.title(), "check done"),
                Err(e) => {
                    let msg = format!("{e:#}");
                    warn!(check = check.title(), error = %msg, "⚠️ check failed");
                    section.line(format!("❌ Check failed: {msg}"));
                    snapshot.issue(format!("{} check failed: {msg}", check.title()));
                }
            }
            sections.push(section);
        }

        Report { checked_at, sections, snapshot }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Boom;

    #[async_trait]
    impl Check for Boom {
        fn title(&self) -> &'static str {
            "Boom"
        }

        async fn run(&self, _: &mut StatusSnapshot, section: &mut Section) -> anyhow::Result<()> {
            section.line("about to fail");
            anyhow::bail!("kaboom")
        }
    }

    struct Counts;

    #[async_trait]
    impl Check for Counts {
        fn title(&self) -> &'static str {
            "Counts"
        }

        async fn run(&self, snapshot: &mut StatusSnapshot, _: &mut Section) -> anyhow::Result<()> {
            snapshot.scanner_available = true;
            snapshot.strategies_loaded = 2;
            snapshot.accounts_active = 2;
            Ok(())
        }
    }

    #[tokio::test]
    async fn failing_checks_do_not_stop_the_run() {
        let reporter = StatusReporter::new(vec![Box::new(Boom), Box::new(Counts), Box::new(Boom)]);
        let report = reporter.run().await;

        assert_eq!(report.sections.len(), 3);
        assert_eq!(report.snapshot.issues, vec!["Boom check failed: kaboom"; 2]);
        assert_eq!(report.snapshot.strategies_loaded, 2);
        assert_eq!(report.sections[0].lines, vec!["about to fail", "❌ Check failed: kaboom"]);
    }

    #[tokio::test]
    async fn every_check_failing_still_renders() {
        let reporter = StatusReporter::new((0..8).map(|_| Box::new(Boom) as Box<dyn Check>).collect());
        let report = reporter.run().await;

        assert_eq!(report.snapshot.issues.len(), 8);
        assert_eq!(report.snapshot.strategies_loaded, 0);
        assert!(report.to_string().contains("CRITICAL ISSUES (8)"));
    }
}
