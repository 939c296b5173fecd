//! # models::snapshot
//!
//! [`StatusSnapshot`] holds the findings of one `status-check` run. Created
//! fresh, filled by the checks, printed once, dropped. Counts are `usize`
//! so they can never go negative.

/// Counts pulled from recent log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Activity {
    pub signals: usize,
    pub trades:  usize,
    pub errors:  usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusSnapshot {
    pub system_running:    bool,
    pub scanner_available: bool,
    pub strategies_loaded: usize,
    pub accounts_active:   usize,
    /// Blocking problems
    pub issues:            Vec<String>,
    /// Non-blocking anomalies
    pub warnings:          Vec<String>,
    pub info:              Vec<String>,
    pub activity:          Activity,
}

/// Verdict printed at the bottom of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallStatus {
    NeedsAttention,
    Warnings,
    Operational,
    Unknown,
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverallStatus::NeedsAttention => write!(f, "❌ NEEDS ATTENTION"),
            OverallStatus::Warnings       => write!(f, "⚠️  WARNINGS"),
            OverallStatus::Operational    => write!(f, "✅ OPERATIONAL"),
            OverallStatus::Unknown        => write!(f, "⚠️  UNKNOWN STATE"),
        }
    }
}

impl StatusSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, msg: impl Into<String>) {
        self.issues.push(msg.into());
    }

    pub fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn note(&mut self, msg: impl Into<String>) {
        self.info.push(msg.into());
    }

    pub fn overall(&self) -> OverallStatus {
        if !self.issues.is_empty() {
            OverallStatus::NeedsAttention
        } else if !self.warnings.is_empty() {
            OverallStatus::Warnings
        } else if self.scanner_available && self.strategies_loaded > 0 {
            OverallStatus::Operational
        } else {
            OverallStatus::Unknown
        }
    }
}
