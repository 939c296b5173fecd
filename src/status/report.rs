//! # status::report — console layout of a [`Report`]

use std::fmt;

use super::Report;

const WIDTH: usize = 80;
/// Warnings beyond this many are counted but not listed.
const MAX_WARNINGS_SHOWN: usize = 5;

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heavy = "=".repeat(WIDTH);
        let light = "-".repeat(WIDTH);
        let s = &self.snapshot;
        let total = self.sections.len();

        writeln!(f, "{heavy}\n🔍 REAL-TIME SYSTEM STATUS CHECK\n{heavy}")?;
        writeln!(f, "⏰ Check Time: {}", self.checked_at.format("%Y-%m-%d %H:%M:%S"))?;

        for (i, section) in self.sections.iter().enumerate() {
            writeln!(f, "\n[{}/{total}] Checking {}\n{light}", i + 1, section.title)?;
            for line in &section.lines {
                writeln!(f, "{line}")?;
            }
        }

        writeln!(f, "\n{heavy}\n📊 SYSTEM STATUS SUMMARY\n{heavy}")?;

        if s.system_running {
            writeln!(f, "✅ System: RUNNING")?;
        } else {
            writeln!(f, "⚠️  System: NOT RUNNING (or cannot detect)")?;
        }

        if s.scanner_available {
            writeln!(
                f,
                "✅ Scanner: AVAILABLE ({} strategies, {} accounts)",
                s.strategies_loaded, s.accounts_active
            )?;
        } else {
            writeln!(f, "❌ Scanner: NOT AVAILABLE")?;
        }

        if !s.issues.is_empty() {
            writeln!(f, "\n❌ CRITICAL ISSUES ({}):", s.issues.len())?;
            for issue in &s.issues {
                writeln!(f, "   • {issue}")?;
            }
        }

        if !s.warnings.is_empty() {
            writeln!(f, "\n⚠️  WARNINGS ({}):", s.warnings.len())?;
            for warning in s.warnings.iter().take(MAX_WARNINGS_SHOWN) {
                writeln!(f, "   • {warning}")?;
            }
        }

        if !s.info.is_empty() {
            writeln!(f, "\nℹ️  INFO:")?;
            for note in &s.info {
                writeln!(f, "   • {note}")?;
            }
        }

        writeln!(f, "\n📈 Recent Activity:")?;
        writeln!(f, "   • Signals: {}", s.activity.signals)?;
        writeln!(f, "   • Trades: {}", s.activity.trades)?;
        writeln!(f, "   • Errors: {}", s.activity.errors)?;

        writeln!(f, "\n🎯 Overall Status: {}\n{heavy}", s.overall())
    }
}
