//! # status-check
//!
//! Prints a sectioned snapshot of the trading system's health to stdout.
//! Always exits 0 once the report is printed: failing checks show up as
//! issues in the report, not as a process error.

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tradewatch::config::{Config, SearchRoots};
use tradewatch::status::StatusReporter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env ──────────────────────────────────────────────────────────
    dotenvy::dotenv().ok();

    // ── 2. Structured logging (stderr, stdout is the report) ────────────────
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive("tradewatch=info".parse()?)
                .add_directive("status_check=info".parse()?),
        )
        .init();

    let config = Config::from_env();

    // ── 3. Search roots (best-effort) ─────────────────────────────────────────
    let roots = SearchRoots::resolve(&config.base_dir, &config.trading_dir);
    info!(roots = ?roots.roots(), "🔍 Status check starting");

    // ── 4. Run checks & print ─────────────────────────────────────────────────
    let report = StatusReporter::standard(&config, roots).run().await;
    print!("{report}");

    info!(
        issues   = report.snapshot.issues.len(),
        warnings = report.snapshot.warnings.len(),
        overall  = %report.snapshot.overall(),
        "Status check finished"
    );
    Ok(())
}
