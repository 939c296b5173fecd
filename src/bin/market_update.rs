//! # market-update
//!
//! Sends the morning briefing to Telegram right now. If the briefing fails,
//! one error notice goes out instead; if that fails too the process exits
//! non-zero.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tradewatch::briefing::{MorningBriefing, StatusSource};
use tradewatch::config::Config;
use tradewatch::forwarder::{Forwarder, Outcome};
use tradewatch::notify::{Notifier, TelegramNotifier};
use tradewatch::system_clock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env ──────────────────────────────────────────────────────────
    dotenvy::dotenv().ok();

    // ── 2. Structured logging (stderr, stdout is for the operator) ──────────
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive("tradewatch=info".parse()?)
                .add_directive("market_update=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // ── 3. Config (+ the trading system's own env file, if present) ─────────
    let config = Config::from_env();
    let env_file = config.oanda_env_file();
    let config = match dotenvy::from_path(&env_file) {
        Ok(()) => {
            info!(path = %env_file.display(), "Loaded trading system env file");
            Config::from_env()
        }
        Err(_) => config,
    };

    // ── 4. Wire collaborators ─────────────────────────────────────────────────
    let client = reqwest::Client::new();
    let telegram = TelegramNotifier::from_config(client.clone(), &config);
    if !telegram.enabled() {
        tracing::warn!("❌ Telegram notifier not enabled, delivery will fail");
    }
    let notifier: Arc<dyn Notifier> = Arc::new(telegram);

    let briefing = MorningBriefing::new(
        Box::new(StatusSource::from_config(client, &config)),
        Arc::clone(&notifier),
        system_clock(),
    );
    let forwarder = Forwarder::new(Arc::new(briefing), notifier, system_clock());

    // ── 5. Deliver ────────────────────────────────────────────────────────────
    let outcome = forwarder.run(&mut std::io::stdout()).await?;
    match outcome {
        Outcome::Delivered => info!("Done"),
        Outcome::FallbackDelivered { cause } => info!(cause = %cause, "Done (fallback notice sent)"),
    }
    Ok(())
}
