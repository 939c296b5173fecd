//! # tradewatch — operator tools for the trading system
//!
//! Two independent tools share this crate:
//!
//! ```text
//!  status-check                              market-update
//!  ┌──────────────────────────┐              ┌─────────────────────────────┐
//!  │ StatusReporter           │              │ Forwarder                   │
//!  │  ├─ [1] processes        │              │  ├─ UpdateGenerator ────────┼─▶ MorningBriefing
//!  │  ├─ [2] scanner          │              │  │     (fetch + send)       │     ├─ StatusSource
//!  │  ├─ ...                  │              │  └─ Notifier (fallback) ────┼─▶   │   dashboards → OANDA
//!  │  └─ [8] network          │              └─────────────────────────────┘     └─ TelegramNotifier
//!  │ → StatusSnapshot → stdout│
//!  └──────────────────────────┘
//! ```
//!
//! ## Environment Variables
//!
//! | Variable             | Default                        | Description                        |
//! |----------------------|--------------------------------|------------------------------------|
//! | `TRADING_SYSTEM_DIR` | `google-cloud-trading-system`  | Trading system checkout            |
//! | `TELEGRAM_TOKEN`     | —                              | Bot token                          |
//! | `TELEGRAM_CHAT_ID`   | —                              | Destination chat                   |
//! | `TELEGRAM_API_URL`   | `https://api.telegram.org`     | Bot API base                       |
//! | `STATUS_URLS`        | cloud + `localhost:8080`       | Dashboard `/api/status` endpoints  |
//! | `OANDA_API_KEY`      | —                              | Direct-OANDA fallback              |
//! | `OANDA_ACCOUNT_ID`   | `PRIMARY_ACCOUNT`              | Account for the fallback           |
//! | `OANDA_ENVIRONMENT`  | `practice`                     | `practice` or `live`               |
//! | `KNOWN_STRATEGIES`   | built-in loader list           | Strategies the scanner can load    |
//! | `RUST_LOG`           | `tradewatch=info`              | Tracing filter                     |

use std::sync::Arc;

use chrono::{DateTime, Local};

pub mod briefing;
pub mod config;
pub mod error;
pub mod forwarder;
pub mod models;
pub mod notify;
pub mod status;

/// Source of "now" for anything that prints a local time.
pub type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Local::now)
}
