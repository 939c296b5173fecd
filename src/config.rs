//! # config — Config from Environment Variables
//!
//! Both binaries share this. Nothing here is required and loading never
//! fails: a missing Telegram token only disables the notifier, a missing
//! OANDA key only disables the direct-OANDA fallback of the briefing, and
//! an unrecognised `OANDA_ENVIRONMENT` falls back to practice.

use std::path::{Path, PathBuf};

use tracing::warn;

/// Values the original deployment shipped as "fill me in" placeholders.
const PLACEHOLDERS: &[&str] = &[
    "your_telegram_bot_token_here",
    "your_telegram_chat_id_here",
    "your_oanda_api_key_here",
];

const DEFAULT_STATUS_URLS: &[&str] = &[
    "https://ai-quant-trading.uc.r.appspot.com/api/status",
    "http://localhost:8080/api/status",
];

/// Strategy names the scanner knows how to load.
pub const DEFAULT_KNOWN_STRATEGIES: &[&str] = &[
    "gold_scalping",
    "ultra_strict_forex",
    "momentum_trading",
    "gbp_usd_5m_strategy_rank_1",
    "gbp_usd_5m_strategy_rank_2",
    "gbp_usd_5m_strategy_rank_3",
    "champion_75wr",
    "ultra_strict_v2",
    "momentum_v2",
    "all_weather_70wr",
    "breakout",
    "scalping",
    "swing_trading",
    "adaptive_trump_gold",
];

/// OANDA account type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OandaEnvironment {
    Practice,
    Live,
}

impl OandaEnvironment {
    /// `practice` or `live`, case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "practice" => Some(OandaEnvironment::Practice),
            "live"     => Some(OandaEnvironment::Live),
            _          => None,
        }
    }

    /// REST host, also used by the connectivity probe.
    pub fn api_host(self) -> &'static str {
        match self {
            OandaEnvironment::Practice => "api-fxpractice.oanda.com",
            OandaEnvironment::Live     => "api-fxtrade.oanda.com",
        }
    }
}

impl std::fmt::Display for OandaEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OandaEnvironment::Practice => write!(f, "practice"),
            OandaEnvironment::Live     => write!(f, "live"),
        }
    }
}

/// Everything the tools read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the tool was started from.
    pub base_dir:             PathBuf,
    /// Trading system checkout, relative to `base_dir` unless absolute.
    pub trading_dir:          PathBuf,
    pub telegram_token:       Option<String>,
    pub telegram_chat_id:     Option<String>,
    /// Telegram Bot API base, e.g. `https://api.telegram.org`
    pub telegram_api_url:     String,
    /// Dashboard `/api/status` endpoints, tried in order
    pub status_urls:          Vec<String>,
    pub oanda_api_key:        Option<String>,
    /// `OANDA_ACCOUNT_ID`, falling back to `PRIMARY_ACCOUNT`
    pub oanda_account_id:     Option<String>,
    pub oanda_environment:    OandaEnvironment,
    /// Raw `OANDA_ENVIRONMENT` value that was not recognised, if any.
    pub rejected_environment: Option<String>,
    pub known_strategies:     Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let base_dir = std::env::current_dir().unwrap_or_else(|e| {
            warn!(error = %e, "Cannot determine current directory, using '.'");
            PathBuf::from(".")
        });
        Self::from_vars(base_dir, |key| std::env::var(key).ok())
    }

    /// Build from any variable source. Blank and placeholder values count
    /// as unset.
    pub fn from_vars(base_dir: PathBuf, var: impl Fn(&str) -> Option<String>) -> Self {
        let opt = |key: &str| var(key).and_then(|v| non_placeholder(&v));

        let (oanda_environment, rejected_environment) = match opt("OANDA_ENVIRONMENT") {
            None => (OandaEnvironment::Practice, None),
            Some(raw) => match OandaEnvironment::parse(&raw) {
                Some(env) => (env, None),
                None => {
                    warn!(value = %raw, "Unknown OANDA_ENVIRONMENT, using practice");
                    (OandaEnvironment::Practice, Some(raw))
                }
            },
        };

        let status_urls = opt("STATUS_URLS")
            .map(|v| split_list(&v))
            .unwrap_or_else(|| DEFAULT_STATUS_URLS.iter().map(|s| s.to_string()).collect());

        let known_strategies = opt("KNOWN_STRATEGIES")
            .map(|v| split_list(&v))
            .unwrap_or_else(|| DEFAULT_KNOWN_STRATEGIES.iter().map(|s| s.to_string()).collect());

        Self {
            base_dir,
            trading_dir:          PathBuf::from(
                opt("TRADING_SYSTEM_DIR").unwrap_or_else(|| "google-cloud-trading-system".to_string()),
            ),
            telegram_token:       opt("TELEGRAM_TOKEN"),
            telegram_chat_id:     opt("TELEGRAM_CHAT_ID"),
            telegram_api_url:     opt("TELEGRAM_API_URL")
                .unwrap_or_else(|| "https://api.telegram.org".to_string()),
            status_urls,
            oanda_api_key:        opt("OANDA_API_KEY"),
            oanda_account_id:     opt("OANDA_ACCOUNT_ID").or_else(|| opt("PRIMARY_ACCOUNT")),
            oanda_environment,
            rejected_environment,
            known_strategies,
        }
    }

    /// Absolute location of the trading system checkout.
    pub fn trading_root(&self) -> PathBuf {
        self.base_dir.join(&self.trading_dir)
    }

    /// `oanda_config.env` shipped inside the trading system checkout.
    pub fn oanda_env_file(&self) -> PathBuf {
        self.trading_root().join("oanda_config.env")
    }
}

/// Read an env var, treating empty strings and placeholders as unset.
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|v| non_placeholder(&v))
}

fn non_placeholder(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || PLACEHOLDERS.contains(&value) {
        None
    } else {
        Some(value.to_string())
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ─── Search Roots ─────────────────────────────────────────────────────────────

/// Directories that relative trading-system paths are resolved against.
///
/// Always contains the base directory; the trading system directory is added
/// only when it exists. Resolution never fails.
#[derive(Debug, Clone)]
pub struct SearchRoots {
    roots: Vec<PathBuf>,
}

impl SearchRoots {
    pub fn resolve(base_dir: &Path, trading_dir: &Path) -> Self {
        let mut roots = vec![base_dir.to_path_buf()];
        let trading = base_dir.join(trading_dir);
        if trading.is_dir() {
            roots.push(trading);
        }
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// First root under which `relative` exists, joined. Falls back to the
    /// base directory so callers still get a path to report on.
    pub fn locate(&self, relative: impl AsRef<Path>) -> PathBuf {
        let relative = relative.as_ref();
        self.roots
            .iter()
            .map(|root| root.join(relative))
            .find(|candidate| candidate.exists())
            .unwrap_or_else(|| self.roots[0].join(relative))
    }
}
