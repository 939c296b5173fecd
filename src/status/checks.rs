//! # status::checks — the individual diagnostics
//!
//! Each check fills its own report section and touches the snapshot.
//! Returning `Err` is fine: the reporter turns it into an issue and moves
//! on to the next check.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tokio::process::Command;

use crate::config::{OandaEnvironment, SearchRoots};
use crate::models::{AccountsFile, Activity, StatusSnapshot};

use super::scanner::ScannerProbe;
use super::{Check, Section};

/// Run an external command with a deadline, returning `(success, stdout)`.
async fn run_command(program: &str, args: &[&str], deadline: Duration) -> anyhow::Result<(bool, String)> {
    let output = tokio::time::timeout(deadline, Command::new(program).args(args).kill_on_drop(true).output())
        .await
        .with_context(|| format!("`{program}` timed out after {deadline:?}"))?
        .with_context(|| format!("cannot run `{program}`"))?;
    Ok((output.status.success(), String::from_utf8_lossy(&output.stdout).into_owned()))
}

// ─── [1] System Processes ─────────────────────────────────────────────────────

pub struct ProcessCheck;

/// A running trading process as seen in `ps aux`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradingProcess {
    pub pid:     String,
    pub command: Option<String>,
}

/// Python processes that look like the trading system (`main.py` or
/// anything mentioning "trading").
pub fn find_trading_processes(ps_output: &str) -> Vec<TradingProcess> {
    ps_output
        .lines()
        .filter(|line| {
            let lower = line.to_lowercase();
            lower.contains("python") && (line.contains("main.py") || lower.contains("trading"))
        })
        .map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            TradingProcess {
                pid:     parts.get(1).unwrap_or(&"?").to_string(),
                command: parts.get(10).map(|c| c.chars().take(50).collect()),
            }
        })
        .collect()
}

#[async_trait]
impl Check for ProcessCheck {
    fn title(&self) -> &'static str {
        "System Processes"
    }

    async fn run(&self, snapshot: &mut StatusSnapshot, section: &mut Section) -> anyhow::Result<()> {
        let (_, stdout) = run_command("ps", &["aux"], Duration::from_secs(5)).await?;
        let procs = find_trading_processes(&stdout);

        if procs.is_empty() {
            section.line("⚠️  No trading system processes found");
            snapshot.warn("No trading system processes running");
            return Ok(());
        }

        section.line(format!("✓ Found {} trading-related Python processes:", procs.len()));
        for p in procs.iter().take(3) {
            if let Some(cmd) = &p.command {
                section.line(format!("  • PID {}: {cmd}...", p.pid));
            }
        }
        snapshot.system_running = true;
        Ok(())
    }
}

// ─── [2] Scanner Status ───────────────────────────────────────────────────────

pub struct ScannerCheck {
    probe: Box<dyn ScannerProbe>,
}

impl ScannerCheck {
    pub fn new(probe: Box<dyn ScannerProbe>) -> Self {
        Self { probe }
    }
}

#[async_trait]
impl Check for ScannerCheck {
    fn title(&self) -> &'static str {
        "Scanner Status"
    }

    async fn run(&self, snapshot: &mut StatusSnapshot, section: &mut Section) -> anyhow::Result<()> {
        let Some(state) = self.probe.probe().await? else {
            section.line("❌ Scanner not available");
            snapshot.issue("Scanner failed to initialize");
            return Ok(());
        };

        section.line("✓ Scanner initialized");
        snapshot.scanner_available = true;

        snapshot.strategies_loaded = state.strategies.len();
        section.line(format!("  • Strategies loaded: {}", state.strategies.len()));
        if state.strategies.is_empty() {
            snapshot.issue("NO STRATEGIES LOADED - system cannot trade");
        }

        snapshot.accounts_active = state.accounts.len();
        section.line(format!("  • Accounts configured: {}", state.accounts.len()));
        if state.accounts.is_empty() {
            snapshot.issue("NO ACCOUNTS CONFIGURED");
        }

        for (id, strategy) in &state.unknown {
            section.line(format!("  ⚠️  No loader for strategy '{strategy}' (account {id})"));
            snapshot.warn(format!("Strategy '{strategy}' not found in loader mapping for account {id}"));
        }
        Ok(())
    }
}

// ─── [3] Accounts Configuration ───────────────────────────────────────────────

pub struct AccountsCheck {
    path: PathBuf,
}

impl AccountsCheck {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Check for AccountsCheck {
    fn title(&self) -> &'static str {
        "Accounts Configuration"
    }

    async fn run(&self, snapshot: &mut StatusSnapshot, section: &mut Section) -> anyhow::Result<()> {
        if !self.path.is_file() {
            section.line("❌ accounts.yaml not found");
            snapshot.issue("accounts.yaml missing");
            return Ok(());
        }

        let file = AccountsFile::load(&self.path)?;
        let active: Vec<_> = file.active().collect();

        section.line("✓ accounts.yaml found");
        section.line(format!("  • Total accounts: {}", file.accounts.len()));
        section.line(format!("  • Active accounts: {}", active.len()));

        if active.is_empty() {
            snapshot.issue("NO ACTIVE ACCOUNTS in accounts.yaml");
            return Ok(());
        }

        section.line("");
        section.line("  Active Accounts:");
        for acc in active.iter().take(5) {
            section.line(format!(
                "    • {} ({}): {}",
                acc.label(),
                acc.short_id(),
                acc.strategy.as_deref().unwrap_or("N/A")
            ));
        }
        Ok(())
    }
}

// ─── [4] Environment Variables ────────────────────────────────────────────────

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

pub struct EnvCheck {
    lookup: Lookup,
}

impl EnvCheck {
    /// Reads the process environment.
    pub fn from_process() -> Self {
        Self::with_lookup(Box::new(crate::config::env_opt))
    }

    pub fn with_lookup(lookup: Lookup) -> Self {
        Self { lookup }
    }
}

/// First 10 and last 4 characters of a key; `***` for short keys.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let head: String = chars.iter().take(10).collect();
    let tail: String = if chars.len() > 14 {
        chars[chars.len() - 4..].iter().collect()
    } else {
        "***".to_string()
    };
    format!("{head}...{tail}")
}

#[async_trait]
impl Check for EnvCheck {
    fn title(&self) -> &'static str {
        "Environment Variables"
    }

    async fn run(&self, snapshot: &mut StatusSnapshot, section: &mut Section) -> anyhow::Result<()> {
        let get = &self.lookup;

        match get("OANDA_API_KEY") {
            Some(key) => section.line(format!("✓ OANDA_API_KEY: {}", mask_key(&key))),
            None => {
                section.line("⚠️  OANDA_API_KEY: NOT SET");
                snapshot.issue("OANDA_API_KEY not set");
            }
        }

        match get("OANDA_ACCOUNT_ID").or_else(|| get("PRIMARY_ACCOUNT")) {
            Some(id) => section.line(format!("✓ OANDA_ACCOUNT_ID: {id}")),
            None => {
                section.line("⚠️  OANDA_ACCOUNT_ID: NOT SET");
                snapshot.warn("OANDA_ACCOUNT_ID not set");
            }
        }

        let raw = get("OANDA_ENVIRONMENT");
        match raw.as_deref().map_or(Some(OandaEnvironment::Practice), OandaEnvironment::parse) {
            Some(environment) => {
                section.line(format!("✓ OANDA_ENVIRONMENT: {environment}"));
                snapshot.note(format!("OANDA environment: {environment}"));
            }
            None => {
                let raw = raw.unwrap_or_default();
                section.line(format!("❌ OANDA_ENVIRONMENT: '{raw}' not recognised, using practice"));
                snapshot.issue(format!("Unknown OANDA_ENVIRONMENT '{raw}' (use 'practice' or 'live')"));
            }
        }

        for key in ["TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"] {
            if get(key).is_some() {
                section.line(format!("✓ {key}: ***SET***"));
            } else {
                section.line(format!("⚠️  {key}: NOT SET"));
            }
        }
        Ok(())
    }
}

// ─── [5] Service Files ────────────────────────────────────────────────────────

/// Unit files shipped next to the tools.
const SERVICE_FILES: &[&str] = &["automated_trading.service", "ai_trading.service"];
/// Unit file shipped inside the trading checkout.
const TRADING_SERVICE_FILE: &str = "adaptive-trading-system.service";

pub struct ServiceFilesCheck {
    files: Vec<PathBuf>,
}

impl ServiceFilesCheck {
    pub fn new(base_dir: &Path, trading_root: &Path) -> Self {
        let mut files: Vec<PathBuf> = SERVICE_FILES.iter().map(|f| base_dir.join(f)).collect();
        files.push(trading_root.join(TRADING_SERVICE_FILE));
        Self { files }
    }
}

#[async_trait]
impl Check for ServiceFilesCheck {
    fn title(&self) -> &'static str {
        "Service Files"
    }

    async fn run(&self, snapshot: &mut StatusSnapshot, section: &mut Section) -> anyhow::Result<()> {
        for path in &self.files {
            let name = path.file_name().unwrap_or_default().to_string_lossy();
            if path.exists() {
                section.line(format!("✓ {name}: Found"));
            } else {
                section.line(format!("⚠️  {name}: Not found"));
            }
        }

        // systemctl is absent on dev machines and containers; say nothing then
        if let Ok((true, state)) =
            run_command("systemctl", &["is-active", "automated_trading.service"], Duration::from_secs(3)).await
        {
            let state = state.trim();
            section.line(format!("  • automated_trading.service: {state}"));
            snapshot.note(format!("automated_trading.service is {state}"));
        }
        Ok(())
    }
}

// ─── [6] Recent Log Activity ──────────────────────────────────────────────────

const LOG_FILES: &[&str] = &[
    "logs/real_system_manual_fix.log",
    "logs/real_system_final.log",
    "working_server.log",
];

/// Lines read from the end of each log.
const LOG_TAIL: usize = 500;

const SIGNAL_MARKERS: &[&str] = &["signal generated", "opportunity found", "entry signal"];
const TRADE_MARKERS: &[&str] = &["trade executed", "entered:", "order placed"];

#[derive(Debug, Default, PartialEq)]
pub struct LogScan {
    pub activity:  Activity,
    /// Start of the first signal line that mentions a scan.
    pub last_scan: Option<String>,
}

impl LogScan {
    pub fn feed(&mut self, line: &str) {
        let lower = line.to_lowercase();

        if SIGNAL_MARKERS.iter().any(|m| lower.contains(m)) {
            self.activity.signals += 1;
            if self.last_scan.is_none() && lower.contains("scan") {
                self.last_scan = Some(line.chars().take(50).collect());
            }
        }

        if TRADE_MARKERS.iter().any(|m| lower.contains(m)) {
            self.activity.trades += 1;
        }

        // price verification failures are constant noise
        if (lower.contains("error") || lower.contains("failed")) && !lower.contains("price verification") {
            self.activity.errors += 1;
        }
    }
}

fn tail_lines(path: &Path, n: usize) -> anyhow::Result<Vec<String>> {
    let bytes = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    Ok(lines[start..].iter().map(|l| l.to_string()).collect())
}

pub struct LogActivityCheck {
    roots: SearchRoots,
}

impl LogActivityCheck {
    pub fn new(roots: SearchRoots) -> Self {
        Self { roots }
    }
}

#[async_trait]
impl Check for LogActivityCheck {
    fn title(&self) -> &'static str {
        "Recent Log Activity"
    }

    async fn run(&self, snapshot: &mut StatusSnapshot, section: &mut Section) -> anyhow::Result<()> {
        let mut scan = LogScan::default();

        for rel in LOG_FILES {
            let path = self.roots.locate(rel);
            if !path.exists() {
                continue;
            }
            match tail_lines(&path, LOG_TAIL) {
                Ok(lines) => {
                    lines.iter().for_each(|l| scan.feed(l));
                    section.line(format!("✓ Analyzed {rel}: {} lines", lines.len()));
                }
                Err(e) => {
                    section.line(format!("⚠️  Could not read {rel}: {e:#}"));
                    snapshot.warn(format!("Could not read {rel}"));
                }
            }
        }

        let Activity { signals, trades, errors } = scan.activity;
        section.line("");
        section.line(format!("  • Signals found: {signals}"));
        section.line(format!("  • Trades found: {trades}"));
        section.line(format!("  • Errors found: {errors}"));
        if let Some(last) = &scan.last_scan {
            section.line(format!("  • Last scan: {last}"));
            snapshot.note(format!("Last scan: {last}"));
        }

        if signals > 0 && trades == 0 {
            snapshot.issue("Signals generated but NO trades executed");
        } else if signals == 0 {
            snapshot.warn("NO signals found in recent logs");
        }
        snapshot.activity = scan.activity;
        Ok(())
    }
}

// ─── [7] Critical Files ───────────────────────────────────────────────────────

const CRITICAL_FILES: &[(&str, &str)] = &[
    ("main.py", "main.py"),
    ("scanner", "src/core/simple_timer_scanner.py"),
    ("order_manager", "src/core/order_manager.py"),
    ("dashboard", "src/dashboard/advanced_dashboard.py"),
];

/// Trading system sources that must exist, relative to the checkout.
pub struct CriticalFilesCheck {
    trading_root: PathBuf,
}

impl CriticalFilesCheck {
    pub fn new(trading_root: PathBuf) -> Self {
        Self { trading_root }
    }
}

#[async_trait]
impl Check for CriticalFilesCheck {
    fn title(&self) -> &'static str {
        "Critical Files"
    }

    async fn run(&self, snapshot: &mut StatusSnapshot, section: &mut Section) -> anyhow::Result<()> {
        for (name, rel) in CRITICAL_FILES {
            let path = self.trading_root.join(rel);
            if path.exists() {
                section.line(format!("✓ {name}: Found"));
            } else {
                section.line(format!("❌ {name}: MISSING - {}", path.display()));
                snapshot.issue(format!("{name} file missing"));
            }
        }
        Ok(())
    }
}

// ─── [8] Network Connectivity ─────────────────────────────────────────────────

pub struct NetworkCheck {
    host:    String,
    port:    u16,
    timeout: Duration,
}

impl NetworkCheck {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port, timeout: Duration::from_secs(3) }
    }
}

#[async_trait]
impl Check for NetworkCheck {
    fn title(&self) -> &'static str {
        "Network Connectivity"
    }

    async fn run(&self, snapshot: &mut StatusSnapshot, section: &mut Section) -> anyhow::Result<()> {
        let connect = tokio::net::TcpStream::connect((self.host.as_str(), self.port));
        let result = match tokio::time::timeout(self.timeout, connect).await {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("timed out after {:?}", self.timeout)),
        };

        match result {
            Ok(()) => section.line(format!("✓ OANDA API ({}): Reachable", self.host)),
            Err(e) => {
                section.line(format!("⚠️  OANDA API ({}): Not reachable - {e}", self.host));
                snapshot.warn("Cannot reach OANDA API");
            }
        }
        Ok(())
    }
}
