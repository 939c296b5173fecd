//! # briefing::message — Telegram message templates
//!
//! All templates use Telegram HTML, so free text from outside (error
//! descriptions) goes through [`escape_html`] first.

use chrono::{DateTime, Local};

use crate::models::CloudStatus;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Instruments shown in the price section.
const MAX_QUOTES: usize = 5;

/// Escape the three characters Telegram's HTML parser cares about.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// `1234567.891` → `"1,234,567.89"`
pub fn format_money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Sent instead of the briefing when no status source answered.
pub fn system_issue() -> String {
    "🌅 <b>MORNING BRIEFING - System Issue</b>
⏰ 6:00 AM London Time

⚠️ Unable to connect to cloud system.
Will retry and send update when connection restored.
"
    .to_string()
}

/// The full morning briefing.
pub fn morning_briefing(status: &CloudStatus, now: DateTime<Local>) -> String {
    let quotes = status.quotes(MAX_QUOTES);
    let market_prices = if quotes.is_empty() {
        "\n📡 Fetching live prices...".to_string()
    } else {
        quotes
            .iter()
            .map(|(instrument, q)| {
                format!(
                    "\n{}: {:.5} (spread: {:.5})",
                    instrument.replace('_', "/"),
                    q.mid(),
                    q.spread()
                )
            })
            .collect()
    };

    let today = now.format("%A %b %d").to_string().to_uppercase();
    let time = now.format("%I:%M %p");
    let total_balance = format_money(status.total_balance());
    let active_accounts = status.account_statuses.len();
    let open_positions = status.total_open_positions();
    let phase = escape_html(&status.trade_phase);
    let recommendation = escape_html(&status.ai_recommendation);

    format!(
        "🌅 <b>GOOD MORNING - {today}</b>
⏰ {time} London Time

{RULE}
💼 <b>PORTFOLIO STATUS</b>
{RULE}

Total Balance: ${total_balance}
Active Accounts: {active_accounts}
Open Positions: {open_positions}
System Status: 🟢 Online

{RULE}
📊 <b>LIVE MARKET PRICES</b>
{RULE}{market_prices}

{RULE}
🎯 <b>TODAY'S PLAN</b>
{RULE}

Current Phase: {phase}
AI Recommendation: <b>{recommendation}</b>

<b>Trading Schedule:</b>
• Now - 2:00 PM: Light activity expected
• 2:00-5:00 PM: ⭐ PRIME TIME (main window)
• 5:00-9:00 PM: Moderate activity + exits

Expected Trades Today: 7-15 signals
Target Win Rate: 65-75%
Daily Goal: +0.5% to +2.0%

{RULE}
📊 <b>MARKET CONDITIONS</b>
{RULE}

Early London session - markets waking up
Volatility: Low to Moderate
Best opportunities: 2-5 PM London/NY overlap

{RULE}

System will alert you to quality setups as they appear. Prime time starts in 8 hours!

Have a great trading day! 💼📈
"
    )
}

/// Error notice the forwarder sends when the briefing could not go out.
pub fn fallback_notice(cause: &str, now: DateTime<Local>) -> String {
    format!(
        "⚠️ <b>Market Update Error</b>

Failed to send market update: {}

Time: {}
",
        escape_html(cause),
        now.format("%I:%M %p"),
    )
}
