//! # models::cloud_status
//!
//! [`CloudStatus`] is what the trading dashboard serves on `/api/status`,
//! and what the briefing renders. The dashboard payload is loosely typed,
//! so every field is optional and defaults to something printable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudStatus {
    #[serde(default)]
    pub account_statuses:  BTreeMap<String, AccountStatus>,

    /// Instrument → `{bid, ask, ...}`. Kept as a raw map so the dashboard's
    /// ordering survives (the briefing shows the first five).
    #[serde(default)]
    pub market_data:       Map<String, Value>,

    #[serde(default = "default_phase")]
    pub trade_phase:       String,

    #[serde(default = "default_recommendation")]
    pub ai_recommendation: String,
}

fn default_phase() -> String {
    "Active".to_string()
}

fn default_recommendation() -> String {
    "MONITOR".to_string()
}

impl Default for CloudStatus {
    fn default() -> Self {
        Self {
            account_statuses:  BTreeMap::new(),
            market_data:       Map::new(),
            trade_phase:       default_phase(),
            ai_recommendation: default_recommendation(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountStatus {
    #[serde(default)]
    pub balance:        f64,
    #[serde(default)]
    pub open_positions: u64,
    #[serde(default)]
    pub active:         bool,
}

/// One instrument's quote as shown in the briefing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub bid: f64,
    pub ask: f64,
}

impl Quote {
    /// Mid price; `0` unless both sides are quoted.
    pub fn mid(&self) -> f64 {
        if self.bid != 0.0 && self.ask != 0.0 {
            (self.bid + self.ask) / 2.0
        } else {
            0.0
        }
    }

    pub fn spread(&self) -> f64 {
        if self.bid != 0.0 && self.ask != 0.0 {
            self.ask - self.bid
        } else {
            0.0
        }
    }
}

impl CloudStatus {
    pub fn total_balance(&self) -> f64 {
        self.account_statuses.values().map(|a| a.balance).sum()
    }

    pub fn total_open_positions(&self) -> u64 {
        self.account_statuses.values().map(|a| a.open_positions).sum()
    }

    /// First `limit` quotes in dashboard order. Missing sides read as `0`.
    pub fn quotes(&self, limit: usize) -> Vec<(&str, Quote)> {
        self.market_data
            .iter()
            .take(limit)
            .map(|(instrument, data)| {
                let side = |key: &str| data.get(key).and_then(Value::as_f64).unwrap_or(0.0);
                (instrument.as_str(), Quote { bid: side("bid"), ask: side("ask") })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_payload_gets_defaults() {
        let status: CloudStatus = serde_json::from_str("{}").unwrap();
        assert_eq!(status.trade_phase, "Active");
        assert_eq!(status.ai_recommendation, "MONITOR");
        assert_eq!(status.total_balance(), 0.0);
        assert!(status.quotes(5).is_empty());
    }

    #[test]
    fn totals_and_quote_order() {
        let status: CloudStatus = serde_json::from_str(r#"{
            "account_statuses": {
                "a": {"balance": 1000.5, "open_positions": 2, "active": true},
                "b": {"balance": 499.5, "open_positions": 1}
            },
            "market_data": {
                "XAU_USD": {"bid": 2400.0, "ask": 2400.5},
                "EUR_USD": {"bid": 1.1, "ask": 1.1002},
                "GBP_USD": {"bid": 1.25}
            }
        }"#).unwrap();

        assert_eq!(status.total_balance(), 1500.0);
        assert_eq!(status.total_open_positions(), 3);

        let quotes = status.quotes(2);
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].0, "XAU_USD");
        assert_eq!(quotes[0].1.mid(), 2400.25);
        assert_eq!(quotes[1].0, "EUR_USD");

        let gbp = status.quotes(5)[2].1;
        assert_eq!(gbp.mid(), 0.0);
        assert_eq!(gbp.spread(), 0.0);
    }
}
