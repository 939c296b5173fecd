//! # models::account
//!
//! `accounts.yaml` as the trading system writes it. Only the fields the
//! tools read are modelled; everything else in the file is ignored.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountsFile {
    #[serde(default)]
    pub accounts: Vec<AccountEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountEntry {
    #[serde(default)]
    pub id:           Option<String>,
    #[serde(default)]
    pub name:         Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub strategy:     Option<String>,
    #[serde(default)]
    pub active:       bool,
}

impl AccountsFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid YAML in {}", path.display()))
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        // an empty file parses to `null`
        let parsed: Option<Self> = serde_yaml::from_str(raw)?;
        Ok(parsed.unwrap_or_default())
    }

    pub fn active(&self) -> impl Iterator<Item = &AccountEntry> {
        self.accounts.iter().filter(|a| a.active)
    }
}

impl AccountEntry {
    /// `name`, then `display_name`, then `"Unknown"`.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.display_name.as_deref())
            .unwrap_or("Unknown")
    }

    /// Name the scanner registers a strategy under: `display_name` first.
    pub fn scanner_label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("Unknown")
    }

    /// Last three characters of the account id, e.g. `"008"`.
    pub fn short_id(&self) -> &str {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => {
                let start = id
                    .char_indices()
                    .rev()
                    .nth(2)
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                &id[start..]
            }
            _ => "N/A",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_accounts_and_filters_active() {
        let file = AccountsFile::parse(
            r#"
accounts:
  - id: "101-004-30719775-008"
    name: "High Freq"
    strategy: momentum_trading
    active: true
    instruments: [EUR_USD]
  - id: "101-004-30719775-006"
    display_name: "High Win"
    strategy: champion_75wr
    active: false
"#,
        )
        .unwrap();

        assert_eq!(file.accounts.len(), 2);
        let active: Vec<_> = file.active().collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].label(), "High Freq");
        assert_eq!(active[0].short_id(), "008");
    }

    #[test]
    fn empty_file_is_no_accounts() {
        assert!(AccountsFile::parse("").unwrap().accounts.is_empty());
    }

    #[test]
    fn labels_fall_back() {
        let entry = AccountEntry {
            id: Some("7".into()),
            name: None,
            display_name: Some("Gold Week".into()),
            strategy: None,
            active: true,
        };
        assert_eq!(entry.label(), "Gold Week");
        assert_eq!(entry.scanner_label(), "Gold Week");
        assert_eq!(entry.short_id(), "7");

        let bare = AccountEntry { id: None, name: None, display_name: None, strategy: None, active: true };
        assert_eq!(bare.label(), "Unknown");
        assert_eq!(bare.short_id(), "N/A");
    }
}
