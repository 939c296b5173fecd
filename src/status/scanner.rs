//! # status::scanner — can the trading scanner come up?
//!
//! The scanner registers one strategy per active account in
//! `accounts.yaml`, keyed by the account's display label, and only for
//! strategies it has a loader for. [`AccountsScanner`] performs the same
//! resolution without starting anything.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::models::AccountsFile;

/// What a constructed scanner would hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScannerState {
    /// account label → strategy name
    pub strategies: BTreeMap<String, String>,
    /// account label → account id
    pub accounts:   BTreeMap<String, String>,
    /// Active accounts whose strategy has no loader: `(account id, strategy)`
    pub unknown:    Vec<(String, String)>,
}

#[async_trait]
pub trait ScannerProbe: Send + Sync {
    /// `Ok(None)`: the scanner could not be constructed at all.
    async fn probe(&self) -> anyhow::Result<Option<ScannerState>>;
}

pub struct AccountsScanner {
    accounts_path: PathBuf,
    known:         Vec<String>,
}

impl AccountsScanner {
    pub fn new(accounts_path: PathBuf, known: Vec<String>) -> Self {
        Self { accounts_path, known }
    }

    fn resolve(&self, file: &AccountsFile) -> ScannerState {
        let mut state = ScannerState::default();
        for acc in file.active() {
            let id = acc.id.clone().unwrap_or_else(|| "N/A".to_string());
            let Some(strategy) = acc.strategy.as_deref() else {
                state.unknown.push((id, "<none>".to_string()));
                continue;
            };
            if self.known.iter().any(|k| k == strategy) {
                let label = acc.scanner_label().to_string();
                state.strategies.insert(label.clone(), strategy.to_string());
                state.accounts.insert(label, id);
            } else {
                state.unknown.push((id, strategy.to_string()));
            }
        }
        state
    }
}

#[async_trait]
impl ScannerProbe for AccountsScanner {
    async fn probe(&self) -> anyhow::Result<Option<ScannerState>> {
        if !self.accounts_path.is_file() {
            return Ok(None);
        }
        let file = AccountsFile::load(&self.accounts_path)?;
        Ok(Some(self.resolve(&file)))
    }
}
