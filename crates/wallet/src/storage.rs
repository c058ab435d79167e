use stakectl_types::BlsPublicKey;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::*;
use crate::types::*;

const WALLET_FILE: &str = "wallet.json";

/// Split a `wallet/account` path at its first `/`.
pub fn parse_account_path(path: &str) -> Result<(&str, &str)> {
    match path.split_once('/') {
        Some((wallet, account)) if !wallet.is_empty() && !account.is_empty() => {
            Ok((wallet, account))
        }
        _ => Err(WalletError::InvalidPath(path.to_string())),
    }
}

/// Directory of wallets, one `<uuid>/wallet.json` per wallet
#[derive(Debug, Clone)]
pub struct WalletStore {
    base_dir: PathBuf,
}

impl WalletStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn wallet_path(&self, uuid: Uuid) -> PathBuf {
        self.base_dir.join(uuid.to_string()).join(WALLET_FILE)
    }

    /// Create and persist an empty wallet.
    pub fn create_wallet(&self, name: &str, kind: WalletKind) -> Result<Wallet> {
        validate_wallet_name(name)?;
        if self.find_wallet(name)?.is_some() {
            return Err(WalletError::WalletExists(name.to_string()));
        }

        let wallet = Wallet::new(name, kind);
        self.save(&wallet)?;
        info!(wallet = %name, kind = %kind, "created wallet");
        Ok(wallet)
    }

    /// All wallets in the store, sorted by name. A missing store is empty.
    pub fn list_wallets(&self) -> Result<Vec<Wallet>> {
        let mut wallets = Vec::new();
        if !self.base_dir.exists() {
            return Ok(wallets);
        }

        let entries = fs::read_dir(&self.base_dir).map_err(|e| {
            WalletError::StorageError(format!("Failed to read wallet directory: {}", e))
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                WalletError::StorageError(format!("Failed to read wallet entry: {}", e))
            })?;
            let path = entry.path().join(WALLET_FILE);
            if !path.is_file() {
                continue;
            }

            match load_wallet(&path) {
                Ok(wallet) => wallets.push(wallet),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable wallet"),
            }
        }

        wallets.sort_by(|a, b| a.config.name.cmp(&b.config.name));
        Ok(wallets)
    }

    pub fn wallet_by_name(&self, name: &str) -> Result<Wallet> {
        self.find_wallet(name)?
            .ok_or_else(|| WalletError::WalletNotFound(name.to_string()))
    }

    /// Add an account to a named wallet and persist it.
    pub fn add_account(&self, wallet_name: &str, account: Account) -> Result<Wallet> {
        let mut wallet = self.wallet_by_name(wallet_name)?;
        let account_name = account.name.clone();
        wallet.add_account(account)?;
        self.save(&wallet)?;
        info!(wallet = %wallet_name, account = %account_name, "created account");
        Ok(wallet)
    }

    /// Resolve a `wallet/account` path.
    pub fn wallet_and_account_from_path(&self, path: &str) -> Result<(Wallet, Account)> {
        let (wallet_name, account_name) = parse_account_path(path)?;
        let wallet = self.wallet_by_name(wallet_name)?;
        let account = wallet
            .account(account_name)
            .cloned()
            .ok_or_else(|| WalletError::AccountNotFound {
                wallet: wallet_name.to_string(),
                account: account_name.to_string(),
            })?;
        debug!(wallet = %wallet_name, account = %account_name, "resolved account path");
        Ok((wallet, account))
    }

    pub fn best_public_key(&self, account: &Account) -> BlsPublicKey {
        account.best_public_key()
    }

    /// Import a wallet from a shared export.
    pub fn import_shared(&self, export: &[u8], shares: &[String]) -> Result<Wallet> {
        let wallet = self.check_shared_import(export, shares)?;
        self.save(&wallet)?;
        info!(
            wallet = %wallet.name(),
            accounts = wallet.accounts.len(),
            shares = shares.len(),
            "imported shared wallet"
        );
        Ok(wallet)
    }

    /// Decode and validate a shared export without writing anything.
    ///
    /// Every share must be non-empty hex, no two shares may be equal, and at
    /// least `threshold` of them must be supplied. Account names must be
    /// unique and the wallet must not already be in the store.
    pub fn check_shared_import(&self, export: &[u8], shares: &[String]) -> Result<Wallet> {
        let export: SharedExport = serde_json::from_slice(export)?;
        if export.version != SHARED_EXPORT_VERSION {
            return Err(WalletError::UnsupportedExportVersion(export.version));
        }
        if export.threshold == 0 {
            return Err(WalletError::InvalidExport(
                "threshold must be at least 1".to_string(),
            ));
        }

        check_shares(shares, export.threshold)?;

        let wallet = export.wallet;
        validate_wallet_name(wallet.name())?;
        let mut names = HashSet::with_capacity(wallet.accounts.len());
        for account in &wallet.accounts {
            account.validate_for(wallet.kind())?;
            if !names.insert(account.name.as_str()) {
                return Err(WalletError::AccountExists {
                    wallet: wallet.name().to_string(),
                    account: account.name.clone(),
                });
            }
        }
        if self.find_wallet(wallet.name())?.is_some() || self.wallet_path(wallet.uuid()).exists() {
            return Err(WalletError::WalletExists(wallet.name().to_string()));
        }

        Ok(wallet)
    }

    /// Write a wallet to disk.
    pub fn save(&self, wallet: &Wallet) -> Result<()> {
        let path = self.wallet_path(wallet.uuid());
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                WalletError::StorageError(format!("Failed to create wallet directory: {}", e))
            })?;
        }

        let data = serde_json::to_string_pretty(wallet).map_err(|e| {
            WalletError::StorageError(format!("Failed to serialize wallet: {}", e))
        })?;

        // Write to temporary file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, data)
            .map_err(|e| WalletError::StorageError(format!("Failed to write wallet: {}", e)))?;

        fs::rename(&temp_path, &path).map_err(|e| {
            WalletError::StorageError(format!("Failed to rename wallet file: {}", e))
        })?;

        Ok(())
    }

    fn find_wallet(&self, name: &str) -> Result<Option<Wallet>> {
        Ok(self
            .list_wallets()?
            .into_iter()
            .find(|wallet| wallet.config.name == name))
    }
}

fn load_wallet(path: &Path) -> Result<Wallet> {
    let data = fs::read_to_string(path)
        .map_err(|e| WalletError::StorageError(format!("Failed to read wallet: {}", e)))?;

    serde_json::from_str(&data)
        .map_err(|e| WalletError::StorageError(format!("Failed to parse wallet: {}", e)))
}

fn validate_wallet_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('/') {
        return Err(WalletError::InvalidWalletName(name.to_string()));
    }
    Ok(())
}

fn check_shares(shares: &[String], threshold: u32) -> Result<()> {
    let mut seen = HashSet::with_capacity(shares.len());
    for (index, share) in shares.iter().enumerate() {
        let payload = share.trim();
        let payload = payload.strip_prefix("0x").unwrap_or(payload);
        let bytes = hex::decode(payload).map_err(|e| WalletError::InvalidShare {
            index,
            reason: e.to_string(),
        })?;
        if bytes.is_empty() {
            return Err(WalletError::InvalidShare {
                index,
                reason: "share is empty".to_string(),
            });
        }
        if !seen.insert(bytes) {
            return Err(WalletError::DuplicateShare { index });
        }
    }

    if shares.len() < threshold as usize {
        return Err(WalletError::InsufficientShares {
            threshold,
            provided: shares.len(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_store_is_empty() {
        let temp_dir = tempdir().unwrap();
        let store = WalletStore::new(temp_dir.path().join("absent"));

        assert!(store.list_wallets().unwrap().is_empty());
    }

    #[test]
    fn test_wallet_file_location() {
        let temp_dir = tempdir().unwrap();
        let store = WalletStore::new(temp_dir.path());

        let wallet = store
            .create_wallet("Main", WalletKind::NonDeterministic)
            .unwrap();
        let path = store.wallet_path(wallet.uuid());

        assert!(path.is_file());
        assert!(!path.with_extension("tmp").exists());
        assert_eq!(path.parent().unwrap().parent().unwrap(), temp_dir.path());
    }

    #[test]
    fn test_duplicate_wallet_name() {
        let temp_dir = tempdir().unwrap();
        let store = WalletStore::new(temp_dir.path());

        store
            .create_wallet("Main", WalletKind::NonDeterministic)
            .unwrap();
        let err = store
            .create_wallet("Main", WalletKind::Distributed)
            .unwrap_err();

        assert!(matches!(err, WalletError::WalletExists(_)));
    }

    #[test]
    fn test_parse_account_path() {
        assert_eq!(parse_account_path("Main/Validator 1").unwrap(), ("Main", "Validator 1"));
        assert_eq!(parse_account_path("Main/a/b").unwrap(), ("Main", "a/b"));
        for bad in ["Main", "/account", "Main/", "/"] {
            assert!(matches!(
                parse_account_path(bad),
                Err(WalletError::InvalidPath(_))
            ));
        }
    }

    #[test]
    fn test_check_shares() {
        let shares = |s: &[&str]| s.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        check_shares(&shares(&["01ab", "0x02cd"]), 2).unwrap();
        assert!(matches!(
            check_shares(&shares(&["01ab"]), 2),
            Err(WalletError::InsufficientShares { threshold: 2, provided: 1 })
        ));
        assert!(matches!(
            check_shares(&shares(&["01ab", "zz"]), 1),
            Err(WalletError::InvalidShare { index: 1, .. })
        ));
        assert!(matches!(
            check_shares(&shares(&["0x"]), 1),
            Err(WalletError::InvalidShare { index: 0, .. })
        ));
        assert!(matches!(
            check_shares(&shares(&["01AB", "0x01ab"]), 1),
            Err(WalletError::DuplicateShare { index: 1 })
        ));
    }
}
