use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stakectl_types::BlsPublicKey;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::errors::*;

/// Current on-disk wallet format.
pub const WALLET_VERSION: u32 = 1;

/// Current shared export format.
pub const SHARED_EXPORT_VERSION: u32 = 1;

/// How the accounts of a wallet hold their keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WalletKind {
    /// Independent single-party accounts
    NonDeterministic,
    /// Threshold accounts whose validator key is a composite of participant keys
    Distributed,
}

impl fmt::Display for WalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletKind::NonDeterministic => f.write_str("non-deterministic"),
            WalletKind::Distributed => f.write_str("distributed"),
        }
    }
}

/// Wallet configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    pub uuid: Uuid,
    pub name: String,
    pub version: u32,
    pub kind: WalletKind,
    pub created_at: DateTime<Utc>,
}

/// A single validator account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub uuid: Uuid,
    pub name: String,
    pub public_key: BlsPublicKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite_public_key: Option<BlsPublicKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_threshold: Option<u32>,
    /// Participant id to endpoint, for distributed accounts.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub participants: BTreeMap<u64, String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(name: impl Into<String>, public_key: BlsPublicKey) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            public_key,
            composite_public_key: None,
            signing_threshold: None,
            participants: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    pub fn distributed(
        name: impl Into<String>,
        public_key: BlsPublicKey,
        composite_public_key: BlsPublicKey,
        signing_threshold: u32,
        participants: BTreeMap<u64, String>,
    ) -> Self {
        Self {
            composite_public_key: Some(composite_public_key),
            signing_threshold: Some(signing_threshold),
            participants,
            ..Self::new(name, public_key)
        }
    }

    /// Key the validator is known by on chain: the composite key when the
    /// account has one, otherwise its own key.
    pub fn best_public_key(&self) -> BlsPublicKey {
        self.composite_public_key.unwrap_or(self.public_key)
    }

    pub fn is_distributed(&self) -> bool {
        self.composite_public_key.is_some()
    }

    /// Check the account fits a wallet of `kind`.
    pub fn validate_for(&self, kind: WalletKind) -> Result<()> {
        let invalid = |reason: &str| WalletError::InvalidAccount {
            account: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.is_empty() {
            return Err(invalid("account name is empty"));
        }

        match kind {
            WalletKind::NonDeterministic => {
                if self.is_distributed() || self.signing_threshold.is_some() {
                    return Err(invalid("threshold keys need a distributed wallet"));
                }
            }
            WalletKind::Distributed => {
                if !self.is_distributed() {
                    return Err(invalid("composite public key is required"));
                }
                match self.signing_threshold {
                    None | Some(0) => return Err(invalid("signing threshold must be at least 1")),
                    Some(threshold)
                        if !self.participants.is_empty()
                            && threshold as usize > self.participants.len() =>
                    {
                        return Err(invalid("signing threshold exceeds participant count"))
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(())
    }
}

/// Wallet and its accounts, as stored in `wallet.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub config: WalletConfig,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

impl Wallet {
    pub fn new(name: impl Into<String>, kind: WalletKind) -> Self {
        Self {
            config: WalletConfig {
                uuid: Uuid::new_v4(),
                name: name.into(),
                version: WALLET_VERSION,
                kind,
                created_at: Utc::now(),
            },
            accounts: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn uuid(&self) -> Uuid {
        self.config.uuid
    }

    pub fn kind(&self) -> WalletKind {
        self.config.kind
    }

    pub fn account(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.name == name)
    }

    /// Add an account, rejecting duplicates and accounts of the wrong kind.
    pub fn add_account(&mut self, account: Account) -> Result<()> {
        account.validate_for(self.kind())?;
        if self.account(&account.name).is_some() {
            return Err(WalletError::AccountExists {
                wallet: self.config.name.clone(),
                account: account.name,
            });
        }
        self.accounts.push(account);
        Ok(())
    }
}

/// Wallet export whose import is gated on a threshold of key shares
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedExport {
    pub version: u32,
    pub threshold: u32,
    pub wallet: Wallet,
}

impl SharedExport {
    pub fn new(threshold: u32, wallet: Wallet) -> Self {
        Self {
            version: SHARED_EXPORT_VERSION,
            threshold,
            wallet,
        }
    }
}
