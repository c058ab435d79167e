//! In-memory collaborators for tests and offline use

use crate::context::Context;
use crate::provider::*;
use async_trait::async_trait;
use parking_lot::RwLock;
use stakectl_types::{
    BlsPublicKey, StateId, ValidatorData, ValidatorIndex, ValidatorRecord, ValidatorStatus,
    BLS_PUBLIC_KEY_BYTES, FAR_FUTURE_EPOCH,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::time::Duration;

/// A lookup received by [`StubValidatorsProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupRequest {
    Indices {
        state_id: StateId,
        indices: Vec<ValidatorIndex>,
    },
    PublicKeys {
        state_id: StateId,
        pubkeys: Vec<BlsPublicKey>,
    },
}

/// Validator state backed by a map. Records every request it receives.
#[derive(Clone, Default)]
pub struct StubValidatorsProvider {
    records: Arc<RwLock<BTreeMap<ValidatorIndex, ValidatorRecord>>>,
    requests: Arc<RwLock<Vec<LookupRequest>>>,
    failure: Arc<RwLock<Option<String>>>,
    delay: Arc<RwLock<Option<Duration>>>,
}

impl StubValidatorsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = ValidatorRecord>) -> Self {
        let provider = Self::new();
        for record in records {
            provider.insert(record);
        }
        provider
    }

    pub fn insert(&self, record: ValidatorRecord) {
        self.records.write().insert(record.index, record);
    }

    /// Make every subsequent lookup fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write() = Some(message.into());
    }

    /// Make every subsequent lookup sleep before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.write() = Some(delay);
    }

    pub fn requests(&self) -> Vec<LookupRequest> {
        self.requests.read().clone()
    }

    async fn answer<F>(&self, request: LookupRequest, predicate: F) -> Result<ValidatorMap, ProviderError>
    where
        F: Fn(&ValidatorRecord) -> bool,
    {
        self.requests.write().push(request);

        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failure.read().clone();
        if let Some(message) = failure {
            return Err(ProviderError::Backend(anyhow::anyhow!(message)));
        }

        Ok(self
            .records
            .read()
            .values()
            .filter(|record| predicate(*record))
            .map(|record| (record.index, record.clone()))
            .collect())
    }
}

#[async_trait]
impl ValidatorsProvider for StubValidatorsProvider {
    async fn validators(
        &self,
        _ctx: &Context,
        state_id: &StateId,
        indices: &[ValidatorIndex],
    ) -> Result<ValidatorMap, ProviderError> {
        let request = LookupRequest::Indices {
            state_id: state_id.clone(),
            indices: indices.to_vec(),
        };
        self.answer(request, |record| indices.contains(&record.index))
            .await
    }

    async fn validators_by_pubkey(
        &self,
        _ctx: &Context,
        state_id: &StateId,
        pubkeys: &[BlsPublicKey],
    ) -> Result<ValidatorMap, ProviderError> {
        let request = LookupRequest::PublicKeys {
            state_id: state_id.clone(),
            pubkeys: pubkeys.to_vec(),
        };
        self.answer(request, |record| pubkeys.contains(record.pubkey()))
            .await
    }
}

/// Account held by [`StubAccountProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubAccount {
    pub name: String,
    pub public_key: BlsPublicKey,
    pub composite_public_key: Option<BlsPublicKey>,
}

/// Accounts keyed by `wallet/account` path.
#[derive(Clone, Default)]
pub struct StubAccountProvider {
    accounts: Arc<RwLock<HashMap<String, StubAccount>>>,
}

impl StubAccountProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &self,
        wallet: &str,
        account: &str,
        public_key: BlsPublicKey,
        composite_public_key: Option<BlsPublicKey>,
    ) {
        self.accounts.write().insert(
            format!("{wallet}/{account}"),
            StubAccount {
                name: account.to_string(),
                public_key,
                composite_public_key,
            },
        );
    }
}

#[async_trait]
impl AccountProvider for StubAccountProvider {
    type Wallet = String;
    type Account = StubAccount;

    async fn wallet_and_account_from_path(
        &self,
        _ctx: &Context,
        path: &str,
    ) -> Result<(String, StubAccount), AccountError> {
        let (wallet, account) = path
            .split_once('/')
            .ok_or_else(|| AccountError::InvalidPath(path.to_string()))?;

        let found = self.accounts.read().get(path).cloned();
        found
            .map(|found| (wallet.to_string(), found))
            .ok_or_else(|| AccountError::AccountNotFound {
                wallet: wallet.to_string(),
                account: account.to_string(),
            })
    }

    fn best_public_key(&self, account: &StubAccount) -> Result<BlsPublicKey, AccountError> {
        Ok(account.composite_public_key.unwrap_or(account.public_key))
    }
}

/// Deterministic public key for a validator index.
pub fn synthetic_pubkey(index: u64) -> BlsPublicKey {
    let mut bytes = [0xa5u8; BLS_PUBLIC_KEY_BYTES];
    bytes[..8].copy_from_slice(&index.to_be_bytes());
    BlsPublicKey(bytes)
}

/// Active validator record with a key from [`synthetic_pubkey`].
pub fn synthetic_record(index: u64) -> ValidatorRecord {
    ValidatorRecord {
        index: ValidatorIndex(index),
        balance: 32_000_000_000,
        status: ValidatorStatus::ActiveOngoing,
        validator: ValidatorData {
            pubkey: synthetic_pubkey(index),
            withdrawal_credentials: format!("0x{}", "00".repeat(32)),
            effective_balance: 32_000_000_000,
            slashed: false,
            activation_eligibility_epoch: 0,
            activation_epoch: 0,
            exit_epoch: FAR_FUTURE_EPOCH,
            withdrawable_epoch: FAR_FUTURE_EPOCH,
        },
    }
}
