//! Capabilities the resolver consumes

use crate::context::{Context, ContextError};
use async_trait::async_trait;
use stakectl_types::{BlsPublicKey, StateId, ValidatorIndex, ValidatorRecord};
use std::collections::BTreeMap;
use thiserror::Error;

/// Matches returned by a validator-state query, ordered by index.
pub type ValidatorMap = BTreeMap<ValidatorIndex, ValidatorRecord>;

/// Failure reported by a [`ValidatorsProvider`].
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("state {0} not found")]
    NotFound(String),

    #[error("validator state request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("validator state transport error: {0}")]
    Transport(String),

    #[error("validator state provider error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Failure reported by an [`AccountProvider`].
#[derive(Error, Debug)]
pub enum AccountError {
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("invalid account path {0}")]
    InvalidPath(String),

    #[error("wallet {0} not found")]
    WalletNotFound(String),

    #[error("account {account} not found in wallet {wallet}")]
    AccountNotFound { wallet: String, account: String },

    #[error("no public key available for account {0}")]
    NoPublicKey(String),

    #[error("account store error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Validator-state query interface.
///
/// Both lookups return only the validators that exist in the requested state;
/// unknown indices or keys are simply absent from the map.
#[async_trait]
pub trait ValidatorsProvider: Send + Sync {
    async fn validators(
        &self,
        ctx: &Context,
        state_id: &StateId,
        indices: &[ValidatorIndex],
    ) -> Result<ValidatorMap, ProviderError>;

    async fn validators_by_pubkey(
        &self,
        ctx: &Context,
        state_id: &StateId,
        pubkeys: &[BlsPublicKey],
    ) -> Result<ValidatorMap, ProviderError>;
}

/// Wallet/account lookup used for `wallet/account` identifiers.
#[async_trait]
pub trait AccountProvider: Send + Sync {
    type Wallet: Send;
    type Account: Send + Sync;

    async fn wallet_and_account_from_path(
        &self,
        ctx: &Context,
        path: &str,
    ) -> Result<(Self::Wallet, Self::Account), AccountError>;

    /// The key a validator would be registered under for this account.
    fn best_public_key(&self, account: &Self::Account) -> Result<BlsPublicKey, AccountError>;
}
