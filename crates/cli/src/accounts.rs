//! Wallet store as the account source for validator resolution

use async_trait::async_trait;
use stakectl_types::BlsPublicKey;
use stakectl_validator_resolution::{AccountError, AccountProvider, Context};
use stakectl_wallet::{Account, Wallet, WalletError, WalletStore};

pub struct WalletAccounts {
    store: WalletStore,
}

impl WalletAccounts {
    pub fn new(store: WalletStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AccountProvider for WalletAccounts {
    type Wallet = Wallet;
    type Account = Account;

    async fn wallet_and_account_from_path(
        &self,
        _ctx: &Context,
        path: &str,
    ) -> Result<(Wallet, Account), AccountError> {
        let store = self.store.clone();
        let path = path.to_string();
        tokio::task::spawn_blocking(move || store.wallet_and_account_from_path(&path))
            .await
            .map_err(|e| AccountError::Backend(e.into()))?
            .map_err(account_error)
    }

    fn best_public_key(&self, account: &Account) -> Result<BlsPublicKey, AccountError> {
        Ok(self.store.best_public_key(account))
    }
}

fn account_error(err: WalletError) -> AccountError {
    match err {
        WalletError::InvalidPath(path) => AccountError::InvalidPath(path),
        WalletError::WalletNotFound(wallet) => AccountError::WalletNotFound(wallet),
        WalletError::AccountNotFound { wallet, account } => {
            AccountError::AccountNotFound { wallet, account }
        }
        other => AccountError::Backend(other.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakectl_types::{StateId, ValidatorIndex};
    use stakectl_validator_resolution::{
        synthetic_pubkey, synthetic_record, StubValidatorsProvider, ValidatorResolutionError,
        ValidatorResolver,
    };
    use stakectl_wallet::WalletKind;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_account_paths_resolve_through_store() {
        let temp_dir = tempdir().unwrap();
        let store = WalletStore::new(temp_dir.path());
        store
            .create_wallet("Main", WalletKind::NonDeterministic)
            .unwrap();
        store
            .add_account("Main", Account::new("Validator 1", synthetic_pubkey(4)))
            .unwrap();
        store.create_wallet("Dist", WalletKind::Distributed).unwrap();
        store
            .add_account(
                "Dist",
                Account::distributed(
                    "Shared",
                    synthetic_pubkey(1),
                    synthetic_pubkey(6),
                    1,
                    BTreeMap::new(),
                ),
            )
            .unwrap();

        let validators = Arc::new(StubValidatorsProvider::with_records(
            (0..10).map(synthetic_record),
        ));
        let resolver = ValidatorResolver::new(validators, Arc::new(WalletAccounts::new(store)));

        let records = resolver
            .resolve_validators(
                &Context::background(),
                &["Main/Validator 1", "Dist/Shared"],
                &StateId::head(),
            )
            .await
            .unwrap();

        let indices: Vec<_> = records.iter().map(|record| record.index).collect();
        assert_eq!(indices, vec![ValidatorIndex(4), ValidatorIndex(6)]);
    }

    #[tokio::test]
    async fn test_missing_account_maps_to_account_error() {
        let temp_dir = tempdir().unwrap();
        let store = WalletStore::new(temp_dir.path());
        store
            .create_wallet("Main", WalletKind::NonDeterministic)
            .unwrap();
        let accounts = WalletAccounts::new(store);

        let err = accounts
            .wallet_and_account_from_path(&Context::background(), "Main/Nope")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::AccountNotFound { .. }));

        let err = accounts
            .wallet_and_account_from_path(&Context::background(), "Other/Nope")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::WalletNotFound(_)));

        let validators = Arc::new(StubValidatorsProvider::new());
        let resolver = ValidatorResolver::new(validators, Arc::new(accounts));
        let err = resolver
            .resolve_validator(&Context::background(), "Main/Nope", &StateId::head())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ValidatorResolutionError::AccountResolutionFailed { .. }
        ));
    }
}
