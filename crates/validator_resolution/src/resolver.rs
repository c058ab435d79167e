//! Validator identifier resolver implementation

use crate::context::Context;
use crate::errors::*;
use crate::provider::*;
use crate::types::*;
use stakectl_types::{BlsPublicKey, StateId, ValidatorIndex, ValidatorRecord};
use std::sync::Arc;
use tracing::{debug, warn};

/// Validator identifier resolver
///
/// Resolves identifier strings to validator records:
/// 1. `low-high` ranges, batched into one index lookup
/// 2. `0x` public keys, looked up by key
/// 3. `wallet/account` paths, via the account's best public key
/// 4. bare indices, looked up by index
///
/// Identifiers are handled one at a time in input order and the first
/// failure aborts the whole list. Nothing is cached between calls.
pub struct ValidatorResolver<V, A> {
    validators: Arc<V>,
    accounts: Arc<A>,
}

impl<V, A> ValidatorResolver<V, A>
where
    V: ValidatorsProvider,
    A: AccountProvider,
{
    pub fn new(validators: Arc<V>, accounts: Arc<A>) -> Self {
        Self {
            validators,
            accounts,
        }
    }

    /// Resolve a list of identifiers, ranges included.
    ///
    /// The output keeps the grouping order of the input. Records returned for
    /// a range are appended in the order the provider returned them, and a
    /// range that matches nothing contributes nothing.
    pub async fn resolve_validators<S>(
        &self,
        ctx: &Context,
        ids: &[S],
        state_id: &StateId,
    ) -> Result<Vec<ValidatorRecord>>
    where
        S: AsRef<str> + Sync,
    {
        let mut validators = Vec::with_capacity(ids.len());

        for id in ids {
            let id = id.as_ref();
            match ValidatorIdentifier::parse(id)? {
                identifier @ ValidatorIdentifier::Range { .. } => {
                    let records = self.resolve_range(ctx, id, &identifier, state_id).await?;
                    validators.extend(records);
                }
                identifier => {
                    let record = self.resolve_identifier(ctx, id, identifier, state_id).await?;
                    validators.push(record);
                }
            }
        }

        Ok(validators)
    }

    /// Resolve one identifier to exactly one validator.
    pub async fn resolve_validator(
        &self,
        ctx: &Context,
        id: &str,
        state_id: &StateId,
    ) -> Result<ValidatorRecord> {
        let identifier = ValidatorIdentifier::parse_single(id)?;
        self.resolve_identifier(ctx, id, identifier, state_id).await
    }

    async fn resolve_range(
        &self,
        ctx: &Context,
        id: &str,
        identifier: &ValidatorIdentifier,
        state_id: &StateId,
    ) -> Result<Vec<ValidatorRecord>> {
        let indices = identifier.range_indices();
        if indices.is_empty() {
            warn!(range = %id, "validator range is empty");
        }

        debug!(range = %id, count = indices.len(), state = %state_id, "looking up validator range");
        let found = ctx
            .run(self.validators.validators(ctx, state_id, &indices))
            .await
            .map_err(|source| ValidatorResolutionError::LookupFailed {
                id: id.to_string(),
                source,
            })?;

        Ok(found.into_values().collect())
    }

    async fn resolve_identifier(
        &self,
        ctx: &Context,
        id: &str,
        identifier: ValidatorIdentifier,
        state_id: &StateId,
    ) -> Result<ValidatorRecord> {
        let found = match identifier {
            ValidatorIdentifier::PublicKey(pubkey) => {
                self.lookup_by_pubkey(ctx, id, pubkey, state_id).await?
            }
            ValidatorIdentifier::AccountPath(path) => {
                let pubkey = self.public_key_for_path(ctx, id, &path).await?;
                self.lookup_by_pubkey(ctx, id, pubkey, state_id).await?
            }
            ValidatorIdentifier::Index(index) => {
                self.lookup_by_index(ctx, id, index, state_id).await?
            }
            ValidatorIdentifier::Range { .. } => {
                return Err(ValidatorResolutionError::MalformedRange { id: id.to_string() })
            }
        };

        if found.len() > 1 {
            debug!(validator = %id, matches = found.len(), "multiple validators matched, taking lowest index");
        }

        found
            .into_values()
            .next()
            .ok_or_else(|| ValidatorResolutionError::UnknownValidator { id: id.to_string() })
    }

    async fn lookup_by_index(
        &self,
        ctx: &Context,
        id: &str,
        index: ValidatorIndex,
        state_id: &StateId,
    ) -> Result<ValidatorMap> {
        debug!(validator = %id, state = %state_id, "looking up validator by index");
        ctx.run(self.validators.validators(ctx, state_id, &[index]))
            .await
            .map_err(|source| ValidatorResolutionError::LookupFailed {
                id: id.to_string(),
                source,
            })
    }

    async fn lookup_by_pubkey(
        &self,
        ctx: &Context,
        id: &str,
        pubkey: BlsPublicKey,
        state_id: &StateId,
    ) -> Result<ValidatorMap> {
        debug!(validator = %id, pubkey = %pubkey, state = %state_id, "looking up validator by public key");
        ctx.run(self.validators.validators_by_pubkey(ctx, state_id, &[pubkey]))
            .await
            .map_err(|source| ValidatorResolutionError::LookupFailed {
                id: id.to_string(),
                source,
            })
    }

    async fn public_key_for_path(&self, ctx: &Context, id: &str, path: &str) -> Result<BlsPublicKey> {
        let account_failed = |source| ValidatorResolutionError::AccountResolutionFailed {
            id: id.to_string(),
            source,
        };

        let (_wallet, account) = ctx
            .run(self.accounts.wallet_and_account_from_path(ctx, path))
            .await
            .map_err(account_failed)?;

        self.accounts.best_public_key(&account).map_err(account_failed)
    }
}

impl<V, A> Clone for ValidatorResolver<V, A> {
    fn clone(&self) -> Self {
        Self {
            validators: self.validators.clone(),
            accounts: self.accounts.clone(),
        }
    }
}
