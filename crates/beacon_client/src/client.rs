use crate::response::{decode_validators, error_message};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use stakectl_types::{BlsPublicKey, StateId, ValidatorIndex};
use stakectl_validator_resolution::{Context, ProviderError, ValidatorMap, ValidatorsProvider};
use tracing::debug;

/// Largest number of indices sent in a single request.
pub const INDEX_CHUNK_SIZE: usize = 500;
/// Largest number of public keys sent in a single request.
pub const PUBKEY_CHUNK_SIZE: usize = 50;

/// Validator state client for a beacon node's REST API.
#[derive(Clone, Debug)]
pub struct BeaconClient {
    client: reqwest::Client,
    base_url: String,
}

impl BeaconClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the validators query for `ids` at `state_id`.
    ///
    /// `state_id` is percent-encoded as a single path segment.
    pub fn validators_url(&self, state_id: &StateId, ids: &[String]) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ProviderError::Transport(format!("invalid beacon node url {}: {e}", self.base_url))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                ProviderError::Transport(format!("invalid beacon node url {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(["eth", "v1", "beacon", "states", state_id.as_str(), "validators"]);

        if !ids.is_empty() {
            url.set_query(Some(&format!("id={}", ids.join(","))));
        }
        Ok(url)
    }

    async fn fetch_chunk(&self, state_id: &StateId, ids: &[String]) -> Result<ValidatorMap, ProviderError> {
        let url = self.validators_url(state_id, ids)?;
        debug!(%url, count = ids.len(), "requesting validators");

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        match status {
            StatusCode::OK => decode_validators(&body),
            StatusCode::NOT_FOUND => Err(ProviderError::NotFound(state_id.to_string())),
            status => Err(ProviderError::Http {
                status: status.as_u16(),
                message: error_message(&body),
            }),
        }
    }

    async fn fetch(
        &self,
        ctx: &Context,
        state_id: &StateId,
        ids: Vec<String>,
        chunk_size: usize,
    ) -> Result<ValidatorMap, ProviderError> {
        let mut validators = ValidatorMap::new();
        // No ids would ask the node for the entire registry.
        if ids.is_empty() {
            return Ok(validators);
        }

        for chunk in ids.chunks(chunk_size) {
            let found = ctx.run(self.fetch_chunk(state_id, chunk)).await?;
            validators.extend(found);
        }

        Ok(validators)
    }
}

fn transport(err: reqwest::Error) -> ProviderError {
    ProviderError::Transport(err.to_string())
}

#[async_trait]
impl ValidatorsProvider for BeaconClient {
    async fn validators(
        &self,
        ctx: &Context,
        state_id: &StateId,
        indices: &[ValidatorIndex],
    ) -> Result<ValidatorMap, ProviderError> {
        let ids = indices.iter().map(ToString::to_string).collect();
        self.fetch(ctx, state_id, ids, INDEX_CHUNK_SIZE).await
    }

    async fn validators_by_pubkey(
        &self,
        ctx: &Context,
        state_id: &StateId,
        pubkeys: &[BlsPublicKey],
    ) -> Result<ValidatorMap, ProviderError> {
        let ids = pubkeys.iter().map(BlsPublicKey::to_hex).collect();
        self.fetch(ctx, state_id, ids, PUBKEY_CHUNK_SIZE).await
    }
}
