//! Beacon API response bodies

use serde::Deserialize;
use stakectl_types::ValidatorRecord;
use stakectl_validator_resolution::{ProviderError, ValidatorMap};

/// Body of a successful validators query.
#[derive(Debug, Deserialize)]
pub struct ValidatorsResponse {
    #[serde(default)]
    pub execution_optimistic: Option<bool>,
    #[serde(default)]
    pub finalized: Option<bool>,
    pub data: Vec<ValidatorRecord>,
}

impl ValidatorsResponse {
    pub fn into_map(self) -> ValidatorMap {
        self.data
            .into_iter()
            .map(|record| (record.index, record))
            .collect()
    }
}

/// Error body returned by beacon nodes on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<u16>,
    pub message: String,
}

pub fn decode_validators(body: &str) -> Result<ValidatorMap, ProviderError> {
    let response: ValidatorsResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Transport(format!("failed to parse validators response: {e}")))?;
    Ok(response.into_map())
}

/// Human-readable message for a failed request; falls back to the raw body.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(error) => error.message,
        Err(_) if body.trim().is_empty() => "empty response".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
