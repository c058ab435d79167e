//! Error types for validator resolution

use crate::provider::{AccountError, ProviderError};
use stakectl_types::PublicKeyError;
use std::num::ParseIntError;
use thiserror::Error;

/// Which end of a `low-high` range failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Start,
    End,
}

impl std::fmt::Display for RangeBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeBound::Start => f.write_str("start"),
            RangeBound::End => f.write_str("end"),
        }
    }
}

/// Every variant names the identifier that failed.
#[derive(Error, Debug)]
pub enum ValidatorResolutionError {
    #[error("invalid range {id}")]
    MalformedRange { id: String },

    #[error("range {id} covers more than {max} validators")]
    RangeTooLarge { id: String, max: u64 },

    #[error("invalid range {bound} in {id}")]
    InvalidRangeBound {
        id: String,
        bound: RangeBound,
        #[source]
        source: ParseIntError,
    },

    #[error("failed to parse validator index {id}")]
    InvalidIndex {
        id: String,
        #[source]
        source: ParseIntError,
    },

    #[error("failed to parse validator public key {id}")]
    InvalidPublicKey {
        id: String,
        #[source]
        source: PublicKeyError,
    },

    #[error("unable to obtain account {id}")]
    AccountResolutionFailed {
        id: String,
        #[source]
        source: AccountError,
    },

    #[error("failed to obtain validators {id}")]
    LookupFailed {
        id: String,
        #[source]
        source: ProviderError,
    },

    #[error("unknown validator {id}")]
    UnknownValidator { id: String },
}

impl ValidatorResolutionError {
    /// The identifier string that caused the failure.
    pub fn identifier(&self) -> &str {
        match self {
            ValidatorResolutionError::MalformedRange { id }
            | ValidatorResolutionError::RangeTooLarge { id, .. }
            | ValidatorResolutionError::InvalidRangeBound { id, .. }
            | ValidatorResolutionError::InvalidIndex { id, .. }
            | ValidatorResolutionError::InvalidPublicKey { id, .. }
            | ValidatorResolutionError::AccountResolutionFailed { id, .. }
            | ValidatorResolutionError::LookupFailed { id, .. }
            | ValidatorResolutionError::UnknownValidator { id } => id,
        }
    }
}

pub type Result<T> = std::result::Result<T, ValidatorResolutionError>;
