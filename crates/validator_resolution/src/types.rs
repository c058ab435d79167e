//! Parsed forms of user-supplied validator identifiers

use crate::errors::*;
use stakectl_types::{parse_decimal_u64, BlsPublicKey, ValidatorIndex};
use std::fmt;

/// Largest number of indices a single `low-high` range may expand to.
pub const MAX_RANGE_LEN: u64 = 1 << 20;

/// One user-supplied validator identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorIdentifier {
    /// Inclusive `low-high` index range. `low > high` is allowed and expands to nothing.
    Range { low: u64, high: u64 },
    /// `0x`-prefixed BLS public key
    PublicKey(BlsPublicKey),
    /// `wallet/account`
    AccountPath(String),
    /// Bare decimal index
    Index(ValidatorIndex),
}

impl ValidatorIdentifier {
    /// Parse an identifier from a validator list. Anything containing `-` is a range.
    pub fn parse(id: &str) -> Result<Self> {
        if id.contains('-') {
            return Self::parse_range(id);
        }
        Self::parse_single(id)
    }

    /// Parse an identifier that names exactly one validator.
    ///
    /// Ranges are not recognised here; `"1-2"` falls through to the index rule
    /// and fails as an invalid index.
    pub fn parse_single(id: &str) -> Result<Self> {
        if let Some(payload) = id.strip_prefix("0x") {
            let key = BlsPublicKey::from_hex_payload(payload).map_err(|source| {
                ValidatorResolutionError::InvalidPublicKey {
                    id: id.to_string(),
                    source,
                }
            })?;
            return Ok(ValidatorIdentifier::PublicKey(key));
        }

        if id.contains('/') {
            return Ok(ValidatorIdentifier::AccountPath(id.to_string()));
        }

        let index = id
            .parse::<ValidatorIndex>()
            .map_err(|source| ValidatorResolutionError::InvalidIndex {
                id: id.to_string(),
                source,
            })?;
        Ok(ValidatorIdentifier::Index(index))
    }

    fn parse_range(id: &str) -> Result<Self> {
        let bits: Vec<&str> = id.split('-').collect();
        if bits.len() != 2 {
            return Err(ValidatorResolutionError::MalformedRange { id: id.to_string() });
        }

        let low = parse_decimal_u64(bits[0])
            .map_err(|source| ValidatorResolutionError::InvalidRangeBound {
                id: id.to_string(),
                bound: RangeBound::Start,
                source,
            })?;
        let high = parse_decimal_u64(bits[1])
            .map_err(|source| ValidatorResolutionError::InvalidRangeBound {
                id: id.to_string(),
                bound: RangeBound::End,
                source,
            })?;

        if high >= low && high - low >= MAX_RANGE_LEN {
            return Err(ValidatorResolutionError::RangeTooLarge {
                id: id.to_string(),
                max: MAX_RANGE_LEN,
            });
        }

        Ok(ValidatorIdentifier::Range { low, high })
    }

    pub fn is_range(&self) -> bool {
        matches!(self, ValidatorIdentifier::Range { .. })
    }

    /// Indices covered by a range, in ascending order. Empty for non-ranges.
    pub fn range_indices(&self) -> Vec<ValidatorIndex> {
        match self {
            ValidatorIdentifier::Range { low, high } => {
                (*low..=*high).map(ValidatorIndex::new).collect()
            }
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for ValidatorIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidatorIdentifier::Range { low, high } => write!(f, "{low}-{high}"),
            ValidatorIdentifier::PublicKey(key) => write!(f, "{key}"),
            ValidatorIdentifier::AccountPath(path) => f.write_str(path),
            ValidatorIdentifier::Index(index) => write!(f, "{index}"),
        }
    }
}
