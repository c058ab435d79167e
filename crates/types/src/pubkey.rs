use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when parsing a BLS public key string.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PublicKeyError {
    #[error("public key must start with '0x'")]
    MissingPrefix,
    #[error("public key is not valid hexadecimal: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("public key must be {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Number of raw bytes in a compressed BLS12-381 public key.
pub const BLS_PUBLIC_KEY_BYTES: usize = 48;

/// Compressed BLS public key identifying a validator.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlsPublicKey(pub [u8; BLS_PUBLIC_KEY_BYTES]);

impl BlsPublicKey {
    /// Build a key from a byte slice, rejecting any length other than 48.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PublicKeyError> {
        let raw: [u8; BLS_PUBLIC_KEY_BYTES] =
            bytes.try_into().map_err(|_| PublicKeyError::InvalidLength {
                expected: BLS_PUBLIC_KEY_BYTES,
                actual: bytes.len(),
            })?;
        Ok(Self(raw))
    }

    /// Decode the hex payload that follows the `0x` prefix.
    pub fn from_hex_payload(payload: &str) -> Result<Self, PublicKeyError> {
        let decoded = hex::decode(payload)?;
        Self::from_slice(&decoded)
    }

    pub fn as_bytes(&self) -> &[u8; BLS_PUBLIC_KEY_BYTES] {
        &self.0
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for BlsPublicKey {
    type Err = PublicKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let payload = s.strip_prefix("0x").ok_or(PublicKeyError::MissingPrefix)?;
        Self::from_hex_payload(payload)
    }
}

impl fmt::Display for BlsPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for BlsPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlsPublicKey({})", self.to_hex())
    }
}

impl From<[u8; BLS_PUBLIC_KEY_BYTES]> for BlsPublicKey {
    fn from(value: [u8; BLS_PUBLIC_KEY_BYTES]) -> Self {
        BlsPublicKey(value)
    }
}

impl From<BlsPublicKey> for String {
    fn from(value: BlsPublicKey) -> Self {
        value.to_hex()
    }
}

impl TryFrom<String> for BlsPublicKey {
    type Error = PublicKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
