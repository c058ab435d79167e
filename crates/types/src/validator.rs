use crate::pubkey::BlsPublicKey;
use crate::quoted::quoted_u64;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Epoch value used by the beacon chain for "not scheduled".
pub const FAR_FUTURE_EPOCH: u64 = u64::MAX;

/// Position of a validator in the beacon state registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ValidatorIndex(pub u64);

impl ValidatorIndex {
    pub fn new(index: u64) -> Self {
        Self(index)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ValidatorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse an unsigned decimal. Unlike `u64::from_str`, a leading `+` is rejected.
pub fn parse_decimal_u64(text: &str) -> Result<u64, ParseIntError> {
    if text.starts_with('+') {
        // A lone sign fails with `InvalidDigit`.
        return "+".parse();
    }
    text.parse()
}

impl FromStr for ValidatorIndex {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal_u64(s).map(Self)
    }
}

impl From<u64> for ValidatorIndex {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Serialize for ValidatorIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        quoted_u64::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for ValidatorIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        quoted_u64::deserialize(deserializer).map(Self)
    }
}

/// Lifecycle status reported by the beacon node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorStatus {
    PendingInitialized,
    PendingQueued,
    ActiveOngoing,
    ActiveExiting,
    ActiveSlashed,
    ExitedUnslashed,
    ExitedSlashed,
    WithdrawalPossible,
    WithdrawalDone,
}

impl ValidatorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidatorStatus::PendingInitialized => "pending_initialized",
            ValidatorStatus::PendingQueued => "pending_queued",
            ValidatorStatus::ActiveOngoing => "active_ongoing",
            ValidatorStatus::ActiveExiting => "active_exiting",
            ValidatorStatus::ActiveSlashed => "active_slashed",
            ValidatorStatus::ExitedUnslashed => "exited_unslashed",
            ValidatorStatus::ExitedSlashed => "exited_slashed",
            ValidatorStatus::WithdrawalPossible => "withdrawal_possible",
            ValidatorStatus::WithdrawalDone => "withdrawal_done",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ValidatorStatus::ActiveOngoing
                | ValidatorStatus::ActiveExiting
                | ValidatorStatus::ActiveSlashed
        )
    }
}

impl fmt::Display for ValidatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry entry of a validator as stored in the beacon state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorData {
    pub pubkey: BlsPublicKey,
    pub withdrawal_credentials: String,
    #[serde(with = "quoted_u64")]
    pub effective_balance: u64,
    pub slashed: bool,
    #[serde(with = "quoted_u64")]
    pub activation_eligibility_epoch: u64,
    #[serde(with = "quoted_u64")]
    pub activation_epoch: u64,
    #[serde(with = "quoted_u64")]
    pub exit_epoch: u64,
    #[serde(with = "quoted_u64")]
    pub withdrawable_epoch: u64,
}

/// A validator as returned by the state query, keyed by its index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorRecord {
    pub index: ValidatorIndex,
    /// Balance in Gwei.
    #[serde(with = "quoted_u64")]
    pub balance: u64,
    pub status: ValidatorStatus,
    pub validator: ValidatorData,
}

impl ValidatorRecord {
    pub fn pubkey(&self) -> &BlsPublicKey {
        &self.validator.pubkey
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::IntErrorKind;

    const RECORD_JSON: &str = r#"{
        "index": "12",
        "balance": "32001234567",
        "status": "active_ongoing",
        "validator": {
            "pubkey": "0x933ad9491b62059dd065b560d256d8957a8c402cc6e8d8ee7290ae11e8f7329267a8811c397529dac52ae1342ba58c95",
            "withdrawal_credentials": "0x00f50428677c60f997aadeab24aabf7fceaef491c96a52b463ae91f95611cf71",
            "effective_balance": "32000000000",
            "slashed": false,
            "activation_eligibility_epoch": "0",
            "activation_epoch": "0",
            "exit_epoch": "18446744073709551615",
            "withdrawable_epoch": "18446744073709551615"
        }
    }"#;

    #[test]
    fn decodes_beacon_api_record() {
        let record: ValidatorRecord = serde_json::from_str(RECORD_JSON).unwrap();
        assert_eq!(record.index, ValidatorIndex(12));
        assert_eq!(record.balance, 32_001_234_567);
        assert_eq!(record.status, ValidatorStatus::ActiveOngoing);
        assert!(record.status.is_active());
        assert_eq!(record.validator.exit_epoch, FAR_FUTURE_EPOCH);
        assert_eq!(
            record.pubkey().to_string(),
            "0x933ad9491b62059dd065b560d256d8957a8c402cc6e8d8ee7290ae11e8f7329267a8811c397529dac52ae1342ba58c95"
        );
    }

    #[test]
    fn index_serializes_quoted() {
        assert_eq!(serde_json::to_string(&ValidatorIndex(5)).unwrap(), "\"5\"");
        assert_eq!(ValidatorIndex(5).to_string(), "5");
    }

    #[test]
    fn index_parse_rejects_signs() {
        assert_eq!("17".parse::<ValidatorIndex>().unwrap(), ValidatorIndex(17));
        for text in ["+7", "+", "-1", " 7", ""] {
            assert!(text.parse::<ValidatorIndex>().is_err(), "{text:?}");
        }
        assert_eq!(
            parse_decimal_u64("+7").unwrap_err().kind(),
            &IntErrorKind::InvalidDigit
        );
    }

    #[test]
    fn unknown_status_rejected() {
        let json = RECORD_JSON.replace("active_ongoing", "sleeping");
        assert!(serde_json::from_str::<ValidatorRecord>(&json).is_err());
    }
}
