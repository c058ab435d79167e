//! Serde helpers for integers the beacon API transmits as decimal strings.

use serde::{de, Deserialize, Deserializer, Serializer};

pub mod quoted_u64 {
    use super::*;

    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum QuotedOrNumber {
            Quoted(String),
            Number(u64),
        }

        match QuotedOrNumber::deserialize(deserializer)? {
            QuotedOrNumber::Quoted(text) => text.parse().map_err(de::Error::custom),
            QuotedOrNumber::Number(value) => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super::quoted_u64")]
        value: u64,
    }

    #[test]
    fn accepts_quoted_and_bare_numbers() {
        let quoted: Wrapper = serde_json::from_str(r#"{"value":"18446744073709551615"}"#).unwrap();
        assert_eq!(quoted.value, u64::MAX);
        let bare: Wrapper = serde_json::from_str(r#"{"value":42}"#).unwrap();
        assert_eq!(bare.value, 42);
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&Wrapper { value: 7 }).unwrap();
        assert_eq!(json, r#"{"value":"7"}"#);
    }

    #[test]
    fn rejects_non_numeric_strings() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"value":"seven"}"#).is_err());
    }
}
