//! Lenient integer fields for request bodies.
//!
//! Browser clients send ids and counts either as JSON numbers or as numeric
//! strings (`"driverId": "3"`). Both normalize to the same integer here, before
//! anything reaches the ledger.

use serde::Deserialize;

/// A JSON number or a string holding one
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LooseInt {
    /// Sent as a JSON number
    Number(i64),
    /// Sent as a string
    Text(String),
}

impl LooseInt {
    /// The integer value, if the text form parses
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }

    /// The value as an id; negative or non-numeric input has none
    #[must_use]
    pub fn as_id(&self) -> Option<u64> {
        self.as_i64().and_then(|n| u64::try_from(n).ok())
    }
}

/// Normalize an optional lenient field to an id
pub(crate) fn id(value: Option<&LooseInt>) -> Option<u64> {
    value.and_then(LooseInt::as_id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(json: &str) -> LooseInt {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn numbers_and_numeric_strings_agree() {
        assert_eq!(parse("3").as_id(), Some(3));
        assert_eq!(parse("\"3\"").as_id(), Some(3));
        assert_eq!(parse("\" 12 \"").as_i64(), Some(12));
    }

    #[test]
    fn junk_has_no_value() {
        assert_eq!(parse("\"three\"").as_i64(), None);
        assert_eq!(parse("-1").as_id(), None);
        assert_eq!(parse("-1").as_i64(), Some(-1));
        assert!(serde_json::from_str::<LooseInt>("true").is_err());
    }
}
