//! Point-in-time account balance snapshot.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Sentinel rendered when a balance could not be read
pub const BALANCE_ERROR: &str = "Error";

/// Account balance as displayed to the caller. Never used for control flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Balance {
    Amount(f64),
    Unavailable,
}

impl Balance {
    pub fn amount(&self) -> Option<f64> {
        match self {
            Balance::Amount(value) => Some(*value),
            Balance::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Balance::Amount(_))
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Balance::Amount(value) => write!(f, "{:.2}", value),
            Balance::Unavailable => f.write_str(BALANCE_ERROR),
        }
    }
}

// Unavailable travels as the literal "Error" string
impl Serialize for Balance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Balance::Amount(value) => serializer.serialize_f64(*value),
            Balance::Unavailable => serializer.serialize_str(BALANCE_ERROR),
        }
    }
}

impl<'de> Deserialize<'de> for Balance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Amount(f64),
            Marker(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Amount(value) => Ok(Balance::Amount(value)),
            Raw::Marker(marker) if marker == BALANCE_ERROR => Ok(Balance::Unavailable),
            Raw::Marker(marker) => Err(de::Error::custom(format!(
                "unexpected balance marker '{}'",
                marker
            ))),
        }
    }
}
