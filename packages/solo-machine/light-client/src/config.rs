//! Verification configuration of a solo machine client.

use core::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// How a proof or header timestamp must relate to the trusted consensus timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// `timestamp >= trusted`
    #[default]
    NonDecreasing,
    /// `timestamp > trusted`
    StrictlyIncreasing,
}

impl TimestampPolicy {
    /// Whether `timestamp` is acceptable against the `trusted` timestamp.
    #[must_use]
    pub const fn accepts(self, timestamp: u64, trusted: u64) -> bool {
        match self {
            Self::NonDecreasing => timestamp >= trusted,
            Self::StrictlyIncreasing => timestamp > trusted,
        }
    }
}

impl fmt::Display for TimestampPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NonDecreasing => "non_decreasing",
            Self::StrictlyIncreasing => "strictly_increasing",
        })
    }
}

impl FromStr for TimestampPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "non_decreasing" => Ok(Self::NonDecreasing),
            "strictly_increasing" => Ok(Self::StrictlyIncreasing),
            _ => Err(s.to_string()),
        }
    }
}

/// Configuration shared by all verification calls on one client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Ordering required between proof/header timestamps and the trusted timestamp
    pub timestamp_policy: TimestampPolicy,
}

impl ClientConfig {
    /// Load a configuration from JSON; missing fields take their defaults.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or contains unknown fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
