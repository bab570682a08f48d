//! Channel identifier.
//!
//! A channel (conversation) is named by a non-negative integer that fits the
//! backend's signed 64-bit ids. Route text, signed integers, and floats are
//! all accepted as input, but anything that is not a finite whole number in
//! `0..=i64::MAX` is rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest float that still maps exactly onto an integer id.
const MAX_EXACT_F64: f64 = 9_007_199_254_740_991.0;

/// Validated conversation id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ChannelId(i64);

/// Rejected channel id input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid chatId: {0}")]
pub struct InvalidChannelId(pub String);

impl ChannelId {
    pub const fn get(self) -> i64 {
        self.0
    }

    /// The id as the backend's signed integer type. Never negative.
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<ChannelId> for i64 {
    fn from(id: ChannelId) -> Self {
        id.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for ChannelId {
    type Error = InvalidChannelId;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 0 {
            return Err(InvalidChannelId(value.to_string()));
        }
        Ok(ChannelId(value))
    }
}

impl TryFrom<f64> for ChannelId {
    type Error = InvalidChannelId;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value.is_finite() && value.fract() == 0.0 && (0.0..=MAX_EXACT_F64).contains(&value) {
            Ok(ChannelId(value as i64))
        } else {
            Err(InvalidChannelId(value.to_string()))
        }
    }
}

impl TryFrom<&str> for ChannelId {
    type Error = InvalidChannelId;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<i64>() {
            Ok(id) if id >= 0 => Ok(ChannelId(id)),
            _ => Err(InvalidChannelId(value.to_string())),
        }
    }
}

impl TryFrom<String> for ChannelId {
    type Error = InvalidChannelId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ChannelId::try_from(value.as_str())
    }
}

impl std::str::FromStr for ChannelId {
    type Err = InvalidChannelId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChannelId::try_from(s)
    }
}
