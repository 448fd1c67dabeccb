//! Token amounts.
//!
//! Amounts are fixed-point integers (u128) in the smallest unit (wei for the
//! native asset, raw units for the governance token) to avoid floating-point errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw units per whole token (18 decimals).
pub const WEI_PER_UNIT: u128 = 1_000_000_000_000_000_000;

/// An amount of the native asset or of the governance token, in raw units.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Whole tokens, scaled by [`WEI_PER_UNIT`]. Saturates on overflow.
    pub fn from_whole(units: u128) -> Self {
        Self(units.saturating_mul(WEI_PER_UNIT))
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl From<u128> for TokenAmount {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Serde helper for human-edited formats (TOML, JSON scenarios).
///
/// TOML integers stop at i64, so amounts are written as decimal strings and
/// read back from either a string or a plain integer.
/// Use with `#[serde(with = "vdao_types::amount::decimal")]`.
pub mod decimal {
    use super::TokenAmount;
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Int(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(amount: &TokenAmount, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&amount.raw().to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<TokenAmount, D::Error> {
        match Repr::deserialize(d)? {
            Repr::Int(v) => Ok(TokenAmount::new(v as u128)),
            Repr::Text(s) => s
                .trim()
                .replace('_', "")
                .parse::<u128>()
                .map(TokenAmount::new)
                .map_err(|e| de::Error::custom(format!("invalid amount {s:?}: {e}"))),
        }
    }
}
