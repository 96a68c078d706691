//! Amount - Non-negative integer wrapper for asset quantities
//!
//! Amounts are counted in the asset's smallest indivisible unit
//! (wei-style), so there is no fractional part and no rounding.
//! Negative amounts are unrepresentable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing amounts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Invalid amount: {0}")]
    Invalid(String),
}

/// A non-negative amount of an asset, in smallest units.
///
/// # Example
/// ```
/// use lockbox_core::Amount;
///
/// let amount = Amount::new(100);
/// assert_eq!(amount.value(), 100);
///
/// let parsed: Amount = "250".parse().unwrap();
/// assert_eq!(parsed.checked_sub(&amount), Some(Amount::new(150)));
///
/// // Negative amounts are rejected
/// assert!("-1".parse::<Amount>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(u128);

impl Amount {
    /// Zero amount constant
    pub const ZERO: Self = Self(0);

    /// Largest representable amount
    pub const MAX: Self = Self(u128::MAX);

    #[inline]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Get the inner integer value
    #[inline]
    pub const fn value(&self) -> u128 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns None on overflow
    pub fn checked_add(&self, other: &Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Returns None if the result would be negative
    pub fn checked_sub(&self, other: &Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().replace('_', "");
        s.parse::<u128>()
            .map(Amount)
            .map_err(|_| AmountError::Invalid(s))
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.0.to_string()
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(value as u128)
    }
}
