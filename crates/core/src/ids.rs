//! Identifiers - Opaque principal and asset identifiers
//!
//! Both are compared by exact value only. The ledger never interprets them:
//! a principal is whatever the access layer authenticated, an asset is
//! whatever stable id the custody side uses (a token contract address in an
//! EVM deployment, a ticker elsewhere).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum length of an identifier parsed from untrusted input
pub const MAX_ID_LEN: usize = 128;

/// Errors that can occur when parsing identifiers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("Empty identifier")]
    Empty,

    #[error("Identifier too long (max {MAX_ID_LEN} chars): {0}")]
    TooLong(String),

    #[error("Identifier contains whitespace: {0:?}")]
    Whitespace(String),
}

fn validate(s: &str) -> Result<String, IdError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(IdError::Empty);
    }
    if s.len() > MAX_ID_LEN {
        return Err(IdError::TooLong(s.to_string()));
    }
    if s.chars().any(char::is_whitespace) {
        return Err(IdError::Whitespace(s.to_string()));
    }
    Ok(s.to_string())
}

/// Identity of the caller initiating a ledger operation.
///
/// Resolved and authenticated outside the ledger; the ledger only uses it as
/// an account key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Wrap an already-validated identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Principal {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate(s).map(Self)
    }
}

/// Identifier of a fungible asset type.
///
/// # Examples
/// ```
/// use lockbox_core::AssetId;
///
/// let token: AssetId = "0x1234567890123456789012345678901234567890".parse().unwrap();
/// assert_eq!(token.as_str(), "0x1234567890123456789012345678901234567890");
///
/// // Case is significant: ids are opaque
/// assert_ne!(AssetId::new("usdt"), AssetId::new("USDT"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Wrap an already-validated identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AssetId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate(s).map(Self)
    }
}
