//! Custody error types

use lockbox_core::{Amount, AssetId, Principal};
use thiserror::Error;

/// Custody transfer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustodyError {
    /// Caller does not hold enough of the asset outside custody
    #[error("{principal} holds {available} {asset}, cannot pull {requested}")]
    InsufficientHoldings {
        principal: Principal,
        asset: AssetId,
        available: Amount,
        requested: Amount,
    },

    /// Custody does not hold enough of the asset to pay out
    #[error("Custody holds {available} {asset}, cannot push {requested}")]
    InsufficientCustody {
        asset: AssetId,
        available: Amount,
        requested: Amount,
    },

    /// Counterparty refused or failed the transfer
    #[error("Transfer rejected: {reason}")]
    Rejected { reason: String },
}

impl CustodyError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}
