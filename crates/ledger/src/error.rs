//! Ledger errors

use chrono::{DateTime, Utc};
use lockbox_core::{Amount, AssetId, Principal};
use lockbox_custody::{CustodyError, TransferDirection};
use thiserror::Error;

/// Reasons a ledger operation is rejected.
///
/// Every rejection leaves the ledger exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Amount must be greater than 0")]
    InvalidAmount,

    #[error("Withdrawal locked for 24 hours after deposit ({principal}/{asset})")]
    WithdrawalLocked {
        principal: Principal,
        asset: AssetId,
        /// None when the account has never received a deposit
        unlocks_at: Option<DateTime<Utc>>,
    },

    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance { available: Amount, requested: Amount },

    #[error("Custody {direction} failed: {source}")]
    TransferFailed {
        direction: TransferDirection,
        #[source]
        source: CustodyError,
    },

    #[error("Deposit of {amount} would overflow balance {balance}")]
    BalanceOverflow { balance: Amount, amount: Amount },
}

impl LedgerError {
    /// Short machine-readable code, stable across releases
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidAmount => "INVALID_AMOUNT",
            LedgerError::WithdrawalLocked { .. } => "WITHDRAWAL_LOCKED",
            LedgerError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            LedgerError::TransferFailed { .. } => "TRANSFER_FAILED",
            LedgerError::BalanceOverflow { .. } => "BALANCE_OVERFLOW",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_messages() {
        assert_eq!(
            LedgerError::InvalidAmount.to_string(),
            "Amount must be greater than 0"
        );
        let err = LedgerError::InsufficientBalance {
            available: Amount::new(100),
            requested: Amount::new(101),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: available 100, requested 101"
        );
        assert_eq!(err.code(), "INSUFFICIENT_BALANCE");
    }

    #[test]
    fn test_transfer_failed_keeps_source() {
        let err = LedgerError::TransferFailed {
            direction: TransferDirection::Push,
            source: CustodyError::rejected("offline"),
        };
        assert_eq!(err.to_string(), "Custody push failed: Transfer rejected: offline");
        assert!(err.source().is_some());
    }
}
