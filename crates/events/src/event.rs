//! Ledger notifications

use chrono::{DateTime, Utc};
use lockbox_core::{Amount, AssetId, Principal};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Kind of committed ledger mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Deposit,
    Withdrawal,
}

/// A committed deposit or withdrawal.
///
/// Emitted only after the custody transfer succeeded and the balance change
/// is visible, so consumers never see an event for a rolled-back operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Ledger-wide commit order, starting at 1
    pub sequence: u64,
    pub kind: EventKind,
    pub principal: Principal,
    pub asset: AssetId,
    pub amount: Amount,
    /// Account balance right after the mutation
    pub balance_after: Amount,
    pub timestamp: DateTime<Utc>,
}

impl LedgerEvent {
    /// Create a Deposit event
    pub fn deposit(
        sequence: u64,
        principal: Principal,
        asset: AssetId,
        amount: Amount,
        balance_after: Amount,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            sequence,
            kind: EventKind::Deposit,
            principal,
            asset,
            amount,
            balance_after,
            timestamp,
        }
    }

    /// Create a Withdrawal event
    pub fn withdrawal(
        sequence: u64,
        principal: Principal,
        asset: AssetId,
        amount: Amount,
        balance_after: Amount,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            sequence,
            kind: EventKind::Withdrawal,
            principal,
            asset,
            amount,
            balance_after,
            timestamp,
        }
    }

    pub fn is_deposit(&self) -> bool {
        self.kind == EventKind::Deposit
    }
}
