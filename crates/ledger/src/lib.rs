//! Lockbox Ledger - Time-locked custodial accounting core
//!
//! All balance changes go through this crate.
//!
//! # Key Types
//! - `Ledger`: owns every account and runs deposit / withdraw / balance reads
//! - `AccountKey`: (principal, asset) pair identifying one balance
//! - `Account`: balance plus the time of the most recent deposit
//! - `LedgerError`: rejection reasons, one variant per failed precondition
//!
//! A deposit restarts the holding period for the *whole* balance of the
//! account, not just the deposited increment.

pub mod account;
pub mod error;
pub mod ledger;

pub use account::{hold_period, Account, AccountKey, HOLD_PERIOD_SECS};
pub use error::LedgerError;
pub use ledger::{Ledger, Receipt};
