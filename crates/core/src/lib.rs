//! Lockbox Core - Domain types
//!
//! This crate contains the fundamental types used across Lockbox:
//! - `Principal`: Opaque identity of the caller of a ledger operation
//! - `AssetId`: Opaque identifier of a fungible asset type
//! - `Amount`: Non-negative integer amount in the asset's smallest unit
//! - `Clock`: Source of time for holding-period checks

pub mod amount;
pub mod clock;
pub mod ids;

pub use amount::{Amount, AmountError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use ids::{AssetId, IdError, Principal};
