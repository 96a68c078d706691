//! Asset transfer provider trait

use async_trait::async_trait;
use lockbox_core::{Amount, AssetId, Principal};
use strum_macros::Display;

use crate::CustodyError;

/// Which way value moves relative to custody
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TransferDirection {
    /// From the caller's external holdings into custody
    Pull,
    /// From custody back to the caller
    Push,
}

/// Asset Transfer Provider - interface to the external custodian
///
/// Implementations can be:
/// - InMemoryCustody: For testing and local simulation
/// - an ERC-20 adapter calling `transferFrom` / `transfer`
/// - a settlement-system client
///
/// Both calls may be slow and may fail. A failed call must have moved
/// nothing; the ledger relies on that to keep its books in step.
#[async_trait]
pub trait AssetTransferProvider: Send + Sync {
    /// Move `amount` of `asset` from `principal`'s external holdings into custody
    async fn pull_from_caller(
        &self,
        principal: &Principal,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), CustodyError>;

    /// Move `amount` of `asset` out of custody to `principal`
    async fn push_to_caller(
        &self,
        principal: &Principal,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), CustodyError>;
}
