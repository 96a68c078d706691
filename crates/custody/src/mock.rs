//! In-memory custodian for testing
//!
//! Behaves like a mock ERC-20 token with an unlimited allowance to the
//! ledger: principals are minted external holdings, pulls move them into a
//! per-asset custody pool and pushes move them back out.

use async_trait::async_trait;
use lockbox_core::{Amount, AssetId, Principal};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

use crate::error::CustodyError;
use crate::provider::AssetTransferProvider;

#[derive(Debug, Default)]
struct Books {
    /// External holdings per (principal, asset)
    holdings: HashMap<(Principal, AssetId), Amount>,
    /// Value currently in custody per asset
    custody: HashMap<AssetId, Amount>,
}

/// In-memory Asset Transfer Provider
///
/// Failure injection (`fail_pulls`, `fail_pushes`) and artificial latency
/// make it usable for exercising the ledger's rollback and locking paths.
#[derive(Debug, Default)]
pub struct InMemoryCustody {
    books: Mutex<Books>,
    fail_pulls: AtomicBool,
    fail_pushes: AtomicBool,
    latency: Option<Duration>,
    completed: AtomicU64,
}

impl InMemoryCustody {
    /// Create an empty custodian
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every transfer by `latency` before it takes effect
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn books(&self) -> MutexGuard<'_, Books> {
        self.books.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Credit external holdings (saturating)
    pub fn mint(&self, principal: &Principal, asset: &AssetId, amount: Amount) {
        let mut books = self.books();
        let held = books
            .holdings
            .entry((principal.clone(), asset.clone()))
            .or_default();
        *held = held.checked_add(&amount).unwrap_or(Amount::MAX);
    }

    /// External (non-custodied) holdings of a principal
    pub fn holdings(&self, principal: &Principal, asset: &AssetId) -> Amount {
        self.books()
            .holdings
            .get(&(principal.clone(), asset.clone()))
            .copied()
            .unwrap_or_default()
    }

    /// Total value of `asset` in custody
    pub fn custodied(&self, asset: &AssetId) -> Amount {
        self.books().custody.get(asset).copied().unwrap_or_default()
    }

    /// Make every subsequent pull fail (or stop failing)
    pub fn fail_pulls(&self, fail: bool) {
        self.fail_pulls.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent push fail (or stop failing)
    pub fn fail_pushes(&self, fail: bool) {
        self.fail_pushes.store(fail, Ordering::SeqCst);
    }

    /// Number of transfers that moved value
    pub fn completed_transfers(&self) -> u64 {
        self.completed.load(Ordering::SeqCst)
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl AssetTransferProvider for InMemoryCustody {
    async fn pull_from_caller(
        &self,
        principal: &Principal,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), CustodyError> {
        self.delay().await;
        if self.fail_pulls.load(Ordering::SeqCst) {
            return Err(CustodyError::rejected("pulls disabled"));
        }

        let mut books = self.books();
        let key = (principal.clone(), asset.clone());
        let available = books.holdings.get(&key).copied().unwrap_or_default();
        let remaining =
            available
                .checked_sub(&amount)
                .ok_or_else(|| CustodyError::InsufficientHoldings {
                    principal: principal.clone(),
                    asset: asset.clone(),
                    available,
                    requested: amount,
                })?;
        let pooled = books.custody.get(asset).copied().unwrap_or_default();
        let pooled = pooled
            .checked_add(&amount)
            .ok_or_else(|| CustodyError::rejected("custody pool overflow"))?;

        books.holdings.insert(key, remaining);
        books.custody.insert(asset.clone(), pooled);
        self.completed.fetch_add(1, Ordering::SeqCst);
        debug!(%principal, %asset, %amount, "custody pull");
        Ok(())
    }

    async fn push_to_caller(
        &self,
        principal: &Principal,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), CustodyError> {
        self.delay().await;
        if self.fail_pushes.load(Ordering::SeqCst) {
            return Err(CustodyError::rejected("pushes disabled"));
        }

        let mut books = self.books();
        let key = (principal.clone(), asset.clone());
        let available = books.custody.get(asset).copied().unwrap_or_default();
        let pooled =
            available
                .checked_sub(&amount)
                .ok_or_else(|| CustodyError::InsufficientCustody {
                    asset: asset.clone(),
                    available,
                    requested: amount,
                })?;
        let held = books.holdings.get(&key).copied().unwrap_or_default();
        let held = held
            .checked_add(&amount)
            .ok_or_else(|| CustodyError::rejected("holdings overflow"))?;

        books.custody.insert(asset.clone(), pooled);
        books.holdings.insert(key, held);
        self.completed.fetch_add(1, Ordering::SeqCst);
        debug!(%principal, %asset, %amount, "custody push");
        Ok(())
    }
}
