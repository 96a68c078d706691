//! Ledger - balances, holding period and custody orchestration

use crate::account::{Account, AccountKey};
use crate::error::LedgerError;
use chrono::{DateTime, Utc};
use lockbox_bus::EventBus;
use lockbox_core::{Amount, AssetId, Clock, Principal};
use lockbox_custody::{AssetTransferProvider, TransferDirection};
use lockbox_events::LedgerEvent;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

type AccountCell = Arc<Mutex<Account>>;

/// Result of a committed deposit or withdrawal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub sequence: u64,
    pub principal: Principal,
    pub asset: AssetId,
    pub amount: Amount,
    pub balance_after: Amount,
    pub timestamp: DateTime<Utc>,
}

impl From<&LedgerEvent> for Receipt {
    fn from(event: &LedgerEvent) -> Self {
        Self {
            sequence: event.sequence,
            principal: event.principal.clone(),
            asset: event.asset.clone(),
            amount: event.amount,
            balance_after: event.balance_after,
            timestamp: event.timestamp,
        }
    }
}

/// Time-locked custodial ledger
///
/// Each account sits behind its own async mutex, held for the whole
/// check-mutate-transfer sequence of an operation, so operations on one
/// account are linearizable. The account map lock is only taken to find,
/// insert or release an account cell and is never held across a custody
/// call, so unrelated accounts proceed in parallel.
pub struct Ledger {
    accounts: RwLock<HashMap<AccountKey, AccountCell>>,
    custody: Arc<dyn AssetTransferProvider>,
    clock: Arc<dyn Clock>,
    bus: EventBus,
    sequence: AtomicU64,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new(
        custody: Arc<dyn AssetTransferProvider>,
        clock: Arc<dyn Clock>,
        bus: EventBus,
    ) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            custody,
            clock,
            bus,
            sequence: AtomicU64::new(0),
        }
    }

    /// Bus that receives this ledger's events
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Sequence number of the last committed operation (0 if none)
    pub fn last_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    async fn existing_cell(&self, key: &AccountKey) -> Option<AccountCell> {
        self.accounts.read().await.get(key).cloned()
    }

    async fn cell(&self, key: &AccountKey) -> AccountCell {
        if let Some(cell) = self.existing_cell(key).await {
            return cell;
        }
        self.accounts
            .write()
            .await
            .entry(key.clone())
            .or_default()
            .clone()
    }

    /// Drop a cell that never received a deposit.
    ///
    /// Kept if any other task still holds a handle to it: that task may be
    /// about to lock and credit it, and must find it in the map afterwards.
    async fn release_if_unused(&self, key: &AccountKey, cell: AccountCell) {
        let mut accounts = self.accounts.write().await;
        let Some(mapped) = accounts.get(key) else {
            return;
        };
        // One reference in the map, one here
        if !Arc::ptr_eq(mapped, &cell) || Arc::strong_count(&cell) > 2 {
            return;
        }
        let unused = cell
            .try_lock()
            .map(|account| !account.has_history())
            .unwrap_or(false);
        if unused {
            accounts.remove(key);
            debug!(account = %key, "released empty account after failed deposit");
        }
    }

    fn commit(&self, event: LedgerEvent) -> Receipt {
        let receipt = Receipt::from(&event);
        self.bus.publish(event);
        receipt
    }

    /// Deposit `amount` of `asset` for `caller`.
    ///
    /// The custody pull happens first; the balance is credited only if it
    /// succeeds. A successful deposit restarts the holding period for the
    /// entire balance of the account.
    pub async fn deposit(
        &self,
        caller: &Principal,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<Receipt, LedgerError> {
        if amount.is_zero() {
            debug!(%caller, %asset, "deposit rejected: zero amount");
            return Err(LedgerError::InvalidAmount);
        }

        let key = AccountKey::new(caller.clone(), asset.clone());
        let cell = self.cell(&key).await;
        let mut account = cell.lock().await;

        // Check before pulling so value is never taken in that cannot be credited
        let balance_after =
            account
                .balance
                .checked_add(&amount)
                .ok_or(LedgerError::BalanceOverflow {
                    balance: account.balance,
                    amount,
                })?;

        if let Err(source) = self.custody.pull_from_caller(caller, asset, amount).await {
            warn!(account = %key, %amount, error = %source, "deposit pull failed");
            let pristine = !account.has_history();
            drop(account);
            if pristine {
                self.release_if_unused(&key, cell).await;
            }
            return Err(LedgerError::TransferFailed {
                direction: TransferDirection::Pull,
                source,
            });
        }

        let now = self.clock.now();
        account.balance = balance_after;
        account.touch(now);

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        info!(account = %key, %amount, balance = %balance_after, sequence, "deposit");

        Ok(self.commit(LedgerEvent::deposit(
            sequence,
            caller.clone(),
            asset.clone(),
            amount,
            balance_after,
            now,
        )))
    }

    /// Withdraw `amount` of `asset` back to `caller`.
    ///
    /// Checked in order: amount is positive, holding period has elapsed
    /// since the last deposit, balance covers the amount. The balance is
    /// debited before the custody push and restored if the push fails.
    ///
    /// Dropping the returned future while the push is in flight leaves the
    /// debit in place, since the push may already have gone through.
    pub async fn withdraw(
        &self,
        caller: &Principal,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<Receipt, LedgerError> {
        if amount.is_zero() {
            debug!(%caller, %asset, "withdraw rejected: zero amount");
            return Err(LedgerError::InvalidAmount);
        }

        let key = AccountKey::new(caller.clone(), asset.clone());
        let Some(cell) = self.existing_cell(&key).await else {
            debug!(account = %key, "withdraw rejected: no deposit history");
            return Err(LedgerError::WithdrawalLocked {
                principal: caller.clone(),
                asset: asset.clone(),
                unlocks_at: None,
            });
        };
        let mut account = cell.lock().await;

        if !account.is_unlocked(self.clock.now()) {
            debug!(account = %key, unlocks_at = ?account.unlocks_at(), "withdraw rejected: locked");
            return Err(LedgerError::WithdrawalLocked {
                principal: caller.clone(),
                asset: asset.clone(),
                unlocks_at: account.unlocks_at(),
            });
        }

        let before = account.balance;
        let remaining =
            before
                .checked_sub(&amount)
                .ok_or(LedgerError::InsufficientBalance {
                    available: before,
                    requested: amount,
                })?;

        // Phase 1: debit locally
        account.balance = remaining;

        // Phase 2: pay out, compensating on failure
        if let Err(source) = self.custody.push_to_caller(caller, asset, amount).await {
            account.balance = before;
            warn!(account = %key, %amount, error = %source, "withdraw push failed, balance restored");
            return Err(LedgerError::TransferFailed {
                direction: TransferDirection::Push,
                source,
            });
        }

        let now = self.clock.now();
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        info!(account = %key, %amount, balance = %remaining, sequence, "withdrawal");

        Ok(self.commit(LedgerEvent::withdrawal(
            sequence,
            caller.clone(),
            asset.clone(),
            amount,
            remaining,
            now,
        )))
    }

    /// Current balance, 0 for accounts that were never credited.
    ///
    /// Never creates an account.
    pub async fn get_balance(&self, principal: &Principal, asset: &AssetId) -> Amount {
        let key = AccountKey::new(principal.clone(), asset.clone());
        match self.existing_cell(&key).await {
            Some(cell) => cell.lock().await.balance,
            None => Amount::ZERO,
        }
    }

    /// When the account becomes withdrawable, None if it never received a deposit
    pub async fn unlocks_at(&self, principal: &Principal, asset: &AssetId) -> Option<DateTime<Utc>> {
        self.account(principal, asset)
            .await
            .and_then(|account| account.unlocks_at())
    }

    /// Snapshot of one account, None if it never received a deposit
    pub async fn account(&self, principal: &Principal, asset: &AssetId) -> Option<Account> {
        let key = AccountKey::new(principal.clone(), asset.clone());
        let cell = self.existing_cell(&key).await?;
        let account = cell.lock().await.clone();
        account.has_history().then_some(account)
    }

    /// Number of accounts with deposit history
    pub async fn account_count(&self) -> usize {
        let cells: Vec<AccountCell> = self.accounts.read().await.values().cloned().collect();
        let mut count = 0;
        for cell in cells {
            if cell.lock().await.has_history() {
                count += 1;
            }
        }
        count
    }

    /// Snapshot of every account with deposit history, ordered by key.
    ///
    /// Each account is read consistently; the set as a whole is not a
    /// point-in-time view while operations are running.
    pub async fn snapshot(&self) -> Vec<(AccountKey, Account)> {
        let cells: Vec<(AccountKey, AccountCell)> = self
            .accounts
            .read()
            .await
            .iter()
            .map(|(key, cell)| (key.clone(), cell.clone()))
            .collect();

        let mut accounts = Vec::with_capacity(cells.len());
        for (key, cell) in cells {
            let account = cell.lock().await.clone();
            if account.has_history() {
                accounts.push((key, account));
            }
        }
        accounts.sort_by(|a, b| a.0.cmp(&b.0));
        accounts
    }
}
