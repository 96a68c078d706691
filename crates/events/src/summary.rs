//! Per-account totals derived from a journal

use crate::event::{EventKind, LedgerEvent};
use chrono::{DateTime, Utc};
use lockbox_core::{AssetId, Principal};
use std::collections::BTreeMap;

/// Deposit/withdrawal totals for one (principal, asset) account.
///
/// Totals are `u128` sums and saturate rather than wrap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountSummary {
    pub deposited: u128,
    pub withdrawn: u128,
    pub deposits: usize,
    pub withdrawals: usize,
    pub last_deposit: Option<DateTime<Utc>>,
}

impl AccountSummary {
    /// Net balance implied by the journal
    pub fn net(&self) -> u128 {
        self.deposited.saturating_sub(self.withdrawn)
    }
}

/// Fold events into per-account totals, keyed for stable output order
pub fn summarize<'a>(
    events: impl IntoIterator<Item = &'a LedgerEvent>,
) -> BTreeMap<(Principal, AssetId), AccountSummary> {
    let mut accounts: BTreeMap<(Principal, AssetId), AccountSummary> = BTreeMap::new();

    for event in events {
        let summary = accounts
            .entry((event.principal.clone(), event.asset.clone()))
            .or_default();
        match event.kind {
            EventKind::Deposit => {
                summary.deposited = summary.deposited.saturating_add(event.amount.value());
                summary.deposits += 1;
                summary.last_deposit = summary.last_deposit.max(Some(event.timestamp));
            }
            EventKind::Withdrawal => {
                summary.withdrawn = summary.withdrawn.saturating_add(event.amount.value());
                summary.withdrawals += 1;
            }
        }
    }

    accounts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lockbox_core::Amount;

    #[test]
    fn test_summarize_nets_per_account() {
        let t0 = DateTime::<Utc>::UNIX_EPOCH;
        let alice = Principal::new("alice");
        let bob = Principal::new("bob");
        let mtk = AssetId::new("MTK");

        let events = vec![
            LedgerEvent::deposit(1, alice.clone(), mtk.clone(), Amount::new(100), Amount::new(100), t0),
            LedgerEvent::deposit(2, bob.clone(), mtk.clone(), Amount::new(7), Amount::new(7), t0),
            LedgerEvent::withdrawal(
                3,
                alice.clone(),
                mtk.clone(),
                Amount::new(40),
                Amount::new(60),
                t0 + Duration::hours(25),
            ),
        ];

        let summary = summarize(&events);
        assert_eq!(summary.len(), 2);

        let a = &summary[&(alice, mtk.clone())];
        assert_eq!(a.net(), 60);
        assert_eq!(a.deposits, 1);
        assert_eq!(a.withdrawals, 1);
        assert_eq!(a.last_deposit, Some(t0));

        assert_eq!(summary[&(bob, mtk)].net(), 7);
    }
}
