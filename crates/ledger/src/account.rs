//! Ledger Account - per (principal, asset) balance and lock state

use chrono::{DateTime, Duration, Utc};
use lockbox_core::{Amount, AssetId, Principal};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Holding period after the most recent deposit, in seconds (24 hours)
pub const HOLD_PERIOD_SECS: i64 = 24 * 60 * 60;

/// Holding period as a chrono Duration
pub fn hold_period() -> Duration {
    Duration::seconds(HOLD_PERIOD_SECS)
}

/// Account identifier
///
/// Format: `PRINCIPAL/ASSET`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountKey {
    pub principal: Principal,
    pub asset: AssetId,
}

impl AccountKey {
    pub fn new(principal: Principal, asset: AssetId) -> Self {
        Self { principal, asset }
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.principal, self.asset)
    }
}

/// Balance and lock state of one account.
///
/// # Invariants
/// - `balance` never goes below zero (enforced by `Amount`)
/// - `last_deposit` only ever moves forward
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub balance: Amount,
    /// None until the first successful deposit
    pub last_deposit: Option<DateTime<Utc>>,
}

impl Account {
    /// True once the account has seen a successful deposit
    pub fn has_history(&self) -> bool {
        self.last_deposit.is_some()
    }

    /// When the current holding period ends, None if never deposited
    pub fn unlocks_at(&self) -> Option<DateTime<Utc>> {
        self.last_deposit
            .and_then(|t| t.checked_add_signed(hold_period()))
    }

    /// Whether a withdrawal is allowed at `now`.
    ///
    /// Accounts without any deposit are locked.
    pub fn is_unlocked(&self, now: DateTime<Utc>) -> bool {
        match self.last_deposit {
            Some(t) => now.signed_duration_since(t) >= hold_period(),
            None => false,
        }
    }

    /// Restart the holding period at `now` (never moves it backwards)
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.last_deposit = self.last_deposit.max(Some(now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }

    #[test]
    fn test_hold_period_is_24h() {
        assert_eq!(hold_period(), Duration::hours(24));
    }

    #[test]
    fn test_never_deposited_is_locked() {
        let account = Account::default();
        assert!(!account.has_history());
        assert!(!account.is_unlocked(epoch() + Duration::days(365)));
        assert_eq!(account.unlocks_at(), None);
    }

    #[test]
    fn test_unlock_boundary() {
        let mut account = Account::default();
        account.touch(epoch());

        assert!(!account.is_unlocked(epoch()));
        assert!(!account.is_unlocked(epoch() + hold_period() - Duration::seconds(1)));
        assert!(account.is_unlocked(epoch() + hold_period()));
        assert!(account.is_unlocked(epoch() + hold_period() + Duration::seconds(1)));
        assert_eq!(account.unlocks_at(), Some(epoch() + hold_period()));
    }

    #[test]
    fn test_touch_never_moves_backwards() {
        let mut account = Account::default();
        account.touch(epoch() + Duration::hours(5));
        account.touch(epoch());
        assert_eq!(account.last_deposit, Some(epoch() + Duration::hours(5)));

        account.touch(epoch() + Duration::hours(6));
        assert_eq!(account.last_deposit, Some(epoch() + Duration::hours(6)));
    }

    #[test]
    fn test_clock_regression_keeps_lock() {
        let mut account = Account::default();
        account.touch(epoch() + Duration::hours(10));
        // A clock reading earlier than the deposit must not unlock
        assert!(!account.is_unlocked(epoch()));
    }

    #[test]
    fn test_account_key_display() {
        let key = AccountKey::new(Principal::new("alice"), AssetId::new("MTK"));
        assert_eq!(key.to_string(), "alice/MTK");
    }
}
