//! Integration tests for Lockbox
//!
//! These tests drive the ledger through the application context and
//! check what lands in the audit journal.

use chrono::Duration;
use lockbox_core::{Amount, AssetId, ManualClock, Principal};
use lockbox_events::{EventKind, EventReader};
use lockbox_ledger::{hold_period, LedgerError};
use lockbox_rpc::commands::{self, DebugRun};
use lockbox_rpc::{AppConfig, AppContext};
use std::sync::Arc;
use tempfile::TempDir;

fn config(dir: &TempDir) -> AppConfig {
    AppConfig {
        data_dir: dir.path().to_path_buf(),
        ..AppConfig::default()
    }
}

fn context(dir: &TempDir) -> (AppContext, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::at_epoch());
    let ctx = AppContext::with_clock(config(dir), clock.clone()).unwrap();
    (ctx, clock)
}

/// Test: Deposit → locked withdraw → wait → withdraw → journal
#[tokio::test]
async fn test_full_workflow() {
    let temp_dir = TempDir::new().unwrap();
    let (ctx, clock) = context(&temp_dir);
    let alice = Principal::new("ALICE");
    let usdt = AssetId::new("USDT");

    ctx.custody.mint(&alice, &usdt, Amount::new(1_000));

    // 1. Deposit 500
    let receipt = ctx.ledger.deposit(&alice, &usdt, Amount::new(500)).await.unwrap();
    assert_eq!(receipt.sequence, 1);
    assert_eq!(receipt.balance_after, Amount::new(500));

    // 2. Withdrawal is locked
    let err = ctx
        .ledger
        .withdraw(&alice, &usdt, Amount::new(200))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "WITHDRAWAL_LOCKED");

    // 3. After the holding period it goes through
    clock.advance(hold_period());
    ctx.ledger.withdraw(&alice, &usdt, Amount::new(200)).await.unwrap();
    assert_eq!(ctx.ledger.get_balance(&alice, &usdt).await, Amount::new(300));
    assert_eq!(ctx.custody.holdings(&alice, &usdt), Amount::new(700));

    // 4. Journal holds both committed operations, nothing for the rejection
    let journal = ctx.journal_path();
    ctx.shutdown().await;

    let events = EventReader::from_directory(&journal).unwrap().read_all().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, EventKind::Deposit);
    assert_eq!(events[1].kind, EventKind::Withdrawal);
    assert_eq!(events[1].balance_after, Amount::new(300));
    assert_eq!(events[1].sequence, 2);
}

#[tokio::test]
async fn test_debug_without_advance_stays_locked() {
    let temp_dir = TempDir::new().unwrap();
    let (ctx, clock) = context(&temp_dir);

    let run = DebugRun {
        principal: Principal::new("deployer"),
        asset: AssetId::new("0x1234567890123456789012345678901234567890"),
        amount: Amount::new(1_000_000_000_000_000_000),
        advance: None,
        fail_push: false,
    };
    let outcome = commands::debug(&ctx, &clock, &run).await.unwrap();

    assert_eq!(outcome.balance_after_deposit, run.amount);
    assert!(matches!(
        outcome.first_withdraw,
        Err(LedgerError::WithdrawalLocked {
            unlocks_at: Some(_),
            ..
        })
    ));
    assert!(outcome.retry.is_none());
    assert_eq!(outcome.final_balance, run.amount);
    ctx.shutdown().await;
}

#[tokio::test]
async fn test_debug_with_advance_withdraws() {
    let temp_dir = TempDir::new().unwrap();
    let (ctx, clock) = context(&temp_dir);

    let run = DebugRun {
        principal: Principal::new("deployer"),
        asset: AssetId::new("MTK"),
        amount: Amount::new(100),
        advance: Some(hold_period() + Duration::seconds(1)),
        fail_push: false,
    };
    let outcome = commands::debug(&ctx, &clock, &run).await.unwrap();

    assert!(outcome.first_withdraw.is_err());
    let retry = outcome.retry.unwrap().unwrap();
    assert_eq!(retry.balance_after, Amount::ZERO);
    assert_eq!(outcome.final_balance, Amount::ZERO);
    assert_eq!(ctx.custody.holdings(&run.principal, &run.asset), Amount::new(100));

    let journal = ctx.journal_path();
    ctx.shutdown().await;

    let report = commands::audit(&journal, None).unwrap();
    assert_eq!(report.events, 2);
    let summary = &report.accounts[&(run.principal.clone(), run.asset.clone())];
    assert_eq!(summary.deposited, 100);
    assert_eq!(summary.withdrawn, 100);
    assert_eq!(summary.net(), 0);
}

#[tokio::test]
async fn test_debug_failed_push_keeps_balance() {
    let temp_dir = TempDir::new().unwrap();
    let (ctx, clock) = context(&temp_dir);

    let run = DebugRun {
        principal: Principal::new("deployer"),
        asset: AssetId::new("MTK"),
        amount: Amount::new(100),
        advance: Some(hold_period()),
        fail_push: true,
    };
    let outcome = commands::debug(&ctx, &clock, &run).await.unwrap();

    assert!(matches!(
        outcome.retry,
        Some(Err(LedgerError::TransferFailed { .. }))
    ));
    assert_eq!(outcome.final_balance, Amount::new(100));
    assert_eq!(ctx.custody.custodied(&run.asset), Amount::new(100));

    let journal = ctx.journal_path();
    ctx.shutdown().await;

    let report = commands::audit(&journal, Some(EventKind::Withdrawal)).unwrap();
    assert_eq!(report.events, 0);
    assert!(report.accounts.is_empty());
}

#[tokio::test]
async fn test_audit_filters_by_kind() {
    let temp_dir = TempDir::new().unwrap();
    let (ctx, clock) = context(&temp_dir);
    let bob = Principal::new("BOB");
    let btc = AssetId::new("BTC");
    ctx.custody.mint(&bob, &btc, Amount::new(50));

    ctx.ledger.deposit(&bob, &btc, Amount::new(30)).await.unwrap();
    ctx.ledger.deposit(&bob, &btc, Amount::new(20)).await.unwrap();
    clock.advance(hold_period());
    ctx.ledger.withdraw(&bob, &btc, Amount::new(45)).await.unwrap();

    let journal = ctx.journal_path();
    ctx.shutdown().await;

    let deposits = commands::audit(&journal, Some(EventKind::Deposit)).unwrap();
    assert_eq!(deposits.events, 2);
    let summary = &deposits.accounts[&(bob.clone(), btc.clone())];
    assert_eq!(summary.deposits, 2);
    assert_eq!(summary.withdrawals, 0);

    let all = commands::audit(&journal, None).unwrap();
    assert_eq!(all.events, 3);
    assert_eq!(all.accounts[&(bob, btc)].net(), 5);
}

#[tokio::test]
async fn test_journal_disabled_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let config = AppConfig {
        journal_enabled: false,
        ..config(&temp_dir)
    };
    let ctx = AppContext::with_clock(config, Arc::new(ManualClock::at_epoch())).unwrap();
    let carol = Principal::new("CAROL");
    let eth = AssetId::new("ETH");
    ctx.custody.mint(&carol, &eth, Amount::new(10));
    ctx.ledger.deposit(&carol, &eth, Amount::new(10)).await.unwrap();

    let journal = ctx.journal_path();
    ctx.shutdown().await;

    assert!(!journal.exists());
    let report = commands::audit(&journal, None).unwrap();
    assert_eq!(report.events, 0);
}

#[tokio::test]
async fn test_audit_on_empty_data_dir() {
    let temp_dir = TempDir::new().unwrap();
    let report = commands::audit(&config(&temp_dir).journal_dir(), None).unwrap();
    assert_eq!(report.events, 0);
}
