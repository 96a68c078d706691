//! CLI commands

use chrono::Duration;
use lockbox_core::{Amount, AssetId, Clock, ManualClock, Principal};
use lockbox_events::{summarize, AccountSummary, EventKind, EventReader};
use lockbox_ledger::{LedgerError, Receipt};
use std::collections::BTreeMap;
use std::path::Path;

use crate::context::AppContext;

/// Inputs for the `debug` walkthrough
#[derive(Debug, Clone)]
pub struct DebugRun {
    pub principal: Principal,
    pub asset: AssetId,
    pub amount: Amount,
    /// Move the manual clock forward by this much before retrying
    pub advance: Option<Duration>,
    /// Make custody reject the retried withdrawal's push (needs `advance`)
    pub fail_push: bool,
}

/// What happened at each step of a `debug` walkthrough
#[derive(Debug)]
pub struct DebugOutcome {
    pub deposit: Receipt,
    pub balance_after_deposit: Amount,
    pub first_withdraw: Result<Receipt, LedgerError>,
    pub retry: Option<Result<Receipt, LedgerError>>,
    pub final_balance: Amount,
}

/// Deposit, read the balance, then try to withdraw right away.
///
/// The immediate withdrawal is expected to hit the holding period. When
/// `advance` is set the manual clock is moved forward and the withdrawal is
/// retried.
pub async fn debug(
    ctx: &AppContext,
    clock: &ManualClock,
    run: &DebugRun,
) -> Result<DebugOutcome, anyhow::Error> {
    let DebugRun {
        principal,
        asset,
        amount,
        ..
    } = run;

    println!("Debugging with account: {}", principal);
    ctx.custody.mint(principal, asset, *amount);
    println!(
        "Account holdings: {} {}",
        ctx.custody.holdings(principal, asset),
        asset
    );

    let deposit = ctx.ledger.deposit(principal, asset, *amount).await?;
    println!(
        "✅ Deposited: {} to asset: {} (seq: {})",
        amount, asset, deposit.sequence
    );

    let balance_after_deposit = ctx.ledger.get_balance(principal, asset).await;
    println!("Balance after deposit: {}", balance_after_deposit);

    let first_withdraw = attempt_withdraw(ctx, principal, asset, *amount).await;

    let retry = match run.advance {
        Some(by) => {
            clock.advance(by);
            println!("⏩ Advanced clock by {}s to {}", by.num_seconds(), clock.now().to_rfc3339());
            if run.fail_push {
                ctx.custody.fail_pushes(true);
                println!("⚠️  Custody will reject the next push");
            }
            Some(attempt_withdraw(ctx, principal, asset, *amount).await)
        }
        None => None,
    };

    let final_balance = ctx.ledger.get_balance(principal, asset).await;
    println!("Final balance: {}", final_balance);

    Ok(DebugOutcome {
        deposit,
        balance_after_deposit,
        first_withdraw,
        retry,
        final_balance,
    })
}

async fn attempt_withdraw(
    ctx: &AppContext,
    principal: &Principal,
    asset: &AssetId,
    amount: Amount,
) -> Result<Receipt, LedgerError> {
    let result = ctx.ledger.withdraw(principal, asset, amount).await;
    match &result {
        Ok(receipt) => println!(
            "✅ Withdrawn: {} from asset: {} (seq: {})",
            amount, asset, receipt.sequence
        ),
        Err(LedgerError::WithdrawalLocked {
            unlocks_at: Some(at),
            ..
        }) => println!("❌ Withdrawal failed. Error: locked until {}", at.to_rfc3339()),
        Err(e) => println!("❌ Withdrawal failed. Error: {} [{}]", e, e.code()),
    }
    result
}

/// Totals recorded in the audit journal
#[derive(Debug, Default)]
pub struct AuditReport {
    pub events: usize,
    pub accounts: BTreeMap<(Principal, AssetId), AccountSummary>,
}

/// Summarize the journal per account, optionally only one kind of event
pub fn audit(journal_dir: &Path, kind: Option<EventKind>) -> Result<AuditReport, anyhow::Error> {
    let reader = EventReader::from_directory(journal_dir)?;
    let events: Vec<_> = reader
        .read_all()?
        .into_iter()
        .filter(|event| kind.map_or(true, |k| event.kind == k))
        .collect();

    let accounts = summarize(&events);

    if events.is_empty() {
        println!("No events found");
        return Ok(AuditReport::default());
    }

    println!(
        "Journal: {} events across {} accounts",
        events.len(),
        accounts.len()
    );
    println!("{:-<100}", "");
    println!(
        "{:<44} {:<20} {:>6} {:>6} {:>20}",
        "PRINCIPAL", "ASSET", "IN", "OUT", "NET"
    );
    println!("{:-<100}", "");
    for ((principal, asset), summary) in &accounts {
        println!(
            "{:<44} {:<20} {:>6} {:>6} {:>20}",
            principal.as_str(),
            asset.as_str(),
            summary.deposits,
            summary.withdrawals,
            summary.net()
        );
    }

    Ok(AuditReport {
        events: events.len(),
        accounts,
    })
}
