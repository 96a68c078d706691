//! Lockbox CLI - Main entry point

use chrono::Duration;
use clap::{Parser, Subcommand};
use lockbox_core::{Amount, AssetId, ManualClock, Principal};
use lockbox_events::EventKind;
use lockbox_rpc::commands::{self, DebugRun};
use lockbox_rpc::{AppConfig, AppContext};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "lockbox")]
#[command(about = "Lockbox - time-locked custodial ledger", long_about = None)]
struct Cli {
    /// Data directory path (overrides config and LOCKBOX_DATA_DIR)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deposit, read the balance and try to withdraw against an in-memory custodian
    Debug {
        /// Principal to act as (random if omitted)
        #[arg(long)]
        principal: Option<Principal>,
        /// Asset identifier
        #[arg(long, default_value = "0x1234567890123456789012345678901234567890")]
        asset: AssetId,
        /// Amount in the asset's smallest unit (1 token with 18 decimals by default)
        #[arg(long, default_value = "1000000000000000000")]
        amount: Amount,
        /// Advance the clock by this many seconds and retry the withdrawal
        #[arg(long)]
        advance_secs: Option<i64>,
        /// Make custody reject the retried withdrawal
        #[arg(long, requires = "advance_secs")]
        fail_push: bool,
    },

    /// Summarize the audit journal per account
    Audit {
        /// Only count one kind of event (deposit, withdrawal)
        #[arg(long)]
        kind: Option<EventKind>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    }
    .with_env_overrides()?;
    if let Some(data) = cli.data {
        config.data_dir = data;
    }

    match cli.command {
        Commands::Debug {
            principal,
            asset,
            amount,
            advance_secs,
            fail_push,
        } => {
            let principal =
                principal.unwrap_or_else(|| Principal::new(Uuid::new_v4().to_string()));
            let clock = Arc::new(ManualClock::default());
            let ctx = AppContext::with_clock(config, clock.clone())?;

            let run = DebugRun {
                principal,
                asset,
                amount,
                advance: advance_secs.map(Duration::seconds),
                fail_push,
            };
            let outcome = commands::debug(&ctx, &clock, &run).await;
            ctx.shutdown().await;
            outcome?;
        }

        Commands::Audit { kind } => {
            commands::audit(&config.journal_dir(), kind)?;
        }
    }

    Ok(())
}
