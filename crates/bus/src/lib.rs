//! Lockbox Event Bus - In-process async event distribution
//!
//! Distributes committed ledger events to subscribers (audit journal,
//! monitoring, tests).
//!
//! - Async pub/sub with tokio broadcast channel
//! - EventSubscriber trait for custom handlers
//! - Publishing never blocks the ledger; slow subscribers lag and are told so

pub mod channel;
pub mod error;
pub mod journal;
pub mod subscriber;

pub use channel::EventBus;
pub use error::BusError;
pub use journal::JournalSubscriber;
pub use lockbox_events::LedgerEvent;
pub use subscriber::EventSubscriber;
