//! Lockbox Events - Ledger notifications and JSONL audit journal
//!
//! Every committed deposit or withdrawal produces a [`LedgerEvent`].
//! Events are distributed in-process by `lockbox-bus` and can be persisted
//! to append-only JSONL files for auditing. The journal is an audit trail,
//! not the ledger's source of truth.

pub mod error;
pub mod event;
pub mod reader;
pub mod store;
pub mod summary;

pub use error::EventError;
pub use event::{EventKind, LedgerEvent};
pub use reader::EventReader;
pub use store::EventStore;
pub use summary::{summarize, AccountSummary};
