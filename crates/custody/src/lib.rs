//! Lockbox Custody
//!
//! Moves asset value into and out of the ledger's custody.
//! The ledger only sees success or failure; how value actually moves
//! (token `transferFrom`, bank rail, internal book) is up to the provider.
//! Currently implements InMemoryCustody for tests and the demo CLI.

mod error;
mod mock;
mod provider;

pub use error::CustodyError;
pub use mock::InMemoryCustody;
pub use provider::{AssetTransferProvider, TransferDirection};
