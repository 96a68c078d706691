//! Lockbox RPC - application wiring and CLI
//!
//! This crate provides the `lockbox` binary and the context that wires a
//! ledger to its custody provider, clock, event bus and audit journal.

pub mod commands;
pub mod config;
pub mod context;

pub use config::{AppConfig, ConfigError};
pub use context::AppContext;
