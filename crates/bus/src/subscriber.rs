//! Event subscriber trait for async event handling

use crate::error::BusError;
use async_trait::async_trait;
use lockbox_events::LedgerEvent;

/// Trait for event subscribers
///
/// Subscribers receive events from the event bus and process them
/// asynchronously, one at a time, in publish order. A failing `handle` is
/// logged and the subscriber keeps receiving.
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    /// Get the subscriber name (for logging)
    fn name(&self) -> &str;

    /// Handle a ledger event
    async fn handle(&self, event: &LedgerEvent) -> Result<(), BusError>;

    /// Called once when the bus closes
    async fn on_close(&self) -> Result<(), BusError> {
        Ok(())
    }
}
