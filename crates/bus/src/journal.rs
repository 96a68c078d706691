//! Subscriber that persists events to the JSONL audit journal

use crate::error::BusError;
use crate::subscriber::EventSubscriber;
use async_trait::async_trait;
use lockbox_events::{EventStore, LedgerEvent};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::debug;

/// Appends every received event to an [`EventStore`]
pub struct JournalSubscriber {
    store: Mutex<EventStore>,
}

impl JournalSubscriber {
    pub fn new(store: EventStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Open (or create) a journal directory
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BusError> {
        Ok(Self::new(EventStore::new(path)?))
    }
}

#[async_trait]
impl EventSubscriber for JournalSubscriber {
    fn name(&self) -> &str {
        "journal"
    }

    async fn handle(&self, event: &LedgerEvent) -> Result<(), BusError> {
        let mut store = self.store.lock().await;
        store.append(event)?;
        debug!(sequence = event.sequence, "journaled event");
        Ok(())
    }

    async fn on_close(&self) -> Result<(), BusError> {
        self.store.lock().await.close()?;
        Ok(())
    }
}
