//! Broadcast-backed event bus

use crate::subscriber::EventSubscriber;
use lockbox_events::LedgerEvent;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default channel capacity (events buffered per slow subscriber)
pub const DEFAULT_CAPACITY: usize = 1024;

/// Event bus for distributing committed ledger events
///
/// Cloning is cheap; all clones publish into the same channel. The bus
/// closes when the last clone is dropped, which ends spawned subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<LedgerEvent>,
}

impl EventBus {
    /// Create a new event bus buffering up to `capacity` events
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event, returning how many receivers got it.
    ///
    /// Having no receivers is not an error.
    pub fn publish(&self, event: LedgerEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("event published with no subscribers");
                0
            }
        }
    }

    /// Raw receiver for callers that want to drive consumption themselves
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Run `subscriber` on a tokio task until the bus closes.
    ///
    /// The subscription is taken before this returns, so every event
    /// published afterwards is delivered.
    pub fn spawn_subscriber(&self, subscriber: Arc<dyn EventSubscriber>) -> JoinHandle<()> {
        let mut receiver = self.sender.subscribe();

        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        if let Err(e) = subscriber.handle(&event).await {
                            warn!(
                                subscriber = subscriber.name(),
                                sequence = event.sequence,
                                error = %e,
                                "subscriber failed to handle event"
                            );
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(subscriber = subscriber.name(), skipped, "subscriber lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            if let Err(e) = subscriber.on_close().await {
                warn!(subscriber = subscriber.name(), error = %e, "subscriber close failed");
            }
            debug!(subscriber = subscriber.name(), "subscriber stopped");
        })
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
