//! Application context - wires everything together

use crate::config::AppConfig;
use lockbox_bus::{EventBus, JournalSubscriber};
use lockbox_core::{Clock, SystemClock};
use lockbox_custody::InMemoryCustody;
use lockbox_ledger::Ledger;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Application context - owns the ledger and its collaborators
pub struct AppContext {
    pub config: AppConfig,
    pub clock: Arc<dyn Clock>,
    pub custody: Arc<InMemoryCustody>,
    pub ledger: Arc<Ledger>,
    subscribers: Vec<JoinHandle<()>>,
}

impl AppContext {
    /// Create a context on the wall clock
    pub fn new(config: AppConfig) -> Result<Self, anyhow::Error> {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create a context on a caller-supplied clock.
    ///
    /// Must be called from within a tokio runtime when the journal is
    /// enabled, since the journal subscriber runs on its own task.
    pub fn with_clock(config: AppConfig, clock: Arc<dyn Clock>) -> Result<Self, anyhow::Error> {
        config.validate()?;

        let bus = EventBus::new(config.bus_capacity);
        let mut subscribers = Vec::new();

        if config.journal_enabled {
            let journal_dir = config.journal_dir();
            std::fs::create_dir_all(&journal_dir)?;
            let journal = Arc::new(JournalSubscriber::open(&journal_dir)?);
            subscribers.push(bus.spawn_subscriber(journal));
            info!(path = %journal_dir.display(), "audit journal enabled");
        }

        let custody = Arc::new(InMemoryCustody::new());
        let ledger = Arc::new(Ledger::new(custody.clone(), clock.clone(), bus));

        Ok(Self {
            config,
            clock,
            custody,
            ledger,
            subscribers,
        })
    }

    /// Get journal path
    pub fn journal_path(&self) -> PathBuf {
        self.config.journal_dir()
    }

    /// Close the bus and wait for subscribers to drain.
    ///
    /// Every clone of `ledger` handed out must be dropped first, otherwise
    /// the bus stays open and this waits forever.
    pub async fn shutdown(self) {
        drop(self.ledger);
        for handle in self.subscribers {
            if let Err(e) = handle.await {
                warn!(error = %e, "subscriber task ended abnormally");
            }
        }
    }
}
