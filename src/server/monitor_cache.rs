//! In-memory snapshot of the monitor collection.
//!
//! Status reads use the snapshot instead of touching disk. Monitor writes
//! hand the freshly persisted collection to [`MonitorCache::replace`] while
//! still holding the store lock, so the snapshot never lags the file.

use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

use crate::db::models::Monitor;
use crate::db::store::{Collection, JsonStore, StoreError};

#[derive(Debug, Clone)]
pub struct MonitorSnapshot {
    /// Incremented on every rebuild.
    pub version: u64,
    pub monitors: Arc<Vec<Monitor>>,
}

#[derive(Debug)]
pub struct MonitorCache {
    inner: RwLock<MonitorSnapshot>,
}

impl MonitorCache {
    pub fn new(monitors: Vec<Monitor>) -> Self {
        Self {
            inner: RwLock::new(MonitorSnapshot {
                version: 1,
                monitors: Arc::new(monitors),
            }),
        }
    }

    pub async fn load(store: &JsonStore) -> Result<Self, StoreError> {
        let monitors: Vec<Monitor> = store.read(Collection::Monitors).await?;
        info!(count = monitors.len(), "Loaded monitors into cache.");
        Ok(Self::new(monitors))
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swaps in a new monitor list under a new version.
    pub fn replace(&self, monitors: Vec<Monitor>) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.version += 1;
        guard.monitors = Arc::new(monitors);
        info!(
            count = guard.monitors.len(),
            version = guard.version,
            "Reloaded monitor cache."
        );
    }
}
