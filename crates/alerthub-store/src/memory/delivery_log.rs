//! In-memory delivery log.

use std::sync::RwLock;

use async_trait::async_trait;

use alerthub_core::result::AppResult;
use alerthub_entity::delivery::{DeliveryEvent, DeliveryFilter};

use crate::repositories::DeliveryLogRepository;

/// Append-only event list guarded by a read-write lock.
#[derive(Debug, Default)]
pub struct MemoryDeliveryLog {
    events: RwLock<Vec<DeliveryEvent>>,
}

impl MemoryDeliveryLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeliveryLogRepository for MemoryDeliveryLog {
    async fn append(&self, event: DeliveryEvent) -> AppResult<()> {
        self.events
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
        Ok(())
    }

    async fn list(&self, filter: &DeliveryFilter) -> AppResult<Vec<DeliveryEvent>> {
        let events = self.events.read().unwrap_or_else(|e| e.into_inner());
        Ok(events.iter().filter(|e| filter.matches(e)).cloned().collect())
    }

    async fn count(&self) -> AppResult<u64> {
        let events = self.events.read().unwrap_or_else(|e| e.into_inner());
        Ok(events.len() as u64)
    }
}
