//! # alerthub-store
//!
//! Repository traits for alerts, per-pair delivery state, and the
//! delivery log, plus in-memory implementations of every repository and
//! of the identity [`Directory`](alerthub_core::traits::Directory).
//!
//! The in-memory backends lock per key (alert id or (user, alert) pair),
//! never the whole store, so admin updates and user actions proceed while
//! a reminder tick is running.

pub mod memory;
pub mod repositories;

use std::sync::Arc;

pub use memory::{MemoryAlertRepository, MemoryDeliveryLog, MemoryDeliveryStateRepository, MemoryDirectory};
pub use repositories::{AlertRepository, DeliveryLogRepository, DeliveryStateRepository};

/// Every in-memory backend, wired together.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Alert definitions.
    pub alerts: Arc<MemoryAlertRepository>,
    /// Per-(user, alert) delivery states.
    pub states: Arc<MemoryDeliveryStateRepository>,
    /// Append-only delivery log.
    pub log: Arc<MemoryDeliveryLog>,
    /// Users and teams.
    pub directory: Arc<MemoryDirectory>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}
