//! Delivery log repository trait.

use async_trait::async_trait;

use alerthub_core::result::AppResult;
use alerthub_entity::delivery::{DeliveryEvent, DeliveryFilter};

/// Append-only ledger of delivery events.
///
/// Appends are atomic and visible to every read that starts after they
/// return. Ordering between concurrent appends is unspecified.
#[async_trait]
pub trait DeliveryLogRepository: Send + Sync + 'static {
    /// Append one event.
    async fn append(&self, event: DeliveryEvent) -> AppResult<()>;

    /// Events matching the filter, in append order.
    async fn list(&self, filter: &DeliveryFilter) -> AppResult<Vec<DeliveryEvent>>;

    /// Total number of events.
    async fn count(&self) -> AppResult<u64>;
}
