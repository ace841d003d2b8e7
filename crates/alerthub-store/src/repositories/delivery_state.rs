//! Delivery state repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use alerthub_core::result::AppResult;
use alerthub_core::types::id::{AlertId, UserId};
use alerthub_entity::delivery::{DeliveryState, ReminderDecision, StateChange};

/// Storage for one [`DeliveryState`] per (user, alert) pair.
///
/// Every mutating method is an atomic read-modify-write of a single pair:
/// implementations must hold a lock scoped to that pair (or use an
/// equivalent compare-and-swap) for the whole operation.
#[async_trait]
pub trait DeliveryStateRepository: Send + Sync + 'static {
    /// Look up a pair without creating it.
    async fn find(&self, user_id: UserId, alert_id: AlertId) -> AppResult<Option<DeliveryState>>;

    /// Return the pair, creating a fresh unread record if it is missing.
    async fn get_or_create(
        &self,
        user_id: UserId,
        alert_id: AlertId,
        now: DateTime<Utc>,
    ) -> AppResult<DeliveryState>;

    /// Apply a change to an existing pair. Fails with `NotFound` otherwise.
    async fn modify(
        &self,
        user_id: UserId,
        alert_id: AlertId,
        change: StateChange,
    ) -> AppResult<DeliveryState>;

    /// Apply a change, creating the pair first if it is missing.
    async fn modify_or_create(
        &self,
        user_id: UserId,
        alert_id: AlertId,
        now: DateTime<Utc>,
        change: StateChange,
    ) -> AppResult<DeliveryState>;

    /// Get-or-create the pair, decide whether a reminder is due, and record
    /// the delivery when it is, all under one lock.
    async fn deliver_if_due(
        &self,
        user_id: UserId,
        alert_id: AlertId,
        now: DateTime<Utc>,
        interval: Duration,
    ) -> AppResult<(ReminderDecision, DeliveryState)>;

    /// Every state belonging to a user.
    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<DeliveryState>>;

    /// Every state belonging to an alert.
    async fn list_for_alert(&self, alert_id: AlertId) -> AppResult<Vec<DeliveryState>>;

    /// Every stored state.
    async fn list_all(&self) -> AppResult<Vec<DeliveryState>>;
}
