//! State tracker: the only writer of delivery states.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use alerthub_core::result::AppResult;
use alerthub_core::types::id::{AlertId, UserId};
use alerthub_entity::delivery::{DeliveryState, ReminderDecision, SnoozePolicy, StateChange};
use alerthub_store::repositories::DeliveryStateRepository;

/// Applies read, unread, snooze, and delivery transitions to the
/// per-(user, alert) records.
#[derive(Clone)]
pub struct StateTracker {
    states: Arc<dyn DeliveryStateRepository>,
    snooze: SnoozePolicy,
}

impl std::fmt::Debug for StateTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateTracker")
            .field("snooze", &self.snooze)
            .finish_non_exhaustive()
    }
}

impl StateTracker {
    /// Creates a new state tracker.
    pub fn new(states: Arc<dyn DeliveryStateRepository>, snooze: SnoozePolicy) -> Self {
        Self { states, snooze }
    }

    /// The snooze policy in effect.
    pub fn snooze_policy(&self) -> SnoozePolicy {
        self.snooze
    }

    /// Look up a pair without creating it.
    pub async fn find(
        &self,
        user_id: UserId,
        alert_id: AlertId,
    ) -> AppResult<Option<DeliveryState>> {
        self.states.find(user_id, alert_id).await
    }

    /// Existing record, or a new unread one.
    pub async fn get_or_create(
        &self,
        user_id: UserId,
        alert_id: AlertId,
        now: DateTime<Utc>,
    ) -> AppResult<DeliveryState> {
        self.states.get_or_create(user_id, alert_id, now).await
    }

    /// Mark read. Fails with `NotFound` if the pair has no record.
    pub async fn mark_read(
        &self,
        user_id: UserId,
        alert_id: AlertId,
        now: DateTime<Utc>,
    ) -> AppResult<DeliveryState> {
        let state = self
            .states
            .modify(user_id, alert_id, StateChange::MarkRead { at: now })
            .await?;
        info!(user_id = %user_id, alert_id = %alert_id, "Alert marked read");
        Ok(state)
    }

    /// Mark unread. Fails with `NotFound` if the pair has no record.
    pub async fn mark_unread(
        &self,
        user_id: UserId,
        alert_id: AlertId,
    ) -> AppResult<DeliveryState> {
        let state = self
            .states
            .modify(user_id, alert_id, StateChange::MarkUnread)
            .await?;
        info!(user_id = %user_id, alert_id = %alert_id, "Alert marked unread");
        Ok(state)
    }

    /// Snooze until the end of the day containing `now`, creating the
    /// record if needed. Repeating it within the same day is a no-op.
    pub async fn snooze(
        &self,
        user_id: UserId,
        alert_id: AlertId,
        now: DateTime<Utc>,
    ) -> AppResult<DeliveryState> {
        let until = self.snooze.end_of_day(now);
        let state = self
            .states
            .modify_or_create(user_id, alert_id, now, StateChange::SnoozeUntil { until })
            .await?;
        info!(user_id = %user_id, alert_id = %alert_id, %until, "Alert snoozed");
        Ok(state)
    }

    /// Record a delivery at `now`, creating the record if needed.
    pub async fn record_delivery(
        &self,
        user_id: UserId,
        alert_id: AlertId,
        now: DateTime<Utc>,
    ) -> AppResult<DeliveryState> {
        self.states
            .modify_or_create(user_id, alert_id, now, StateChange::RecordDelivery { at: now })
            .await
    }

    /// Decide and, when due, record a reminder in one atomic step.
    pub async fn deliver_if_due(
        &self,
        user_id: UserId,
        alert_id: AlertId,
        now: DateTime<Utc>,
        interval: Duration,
    ) -> AppResult<ReminderDecision> {
        let (decision, _) = self
            .states
            .deliver_if_due(user_id, alert_id, now, interval)
            .await?;
        debug!(user_id = %user_id, alert_id = %alert_id, ?decision, "Evaluated reminder");
        Ok(decision)
    }

    /// Whether the state is inside a snooze window at `now`.
    pub fn suppressed(state: &DeliveryState, now: DateTime<Utc>) -> bool {
        state.is_suppressed(now)
    }

    /// Every state of a user.
    pub async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<DeliveryState>> {
        self.states.list_for_user(user_id).await
    }

    /// Every stored state.
    pub async fn list_all(&self) -> AppResult<Vec<DeliveryState>> {
        self.states.list_all().await
    }
}
