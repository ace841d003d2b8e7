//! Records deliveries against the state tracker and the delivery log.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use alerthub_core::result::AppResult;
use alerthub_core::types::id::UserId;
use alerthub_entity::alert::{Alert, DeliveryChannel};
use alerthub_entity::delivery::{DeliveryEvent, DeliveryFilter, DeliveryKind, ReminderDecision};
use alerthub_store::repositories::DeliveryLogRepository;

use crate::state::StateTracker;

/// Turns a delivery decision into a state update plus a log entry.
///
/// No channel has a transport: every delivery is an in-app log entry
/// that records the channel the alert asked for.
#[derive(Clone)]
pub struct DeliveryService {
    tracker: Arc<StateTracker>,
    log: Arc<dyn DeliveryLogRepository>,
}

impl std::fmt::Debug for DeliveryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryService").finish_non_exhaustive()
    }
}

impl DeliveryService {
    /// Creates a new delivery service.
    pub fn new(tracker: Arc<StateTracker>, log: Arc<dyn DeliveryLogRepository>) -> Self {
        Self { tracker, log }
    }

    /// Deliver unconditionally, used for the initial delivery on creation.
    pub async fn deliver(
        &self,
        alert: &Alert,
        user_id: UserId,
        now: DateTime<Utc>,
        kind: DeliveryKind,
    ) -> AppResult<DeliveryEvent> {
        self.tracker.record_delivery(user_id, alert.id, now).await?;
        self.append(alert, user_id, now, kind).await
    }

    /// Deliver a reminder if the pair is neither snoozed nor too recent.
    ///
    /// The decision and the state update are one atomic step; the log
    /// entry follows only when a delivery was recorded.
    pub async fn remind_if_due(
        &self,
        alert: &Alert,
        user_id: UserId,
        now: DateTime<Utc>,
        interval: Duration,
    ) -> AppResult<ReminderDecision> {
        let decision = self
            .tracker
            .deliver_if_due(user_id, alert.id, now, interval)
            .await?;
        if decision == ReminderDecision::Deliver {
            self.append(alert, user_id, now, DeliveryKind::Reminder)
                .await?;
        }
        Ok(decision)
    }

    /// Delivery events matching the filter, in append order.
    pub async fn list_deliveries(&self, filter: &DeliveryFilter) -> AppResult<Vec<DeliveryEvent>> {
        self.log.list(filter).await
    }

    /// Total number of delivery events.
    pub async fn count(&self) -> AppResult<u64> {
        self.log.count().await
    }

    async fn append(
        &self,
        alert: &Alert,
        user_id: UserId,
        now: DateTime<Utc>,
        kind: DeliveryKind,
    ) -> AppResult<DeliveryEvent> {
        if alert.channel != DeliveryChannel::InApp {
            debug!(
                alert_id = %alert.id,
                channel = %alert.channel,
                "No transport for channel, delivering in-app"
            );
        }
        let event = DeliveryEvent::new(alert.id, user_id, now, alert.channel, kind);
        self.log.append(event.clone()).await?;
        info!(
            alert_id = %alert.id,
            user_id = %user_id,
            kind = ?kind,
            "Delivered alert"
        );
        Ok(event)
    }
}
