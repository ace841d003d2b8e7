//! Delivery log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use alerthub_core::types::id::{AlertId, DeliveryEventId, UserId};

use crate::alert::DeliveryChannel;

/// Why a delivery happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryKind {
    /// Sent when the alert was created.
    Initial,
    /// Sent by a reminder tick.
    Reminder,
}

/// An immutable record that an alert reached a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEvent {
    /// Unique entry identifier.
    pub id: DeliveryEventId,
    /// The alert delivered.
    pub alert_id: AlertId,
    /// The recipient.
    pub user_id: UserId,
    /// When it was delivered.
    pub delivered_at: DateTime<Utc>,
    /// Channel the alert requested.
    pub channel: DeliveryChannel,
    /// Initial delivery or reminder.
    pub kind: DeliveryKind,
}

impl DeliveryEvent {
    /// Create a new log entry.
    pub fn new(
        alert_id: AlertId,
        user_id: UserId,
        delivered_at: DateTime<Utc>,
        channel: DeliveryChannel,
        kind: DeliveryKind,
    ) -> Self {
        Self {
            id: DeliveryEventId::new(),
            alert_id,
            user_id,
            delivered_at,
            channel,
            kind,
        }
    }
}

/// Criteria for listing delivery log entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryFilter {
    /// Only entries for this alert.
    #[serde(default)]
    pub alert_id: Option<AlertId>,
    /// Only entries for this user.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Only entries delivered at or after this instant.
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,
}

impl DeliveryFilter {
    /// Entries of one alert.
    pub fn for_alert(alert_id: AlertId) -> Self {
        Self {
            alert_id: Some(alert_id),
            ..Self::default()
        }
    }

    /// Entries of one user.
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    /// Whether `event` passes every criterion.
    pub fn matches(&self, event: &DeliveryEvent) -> bool {
        self.alert_id.is_none_or(|id| id == event.alert_id)
            && self.user_id.is_none_or(|id| id == event.user_id)
            && self.since.is_none_or(|since| event.delivered_at >= since)
    }
}
