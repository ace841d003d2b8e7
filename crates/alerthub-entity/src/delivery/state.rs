//! Per-(user, alert) delivery state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use alerthub_core::types::id::{AlertId, UserId};

/// Read axis of a delivery state. Independent of snoozing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReadStatus {
    /// Not yet acknowledged.
    #[default]
    Unread,
    /// Acknowledged by the user.
    Read,
}

/// Outcome of evaluating a pair on a reminder tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderDecision {
    /// A delivery was (or should be) recorded.
    Deliver,
    /// The pair is inside a snooze window.
    Suppressed,
    /// The last delivery is more recent than the reminder interval.
    TooSoon,
}

/// A single atomic change to a delivery state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum StateChange {
    /// Mark the alert read at the given instant.
    MarkRead {
        /// When the user read it.
        at: DateTime<Utc>,
    },
    /// Mark the alert unread.
    MarkUnread,
    /// Suppress reminders until the given instant.
    SnoozeUntil {
        /// Exclusive end of the snooze.
        until: DateTime<Utc>,
    },
    /// Record a delivery at the given instant.
    RecordDelivery {
        /// When the delivery happened.
        at: DateTime<Utc>,
    },
}

/// Mutable state one user holds about one alert.
///
/// The read status and the snooze window are independent axes: marking
/// read or unread never touches `snoozed_until`, and an expired snooze
/// simply stops counting without being cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryState {
    /// The user.
    pub user_id: UserId,
    /// The alert.
    pub alert_id: AlertId,
    /// Read or unread.
    pub status: ReadStatus,
    /// Reminders are suppressed while this lies in the future.
    pub snoozed_until: Option<DateTime<Utc>>,
    /// Most recent delivery to this user.
    pub last_delivered_at: Option<DateTime<Utc>>,
    /// When the user last marked the alert read.
    pub last_read_at: Option<DateTime<Utc>>,
    /// Number of deliveries recorded for this pair.
    pub delivery_count: u64,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl DeliveryState {
    /// A fresh unread, unsnoozed, never-delivered state.
    pub fn new(user_id: UserId, alert_id: AlertId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            alert_id,
            status: ReadStatus::Unread,
            snoozed_until: None,
            last_delivered_at: None,
            last_read_at: None,
            delivery_count: 0,
            created_at: now,
        }
    }

    /// Whether the user has read the alert.
    pub fn is_read(&self) -> bool {
        self.status == ReadStatus::Read
    }

    /// Mark read. Re-marking an already read state keeps its read time.
    pub fn mark_read(&mut self, now: DateTime<Utc>) {
        if self.status == ReadStatus::Read {
            return;
        }
        self.status = ReadStatus::Read;
        self.last_read_at = Some(now);
    }

    /// Mark unread.
    pub fn mark_unread(&mut self) {
        self.status = ReadStatus::Unread;
        self.last_read_at = None;
    }

    /// Suppress reminders until `until`, replacing any earlier snooze.
    pub fn snooze_until(&mut self, until: DateTime<Utc>) {
        self.snoozed_until = Some(until);
    }

    /// Record a delivery at `now`.
    pub fn record_delivery(&mut self, now: DateTime<Utc>) {
        self.last_delivered_at = Some(now);
        self.delivery_count += 1;
    }

    /// Apply one change.
    pub fn apply(&mut self, change: StateChange) {
        match change {
            StateChange::MarkRead { at } => self.mark_read(at),
            StateChange::MarkUnread => self.mark_unread(),
            StateChange::SnoozeUntil { until } => self.snooze_until(until),
            StateChange::RecordDelivery { at } => self.record_delivery(at),
        }
    }

    /// Whether a snooze window contains `now`. Expired snoozes lapse lazily.
    pub fn is_suppressed(&self, now: DateTime<Utc>) -> bool {
        self.snoozed_until.is_some_and(|until| until > now)
    }

    /// What a tick at `now` should do with this pair.
    pub fn reminder_decision(&self, now: DateTime<Utc>, interval: Duration) -> ReminderDecision {
        if self.is_suppressed(now) {
            return ReminderDecision::Suppressed;
        }
        match self.last_delivered_at {
            None => ReminderDecision::Deliver,
            Some(last) if now - last >= interval => ReminderDecision::Deliver,
            Some(_) => ReminderDecision::TooSoon,
        }
    }

    /// Evaluate and, when due, record the delivery in the same step.
    pub fn deliver_if_due(&mut self, now: DateTime<Utc>, interval: Duration) -> ReminderDecision {
        let decision = self.reminder_decision(now, interval);
        if decision == ReminderDecision::Deliver {
            self.record_delivery(now);
        }
        decision
    }
}
