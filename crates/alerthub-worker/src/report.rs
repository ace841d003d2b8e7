//! Tick summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use alerthub_core::error::{AppError, ErrorKind};
use alerthub_core::types::id::{AlertId, UserId};

/// Something that went wrong for one alert (or one pair) during a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickFailure {
    /// The alert being processed.
    pub alert_id: AlertId,
    /// The user being processed, when the failure was per pair.
    pub user_id: Option<UserId>,
    /// Error category.
    pub kind: ErrorKind,
    /// Error message.
    pub message: String,
}

impl TickFailure {
    /// Record a failure.
    pub fn new(alert_id: AlertId, user_id: Option<UserId>, error: &AppError) -> Self {
        Self {
            alert_id,
            user_id,
            kind: error.kind,
            message: error.message.clone(),
        }
    }

    /// Whether the next tick may succeed where this one failed.
    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

/// Summary of one reminder tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// The instant the tick evaluated.
    pub timestamp: DateTime<Utc>,
    /// Alerts in the snapshot the tick worked on.
    pub alerts_evaluated: u64,
    /// Reminder events appended to the log.
    pub deliveries_sent: u64,
    /// Pairs inside a snooze window.
    pub skipped_snoozed: u64,
    /// Pairs delivered more recently than the interval.
    pub skipped_too_soon: u64,
    /// Alerts outside their window or archived.
    pub skipped_inactive: u64,
    /// Active alerts with reminders turned off.
    pub skipped_disabled: u64,
    /// Active alerts that currently target nobody.
    pub skipped_no_audience: u64,
    /// Per-alert and per-pair failures; processing went on past each.
    pub failures: Vec<TickFailure>,
    /// Whether shutdown interrupted the tick.
    pub cancelled: bool,
}

impl TickReport {
    /// An empty report for a tick at `timestamp`.
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            alerts_evaluated: 0,
            deliveries_sent: 0,
            skipped_snoozed: 0,
            skipped_too_soon: 0,
            skipped_inactive: 0,
            skipped_disabled: 0,
            skipped_no_audience: 0,
            failures: Vec::new(),
            cancelled: false,
        }
    }

    /// Whether every alert was processed without error.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }

    /// Emit the report as a structured log line.
    pub fn log(&self) {
        if self.failures.is_empty() {
            tracing::info!(
                timestamp = %self.timestamp,
                sent = self.deliveries_sent,
                snoozed = self.skipped_snoozed,
                too_soon = self.skipped_too_soon,
                inactive = self.skipped_inactive,
                disabled = self.skipped_disabled,
                no_audience = self.skipped_no_audience,
                cancelled = self.cancelled,
                "Reminder tick complete"
            );
        } else {
            tracing::warn!(
                timestamp = %self.timestamp,
                sent = self.deliveries_sent,
                failures = self.failures.len(),
                cancelled = self.cancelled,
                "Reminder tick completed with failures"
            );
        }
    }
}
