//! The reminder tick.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;

use alerthub_core::config::ReminderConfig;
use alerthub_core::result::AppResult;
use alerthub_entity::alert::Alert;
use alerthub_entity::delivery::ReminderDecision;
use alerthub_service::{AlertService, DeliveryService, ServiceContext, VisibilityResolver};

use crate::report::{TickFailure, TickReport};

/// Decides, on every tick, which (user, alert) pairs get a reminder.
///
/// A tick works on a snapshot of the alert store taken when it starts.
/// Each pair is decided and recorded atomically, so overlapping ticks and
/// concurrent snoozes never produce a second delivery inside one interval.
#[derive(Clone)]
pub struct ReminderScheduler {
    alerts: Arc<AlertService>,
    resolver: Arc<VisibilityResolver>,
    deliveries: Arc<DeliveryService>,
    default_interval: Duration,
}

impl std::fmt::Debug for ReminderScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReminderScheduler")
            .field("default_interval", &self.default_interval)
            .finish_non_exhaustive()
    }
}

impl ReminderScheduler {
    /// Create a scheduler over the given services.
    pub fn new(ctx: &ServiceContext, config: &ReminderConfig) -> Self {
        let default_interval = i64::try_from(config.default_interval_minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .unwrap_or(Duration::MAX);
        Self {
            alerts: Arc::clone(&ctx.alerts),
            resolver: Arc::clone(&ctx.resolver),
            deliveries: Arc::clone(&ctx.deliveries),
            default_interval,
        }
    }

    /// The interval used by alerts without an override.
    pub fn default_interval(&self) -> Duration {
        self.default_interval
    }

    /// Run one tick at `now` to completion.
    pub async fn tick(&self, now: DateTime<Utc>) -> AppResult<TickReport> {
        let (_tx, cancel) = watch::channel(false);
        self.tick_until_cancelled(now, &cancel).await
    }

    /// Run one tick at `now`, stopping between pairs once `cancel` is set.
    ///
    /// Only a failure to snapshot the alert store fails the tick. Every
    /// other error is recorded in the report and the tick moves on.
    pub async fn tick_until_cancelled(
        &self,
        now: DateTime<Utc>,
        cancel: &watch::Receiver<bool>,
    ) -> AppResult<TickReport> {
        let snapshot = self.alerts.snapshot().await?;
        let mut report = TickReport::new(now);
        report.alerts_evaluated = snapshot.len() as u64;

        tracing::debug!(alerts = snapshot.len(), %now, "Reminder tick started");

        for alert in &snapshot {
            if *cancel.borrow() {
                report.cancelled = true;
                break;
            }
            self.process_alert(alert, now, cancel, &mut report).await;
            if report.cancelled {
                break;
            }
        }

        Ok(report)
    }

    async fn process_alert(
        &self,
        alert: &Alert,
        now: DateTime<Utc>,
        cancel: &watch::Receiver<bool>,
        report: &mut TickReport,
    ) {
        if !alert.is_active(now) {
            report.skipped_inactive += 1;
            return;
        }
        if !alert.reminder_enabled {
            report.skipped_disabled += 1;
            return;
        }

        let targets = match self.resolver.targets_of(alert, now).await {
            Ok(targets) => targets,
            Err(e) => {
                tracing::warn!(
                    alert_id = %alert.id,
                    error = %e,
                    transient = e.is_transient(),
                    "Skipping alert for this tick"
                );
                report.failures.push(TickFailure::new(alert.id, None, &e));
                return;
            }
        };
        if targets.is_empty() {
            report.skipped_no_audience += 1;
            return;
        }

        let interval = alert.reminder_interval(self.default_interval);
        for user_id in targets {
            if *cancel.borrow() {
                report.cancelled = true;
                return;
            }
            match self
                .deliveries
                .remind_if_due(alert, user_id, now, interval)
                .await
            {
                Ok(ReminderDecision::Deliver) => report.deliveries_sent += 1,
                Ok(ReminderDecision::Suppressed) => report.skipped_snoozed += 1,
                Ok(ReminderDecision::TooSoon) => report.skipped_too_soon += 1,
                Err(e) => {
                    tracing::error!(
                        alert_id = %alert.id,
                        user_id = %user_id,
                        error = %e,
                        "Reminder delivery failed"
                    );
                    report
                        .failures
                        .push(TickFailure::new(alert.id, Some(user_id), &e));
                }
            }
        }
    }
}
