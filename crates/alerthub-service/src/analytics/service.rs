//! Delivery and engagement metrics.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use alerthub_core::result::AppResult;
use alerthub_core::types::id::AlertId;
use alerthub_entity::alert::Severity;
use alerthub_entity::delivery::DeliveryFilter;
use alerthub_store::repositories::{
    AlertRepository, DeliveryLogRepository, DeliveryStateRepository,
};

/// Computes metrics from the alert store, delivery states, and the log.
#[derive(Clone)]
pub struct AnalyticsService {
    alerts: Arc<dyn AlertRepository>,
    states: Arc<dyn DeliveryStateRepository>,
    log: Arc<dyn DeliveryLogRepository>,
}

impl std::fmt::Debug for AnalyticsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsService").finish_non_exhaustive()
    }
}

/// Metrics for one alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMetrics {
    /// The alert.
    pub alert_id: AlertId,
    /// Alert headline.
    pub title: String,
    /// Alert severity.
    pub severity: Severity,
    /// Delivery events logged for the alert.
    pub delivered: u64,
    /// Users holding a read state.
    pub read: u64,
    /// Users snoozed at generation time.
    pub snoozed: u64,
}

/// A point-in-time metrics snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    /// When the snapshot was taken.
    pub generated_at: DateTime<Utc>,
    /// Alerts ever created.
    pub total_alerts: u64,
    /// Alerts active at generation time.
    pub active_alerts: u64,
    /// Delivery events ever logged.
    pub total_deliveries: u64,
    /// (user, alert) states in the read status.
    pub total_read: u64,
    /// Per-alert breakdown, oldest alert first.
    pub per_alert: Vec<AlertMetrics>,
    /// Alert count per severity; every severity is present.
    pub severity_breakdown: BTreeMap<Severity, u64>,
}

impl Metrics {
    /// Pretty-printed JSON rendering.
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl AnalyticsService {
    /// Creates a new analytics service.
    pub fn new(
        alerts: Arc<dyn AlertRepository>,
        states: Arc<dyn DeliveryStateRepository>,
        log: Arc<dyn DeliveryLogRepository>,
    ) -> Self {
        Self {
            alerts,
            states,
            log,
        }
    }

    /// Compute metrics as of `now`.
    pub async fn metrics(&self, now: DateTime<Utc>) -> AppResult<Metrics> {
        let alerts = self.alerts.list().await?;
        let states = self.states.list_all().await?;
        let events = self.log.list(&DeliveryFilter::default()).await?;

        let mut delivered: HashMap<AlertId, u64> = HashMap::new();
        for event in &events {
            *delivered.entry(event.alert_id).or_default() += 1;
        }

        let mut read: HashMap<AlertId, u64> = HashMap::new();
        let mut snoozed: HashMap<AlertId, u64> = HashMap::new();
        for state in &states {
            if state.is_read() {
                *read.entry(state.alert_id).or_default() += 1;
            }
            if state.is_suppressed(now) {
                *snoozed.entry(state.alert_id).or_default() += 1;
            }
        }

        let mut severity_breakdown: BTreeMap<Severity, u64> =
            Severity::ALL.iter().map(|s| (*s, 0)).collect();
        for alert in &alerts {
            *severity_breakdown.entry(alert.severity).or_default() += 1;
        }

        let per_alert = alerts
            .iter()
            .map(|a| AlertMetrics {
                alert_id: a.id,
                title: a.title.clone(),
                severity: a.severity,
                delivered: delivered.get(&a.id).copied().unwrap_or(0),
                read: read.get(&a.id).copied().unwrap_or(0),
                snoozed: snoozed.get(&a.id).copied().unwrap_or(0),
            })
            .collect();

        Ok(Metrics {
            generated_at: now,
            total_alerts: alerts.len() as u64,
            active_alerts: alerts.iter().filter(|a| a.is_active(now)).count() as u64,
            total_deliveries: events.len() as u64,
            total_read: states.iter().filter(|s| s.is_read()).count() as u64,
            per_alert,
            severity_breakdown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerthub_core::types::id::UserId;
    use alerthub_entity::alert::{Alert, AlertDefinition, DeliveryChannel};
    use alerthub_entity::delivery::{DeliveryEvent, DeliveryKind, StateChange};
    use alerthub_store::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn service(store: &MemoryStore) -> AnalyticsService {
        AnalyticsService::new(store.alerts.clone(), store.states.clone(), store.log.clone())
    }

    #[tokio::test]
    async fn test_empty_store_has_zero_filled_severities() {
        let store = MemoryStore::new();
        let metrics = service(&store).metrics(t0()).await.unwrap();
        assert_eq!(metrics.total_alerts, 0);
        assert_eq!(metrics.severity_breakdown.len(), Severity::ALL.len());
        assert!(metrics.severity_breakdown.values().all(|n| *n == 0));
    }

    #[tokio::test]
    async fn test_counts_deliveries_reads_and_snoozes() {
        let store = MemoryStore::new();
        let alert = Alert::from_definition(
            AlertDefinition::new("Disk", "").with_severity(Severity::Critical),
            t0(),
        );
        store.alerts.insert(&alert).await.unwrap();
        let (alice, bob) = (UserId::new(), UserId::new());

        for user in [alice, bob] {
            store
                .log
                .append(DeliveryEvent::new(
                    alert.id,
                    user,
                    t0(),
                    DeliveryChannel::InApp,
                    DeliveryKind::Initial,
                ))
                .await
                .unwrap();
            store
                .states
                .modify_or_create(user, alert.id, t0(), StateChange::RecordDelivery { at: t0() })
                .await
                .unwrap();
        }
        store
            .states
            .modify(alice, alert.id, StateChange::MarkRead { at: t0() })
            .await
            .unwrap();
        store
            .states
            .modify(bob, alert.id, StateChange::SnoozeUntil { until: t0() + Duration::hours(1) })
            .await
            .unwrap();

        let metrics = service(&store).metrics(t0()).await.unwrap();
        assert_eq!(metrics.total_deliveries, 2);
        assert_eq!(metrics.total_read, 1);
        assert_eq!(metrics.severity_breakdown[&Severity::Critical], 1);
        assert_eq!(
            metrics.per_alert,
            vec![AlertMetrics {
                alert_id: alert.id,
                title: "Disk".to_string(),
                severity: Severity::Critical,
                delivered: 2,
                read: 1,
                snoozed: 1,
            }]
        );

        let later = service(&store)
            .metrics(t0() + Duration::hours(2))
            .await
            .unwrap();
        assert_eq!(later.per_alert[0].snoozed, 0);
        assert!(later.to_json().unwrap().contains("\"total_alerts\": 1"));
    }
}
