//! Alert CRUD: create, update, get, and list.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use alerthub_core::config::ReminderConfig;
use alerthub_core::error::AppError;
use alerthub_core::result::AppResult;
use alerthub_core::types::id::AlertId;
use alerthub_entity::alert::{Alert, AlertDefinition, AlertFilter, AlertPatch};
use alerthub_entity::delivery::DeliveryKind;
use alerthub_store::repositories::AlertRepository;

use crate::delivery::DeliveryService;
use crate::visibility::VisibilityResolver;

/// Manages alert definitions on behalf of admins.
#[derive(Clone)]
pub struct AlertService {
    alerts: Arc<dyn AlertRepository>,
    resolver: Arc<VisibilityResolver>,
    deliveries: Arc<DeliveryService>,
    config: ReminderConfig,
}

impl std::fmt::Debug for AlertService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AlertService {
    /// Creates a new alert service.
    pub fn new(
        alerts: Arc<dyn AlertRepository>,
        resolver: Arc<VisibilityResolver>,
        deliveries: Arc<DeliveryService>,
        config: ReminderConfig,
    ) -> Self {
        Self {
            alerts,
            resolver,
            deliveries,
            config,
        }
    }

    /// Create an alert.
    ///
    /// The definition is validated and its targets must exist; nothing is
    /// stored on failure. When the alert is already active, every current
    /// target receives an initial delivery.
    pub async fn create(&self, def: AlertDefinition, now: DateTime<Utc>) -> AppResult<Alert> {
        def.validate()?;
        self.resolver.validate_scope(&def.visibility).await?;

        let alert = Alert::from_definition(def, now);
        self.alerts.insert(&alert).await?;
        info!(
            alert_id = %alert.id,
            severity = %alert.severity,
            audience = ?alert.visibility.audience(),
            "Alert created"
        );

        if self.config.deliver_on_create && alert.is_active(now) {
            self.deliver_initial(&alert, now).await;
        }
        Ok(alert)
    }

    /// Apply an admin patch. A new scope is validated like on creation.
    ///
    /// The patch is applied to the stored alert in place, so concurrent
    /// patches to different fields are all kept.
    pub async fn update(
        &self,
        id: AlertId,
        patch: AlertPatch,
        now: DateTime<Utc>,
    ) -> AppResult<Alert> {
        if let Some(scope) = &patch.visibility {
            self.resolver.validate_scope(scope).await?;
        }
        let rescoped = patch.changes_visibility();

        let updated = self.alerts.patch(id, patch, now).await?;
        info!(alert_id = %id, rescoped, "Alert updated");
        Ok(updated)
    }

    /// Fetch one alert.
    pub async fn get(&self, id: AlertId) -> AppResult<Alert> {
        self.alerts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Alert {id} not found")))
    }

    /// Alerts matching the filter at `now`, oldest first.
    pub async fn list(&self, filter: &AlertFilter, now: DateTime<Utc>) -> AppResult<Vec<Alert>> {
        Ok(self
            .alerts
            .list()
            .await?
            .into_iter()
            .filter(|a| filter.matches(a, now))
            .collect())
    }

    /// Every alert as currently stored.
    pub async fn snapshot(&self) -> AppResult<Vec<Alert>> {
        self.alerts.list().await
    }

    async fn deliver_initial(&self, alert: &Alert, now: DateTime<Utc>) -> usize {
        let targets = match self.resolver.targets_of(alert, now).await {
            Ok(targets) => targets,
            Err(e) => {
                warn!(alert_id = %alert.id, error = %e, "Initial delivery deferred to next tick");
                return 0;
            }
        };

        let mut delivered = 0;
        for user_id in targets {
            match self
                .deliveries
                .deliver(alert, user_id, now, DeliveryKind::Initial)
                .await
            {
                Ok(_) => delivered += 1,
                Err(e) => {
                    warn!(
                        alert_id = %alert.id,
                        user_id = %user_id,
                        error = %e,
                        "Initial delivery failed"
                    );
                }
            }
        }
        info!(alert_id = %alert.id, delivered, "Initial delivery complete");
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerthub_core::config::AppConfig;
    use alerthub_core::error::ErrorKind;
    use alerthub_core::types::id::{TeamId, UserId};
    use alerthub_entity::alert::{Severity, VisibilityScope};
    use alerthub_entity::delivery::DeliveryFilter;
    use alerthub_entity::directory::User;
    use alerthub_store::MemoryStore;
    use chrono::{Duration, TimeZone};

    use crate::context::ServiceContext;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn context(store: &MemoryStore) -> ServiceContext {
        ServiceContext::new(store, &AppConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_targets_without_storing() {
        let store = MemoryStore::new();
        let ctx = context(&store);

        let def =
            AlertDefinition::new("Team", "").with_visibility(VisibilityScope::Team(TeamId::new()));
        let err = ctx.alerts.create(def, t0()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidVisibilityTarget);

        let def = AlertDefinition::new("Ghost", "")
            .with_visibility(VisibilityScope::users([UserId::new()]));
        let err = ctx.alerts.create(def, t0()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidVisibilityTarget);

        assert!(ctx.alerts.snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_delivers_initial_event_to_targets() {
        let store = MemoryStore::new();
        let ctx = context(&store);
        let alice = store.directory.add_user(User::new("Alice", [])).unwrap();
        store.directory.add_user(User::new("Bob", [])).unwrap();

        let def =
            AlertDefinition::new("Direct", "").with_visibility(VisibilityScope::users([alice.id]));
        let alert = ctx.alerts.create(def, t0()).await.unwrap();

        let events = ctx
            .deliveries
            .list_deliveries(&DeliveryFilter::for_alert(alert.id))
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].user_id, alice.id);
    }

    #[tokio::test]
    async fn test_future_alert_gets_no_initial_delivery() {
        let store = MemoryStore::new();
        let ctx = context(&store);
        store.directory.add_user(User::new("Alice", [])).unwrap();

        let def = AlertDefinition::new("Later", "")
            .with_window(Some(t0() + Duration::hours(1)), None);
        ctx.alerts.create(def, t0()).await.unwrap();
        assert_eq!(ctx.deliveries.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_patches_and_revalidates() {
        let store = MemoryStore::new();
        let ctx = context(&store);
        let alert = ctx
            .alerts
            .create(AlertDefinition::new("Before", ""), t0())
            .await
            .unwrap();

        let updated = ctx
            .alerts
            .update(
                alert.id,
                AlertPatch {
                    title: Some("After".into()),
                    severity: Some(Severity::Critical),
                    ..Default::default()
                },
                t0() + Duration::minutes(1),
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "After");
        assert_eq!(updated.severity, Severity::Critical);
        assert_eq!(ctx.alerts.get(alert.id).await.unwrap().title, "After");

        let err = ctx
            .alerts
            .update(
                alert.id,
                AlertPatch {
                    visibility: Some(VisibilityScope::Team(TeamId::new())),
                    ..Default::default()
                },
                t0(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidVisibilityTarget);
    }

    #[tokio::test]
    async fn test_get_unknown_alert_is_not_found() {
        let store = MemoryStore::new();
        let err = context(&store).alerts.get(AlertId::new()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_filters_by_severity_and_activity() {
        let store = MemoryStore::new();
        let ctx = context(&store);
        ctx.alerts
            .create(AlertDefinition::new("Info", ""), t0())
            .await
            .unwrap();
        ctx.alerts
            .create(
                AlertDefinition::new("Crit", "")
                    .with_severity(Severity::Critical)
                    .with_window(None, Some(t0() + Duration::hours(1))),
                t0(),
            )
            .await
            .unwrap();

        let critical = AlertFilter {
            severity: Some(Severity::Critical),
            ..Default::default()
        };
        assert_eq!(ctx.alerts.list(&critical, t0()).await.unwrap().len(), 1);

        let active = ctx
            .alerts
            .list(&AlertFilter::active_only(), t0() + Duration::hours(2))
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, "Info");
    }
}
