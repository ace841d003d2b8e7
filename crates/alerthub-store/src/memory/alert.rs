//! In-memory alert repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use alerthub_core::error::AppError;
use alerthub_core::result::AppResult;
use alerthub_core::types::id::AlertId;
use alerthub_entity::alert::{Alert, AlertPatch};

use crate::repositories::AlertRepository;

/// Alert storage keyed by [`AlertId`].
#[derive(Debug, Default)]
pub struct MemoryAlertRepository {
    alerts: DashMap<AlertId, Alert>,
}

impl MemoryAlertRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AlertRepository for MemoryAlertRepository {
    async fn insert(&self, alert: &Alert) -> AppResult<()> {
        match self.alerts.entry(alert.id) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Alert {} already exists",
                alert.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(alert.clone());
                debug!(alert_id = %alert.id, "Stored alert");
                Ok(())
            }
        }
    }

    async fn find_by_id(&self, id: AlertId) -> AppResult<Option<Alert>> {
        Ok(self.alerts.get(&id).map(|a| a.value().clone()))
    }

    async fn patch(
        &self,
        id: AlertId,
        patch: AlertPatch,
        now: DateTime<Utc>,
    ) -> AppResult<Alert> {
        let mut existing = self
            .alerts
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Alert {id} not found")))?;
        let mut updated = existing.clone();
        updated.apply_patch(patch, now);
        updated.validate()?;
        *existing = updated.clone();
        debug!(alert_id = %id, "Patched alert");
        Ok(updated)
    }

    async fn list(&self) -> AppResult<Vec<Alert>> {
        let mut alerts: Vec<Alert> = self.alerts.iter().map(|a| a.value().clone()).collect();
        alerts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(alerts)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.alerts.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use alerthub_core::error::ErrorKind;
    use alerthub_entity::alert::{AlertDefinition, Severity};
    use chrono::{Duration, TimeZone};

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id() {
        let repo = MemoryAlertRepository::new();
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let alert = Alert::from_definition(AlertDefinition::new("a", "b"), now);

        repo.insert(&alert).await.unwrap();
        let err = repo.insert(&alert).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_patch_unknown_alert_is_not_found() {
        let repo = MemoryAlertRepository::new();
        let err = repo
            .patch(AlertId::new(), AlertPatch::default(), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_invalid_patch_leaves_alert_untouched() {
        let repo = MemoryAlertRepository::new();
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let alert = Alert::from_definition(AlertDefinition::new("a", "b"), now);
        repo.insert(&alert).await.unwrap();

        let err = repo
            .patch(
                alert.id,
                AlertPatch {
                    title: Some("  ".into()),
                    ..Default::default()
                },
                now,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(repo.find_by_id(alert.id).await.unwrap().unwrap(), alert);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_patches_keep_every_field() {
        let repo = Arc::new(MemoryAlertRepository::new());
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let alert = Alert::from_definition(AlertDefinition::new("a", "b"), now);
        repo.insert(&alert).await.unwrap();
        let id = alert.id;

        let tasks = (0..32).map(|i| {
            let repo = Arc::clone(&repo);
            let patch = if i % 2 == 0 {
                AlertPatch {
                    title: Some("Renamed".into()),
                    ..Default::default()
                }
            } else {
                AlertPatch {
                    severity: Some(Severity::Critical),
                    ..Default::default()
                }
            };
            tokio::spawn(async move { repo.patch(id, patch, now).await.unwrap() })
        });
        for outcome in futures::future::join_all(tasks).await {
            outcome.unwrap();
        }

        let stored = repo.find_by_id(alert.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Renamed");
        assert_eq!(stored.severity, Severity::Critical);
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_creation() {
        let repo = MemoryAlertRepository::new();
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let later =
            Alert::from_definition(AlertDefinition::new("later", ""), now + Duration::hours(1));
        let earlier = Alert::from_definition(AlertDefinition::new("earlier", ""), now);
        repo.insert(&later).await.unwrap();
        repo.insert(&earlier).await.unwrap();

        let titles: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["earlier", "later"]);
    }
}
