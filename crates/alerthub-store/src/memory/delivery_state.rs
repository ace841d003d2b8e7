//! In-memory delivery state repository.
//!
//! Each (user, alert) pair lives in its own `DashMap` entry, so the entry
//! guard is the per-pair lock: a read-modify-write holds it from lookup
//! to store and two operations on different pairs never contend.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use alerthub_core::error::AppError;
use alerthub_core::result::AppResult;
use alerthub_core::types::id::{AlertId, UserId};
use alerthub_entity::delivery::{DeliveryState, ReminderDecision, StateChange};

use crate::repositories::DeliveryStateRepository;

type PairKey = (UserId, AlertId);

/// Delivery states keyed by (user, alert).
#[derive(Debug, Default)]
pub struct MemoryDeliveryStateRepository {
    states: DashMap<PairKey, DeliveryState>,
}

impl MemoryDeliveryStateRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_where(&self, keep: impl Fn(&PairKey) -> bool) -> Vec<DeliveryState> {
        let mut states: Vec<DeliveryState> = self
            .states
            .iter()
            .filter(|entry| keep(entry.key()))
            .map(|entry| entry.value().clone())
            .collect();
        states.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then(a.user_id.cmp(&b.user_id))
                .then(a.alert_id.cmp(&b.alert_id))
        });
        states
    }
}

#[async_trait]
impl DeliveryStateRepository for MemoryDeliveryStateRepository {
    async fn find(&self, user_id: UserId, alert_id: AlertId) -> AppResult<Option<DeliveryState>> {
        Ok(self
            .states
            .get(&(user_id, alert_id))
            .map(|s| s.value().clone()))
    }

    async fn get_or_create(
        &self,
        user_id: UserId,
        alert_id: AlertId,
        now: DateTime<Utc>,
    ) -> AppResult<DeliveryState> {
        let state = self
            .states
            .entry((user_id, alert_id))
            .or_insert_with(|| DeliveryState::new(user_id, alert_id, now));
        Ok(state.value().clone())
    }

    async fn modify(
        &self,
        user_id: UserId,
        alert_id: AlertId,
        change: StateChange,
    ) -> AppResult<DeliveryState> {
        let mut state = self.states.get_mut(&(user_id, alert_id)).ok_or_else(|| {
            AppError::not_found(format!(
                "No delivery state for user {user_id} and alert {alert_id}"
            ))
        })?;
        state.apply(change);
        Ok(state.clone())
    }

    async fn modify_or_create(
        &self,
        user_id: UserId,
        alert_id: AlertId,
        now: DateTime<Utc>,
        change: StateChange,
    ) -> AppResult<DeliveryState> {
        let mut state = self
            .states
            .entry((user_id, alert_id))
            .or_insert_with(|| DeliveryState::new(user_id, alert_id, now));
        state.apply(change);
        Ok(state.clone())
    }

    async fn deliver_if_due(
        &self,
        user_id: UserId,
        alert_id: AlertId,
        now: DateTime<Utc>,
        interval: Duration,
    ) -> AppResult<(ReminderDecision, DeliveryState)> {
        let mut state = self
            .states
            .entry((user_id, alert_id))
            .or_insert_with(|| DeliveryState::new(user_id, alert_id, now));
        let decision = state.deliver_if_due(now, interval);
        Ok((decision, state.clone()))
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<DeliveryState>> {
        Ok(self.collect_where(|(user, _)| *user == user_id))
    }

    async fn list_for_alert(&self, alert_id: AlertId) -> AppResult<Vec<DeliveryState>> {
        Ok(self.collect_where(|(_, alert)| *alert == alert_id))
    }

    async fn list_all(&self) -> AppResult<Vec<DeliveryState>> {
        Ok(self.collect_where(|_| true))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use alerthub_core::error::ErrorKind;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_modify_requires_existing_pair() {
        let repo = MemoryDeliveryStateRepository::new();
        let err = repo
            .modify(UserId::new(), AlertId::new(), StateChange::MarkUnread)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_modify_or_create_creates_once() {
        let repo = MemoryDeliveryStateRepository::new();
        let (user, alert) = (UserId::new(), AlertId::new());
        let until = t0() + Duration::hours(4);

        let state = repo
            .modify_or_create(user, alert, t0(), StateChange::SnoozeUntil { until })
            .await
            .unwrap();
        assert_eq!(state.snoozed_until, Some(until));

        repo.modify(user, alert, StateChange::MarkRead { at: t0() })
            .await
            .unwrap();
        let stored = repo.find(user, alert).await.unwrap().unwrap();
        assert!(stored.is_read());
        assert_eq!(stored.snoozed_until, Some(until));
        assert_eq!(repo.list_for_user(user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_deliver_if_due_records_once() {
        let repo = Arc::new(MemoryDeliveryStateRepository::new());
        let (user, alert) = (UserId::new(), AlertId::new());

        let tasks = (0..16).map(|_| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                repo.deliver_if_due(user, alert, t0(), Duration::hours(2))
                    .await
                    .unwrap()
                    .0
            })
        });
        let decisions = futures::future::join_all(tasks).await;

        let delivered = decisions
            .into_iter()
            .map(|d| d.unwrap())
            .filter(|d| *d == ReminderDecision::Deliver)
            .count();
        assert_eq!(delivered, 1);
        let state = repo.find(user, alert).await.unwrap().unwrap();
        assert_eq!(state.delivery_count, 1);
    }

    #[tokio::test]
    async fn test_list_for_alert_filters_by_alert() {
        let repo = MemoryDeliveryStateRepository::new();
        let alert = AlertId::new();
        repo.get_or_create(UserId::new(), alert, t0()).await.unwrap();
        repo.get_or_create(UserId::new(), alert, t0()).await.unwrap();
        repo.get_or_create(UserId::new(), AlertId::new(), t0())
            .await
            .unwrap();

        assert_eq!(repo.list_for_alert(alert).await.unwrap().len(), 2);
        assert_eq!(repo.list_all().await.unwrap().len(), 3);
    }
}
