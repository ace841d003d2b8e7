//! What a user sees and what a user can do to an alert.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use alerthub_core::error::AppError;
use alerthub_core::result::AppResult;
use alerthub_core::traits::Directory;
use alerthub_core::types::id::{AlertId, UserId};
use alerthub_entity::alert::Alert;
use alerthub_entity::delivery::DeliveryState;
use alerthub_store::repositories::AlertRepository;

use crate::state::StateTracker;
use crate::visibility::VisibilityResolver;

/// Options for listing a user's alerts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UserAlertQuery {
    /// Leave out alerts the user has snoozed for today. Snoozed alerts
    /// are returned by default.
    #[serde(default)]
    pub hide_snoozed: bool,
}

/// One visible alert and the user's state for it, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAlert {
    /// The alert.
    pub alert: Alert,
    /// `None` until the alert is delivered to or snoozed by the user.
    pub state: Option<DeliveryState>,
}

/// Serves the user-facing side: listing and read/unread/snooze.
#[derive(Clone)]
pub struct UserAlertService {
    alerts: Arc<dyn AlertRepository>,
    directory: Arc<dyn Directory>,
    resolver: Arc<VisibilityResolver>,
    tracker: Arc<StateTracker>,
}

impl std::fmt::Debug for UserAlertService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAlertService").finish_non_exhaustive()
    }
}

impl UserAlertService {
    /// Creates a new user alert service.
    pub fn new(
        alerts: Arc<dyn AlertRepository>,
        directory: Arc<dyn Directory>,
        resolver: Arc<VisibilityResolver>,
        tracker: Arc<StateTracker>,
    ) -> Self {
        Self {
            alerts,
            directory,
            resolver,
            tracker,
        }
    }

    /// Alerts visible to the user at `now`, with their states.
    ///
    /// Viewing never creates a state. Snoozing only silences reminders, so
    /// snoozed alerts are listed unless the query hides them.
    pub async fn get_user_alerts(
        &self,
        user_id: UserId,
        query: UserAlertQuery,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<UserAlert>> {
        self.ensure_user(user_id).await?;

        let mut visible = Vec::new();
        for alert in self.resolver.visible_alerts(user_id, now).await? {
            let state = self.tracker.find(user_id, alert.id).await?;
            let snoozed = state
                .as_ref()
                .is_some_and(|s| StateTracker::suppressed(s, now));
            if snoozed && query.hide_snoozed {
                debug!(user_id = %user_id, alert_id = %alert.id, "Hiding snoozed alert");
                continue;
            }
            visible.push(UserAlert { alert, state });
        }
        Ok(visible)
    }

    /// Every state record the user holds, including ones for alerts that
    /// no longer target them.
    pub async fn get_user_states(&self, user_id: UserId) -> AppResult<Vec<DeliveryState>> {
        self.tracker.list_for_user(user_id).await
    }

    /// Mark an alert read. The pair must already have a state.
    pub async fn mark_read(
        &self,
        user_id: UserId,
        alert_id: AlertId,
        now: DateTime<Utc>,
    ) -> AppResult<DeliveryState> {
        self.tracker.mark_read(user_id, alert_id, now).await
    }

    /// Mark an alert unread. The pair must already have a state.
    pub async fn mark_unread(
        &self,
        user_id: UserId,
        alert_id: AlertId,
    ) -> AppResult<DeliveryState> {
        self.tracker.mark_unread(user_id, alert_id).await
    }

    /// Snooze an alert for the rest of the day.
    ///
    /// An existing state is always snoozable. Without one, the alert must
    /// currently target the user; the state is then created.
    pub async fn snooze(
        &self,
        user_id: UserId,
        alert_id: AlertId,
        now: DateTime<Utc>,
    ) -> AppResult<DeliveryState> {
        if self.tracker.find(user_id, alert_id).await?.is_none() {
            let alert = self
                .alerts
                .find_by_id(alert_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Alert {alert_id} not found")))?;
            if !self.resolver.is_target(&alert, user_id, now).await? {
                return Err(AppError::not_found(format!(
                    "Alert {alert_id} is not visible to user {user_id}"
                )));
            }
        }
        self.tracker.snooze(user_id, alert_id, now).await
    }

    async fn ensure_user(&self, user_id: UserId) -> AppResult<()> {
        if self.directory.user_exists(user_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(format!("User {user_id} not found")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerthub_core::config::AppConfig;
    use alerthub_core::error::ErrorKind;
    use alerthub_entity::alert::{AlertDefinition, VisibilityScope};
    use alerthub_entity::delivery::ReadStatus;
    use alerthub_entity::directory::{Team, User};
    use alerthub_store::MemoryStore;
    use chrono::{Duration, TimeZone};

    use crate::context::ServiceContext;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn quiet_context(store: &MemoryStore) -> ServiceContext {
        let mut config = AppConfig::default();
        config.reminders.deliver_on_create = false;
        ServiceContext::new(store, &config).unwrap()
    }

    #[tokio::test]
    async fn test_viewing_creates_no_state() {
        let store = MemoryStore::new();
        let ctx = quiet_context(&store);
        let alice = store.directory.add_user(User::new("Alice", [])).unwrap();
        ctx.alerts
            .create(AlertDefinition::new("All", ""), t0())
            .await
            .unwrap();

        let visible = ctx
            .user_alerts
            .get_user_alerts(alice.id, UserAlertQuery::default(), t0())
            .await
            .unwrap();
        assert_eq!(visible.len(), 1);
        assert!(visible[0].state.is_none());
        assert!(ctx.user_alerts.get_user_states(alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let store = MemoryStore::new();
        let ctx = quiet_context(&store);
        let err = ctx
            .user_alerts
            .get_user_alerts(UserId::new(), UserAlertQuery::default(), t0())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_snoozed_alert_stays_retrievable() {
        let store = MemoryStore::new();
        let ctx = quiet_context(&store);
        let alice = store.directory.add_user(User::new("Alice", [])).unwrap();
        let alert = ctx
            .alerts
            .create(AlertDefinition::new("All", ""), t0())
            .await
            .unwrap();

        ctx.user_alerts.snooze(alice.id, alert.id, t0()).await.unwrap();

        let listed = ctx
            .user_alerts
            .get_user_alerts(alice.id, UserAlertQuery::default(), t0())
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].state.as_ref().unwrap().is_suppressed(t0()));

        let hidden = ctx
            .user_alerts
            .get_user_alerts(alice.id, UserAlertQuery { hide_snoozed: true }, t0())
            .await
            .unwrap();
        assert!(hidden.is_empty());

        let next_day = ctx
            .user_alerts
            .get_user_alerts(
                alice.id,
                UserAlertQuery { hide_snoozed: true },
                t0() + Duration::days(1),
            )
            .await
            .unwrap();
        assert_eq!(next_day.len(), 1);
    }

    #[tokio::test]
    async fn test_snooze_requires_visibility_when_no_state() {
        let store = MemoryStore::new();
        let ctx = quiet_context(&store);
        let eng = store.directory.add_team(Team::new("Engineering"));
        let bob = store.directory.add_user(User::new("Bob", [])).unwrap();
        let alert = ctx
            .alerts
            .create(
                AlertDefinition::new("Eng", "").with_visibility(VisibilityScope::Team(eng.id)),
                t0(),
            )
            .await
            .unwrap();

        let err = ctx.user_alerts.snooze(bob.id, alert.id, t0()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = ctx
            .user_alerts
            .snooze(bob.id, AlertId::new(), t0())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(ctx.user_alerts.get_user_states(bob.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_unread_round_trip_after_delivery() {
        let store = MemoryStore::new();
        let ctx = ServiceContext::new(&store, &AppConfig::default()).unwrap();
        let alice = store.directory.add_user(User::new("Alice", [])).unwrap();
        let alert = ctx
            .alerts
            .create(AlertDefinition::new("All", ""), t0())
            .await
            .unwrap();

        let read = ctx.user_alerts.mark_read(alice.id, alert.id, t0()).await.unwrap();
        assert_eq!(read.status, ReadStatus::Read);
        assert_eq!(read.last_read_at, Some(t0()));

        let unread = ctx.user_alerts.mark_unread(alice.id, alert.id).await.unwrap();
        assert_eq!(unread.status, ReadStatus::Unread);

        let err = ctx
            .user_alerts
            .mark_read(UserId::new(), alert.id, t0())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
