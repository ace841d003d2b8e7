//! Seeds a small demo organization.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use alerthub_core::result::AppResult;
use alerthub_core::types::id::{AlertId, TeamId, UserId};
use alerthub_entity::alert::{AlertDefinition, Severity, VisibilityScope};
use alerthub_entity::directory::{Team, User};

use crate::context::ServiceContext;

/// Ids of everything [`seed_demo_data`] created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoData {
    /// The Engineering team.
    pub engineering: TeamId,
    /// The Marketing team.
    pub marketing: TeamId,
    /// Alice, in Engineering.
    pub alice: UserId,
    /// Bob, in Marketing.
    pub bob: UserId,
    /// Carol, in Engineering.
    pub carol: UserId,
    /// Organization-wide maintenance warning, expires after one day.
    pub maintenance: AlertId,
    /// Engineering-only notice.
    pub standup: AlertId,
    /// Critical alert for Alice with hourly reminders.
    pub incident: AlertId,
}

/// Create two teams, three users, and three alerts as of `now`.
///
/// Alerts go through [`AlertService::create`](crate::AlertService::create),
/// so initial deliveries follow the configured policy.
pub async fn seed_demo_data(ctx: &ServiceContext, now: DateTime<Utc>) -> AppResult<DemoData> {
    let directory = ctx.directory.directory();

    let engineering = directory.add_team(Team::new("Engineering")).id;
    let marketing = directory.add_team(Team::new("Marketing")).id;

    let alice = directory.add_user(User::new("Alice", [engineering]))?.id;
    let bob = directory.add_user(User::new("Bob", [marketing]))?.id;
    let carol = directory.add_user(User::new("Carol", [engineering]))?.id;

    let maintenance = ctx
        .alerts
        .create(
            AlertDefinition::new(
                "System Maintenance Tonight",
                "Maintenance starts at 23:00 UTC. Services may be intermittently unavailable.",
            )
            .with_severity(Severity::Warning)
            .with_window(Some(now), Some(now + Duration::days(1))),
            now,
        )
        .await?
        .id;

    let standup = ctx
        .alerts
        .create(
            AlertDefinition::new(
                "Engineering Standup Postponed",
                "The 10:00 standup is postponed today.",
            )
            .with_visibility(VisibilityScope::Team(engineering)),
            now,
        )
        .await?
        .id;

    let incident = ctx
        .alerts
        .create(
            AlertDefinition::new(
                "Security Incident",
                "A critical vulnerability was found. Follow the containment procedure.",
            )
            .with_severity(Severity::Critical)
            .with_visibility(VisibilityScope::users([alice]))
            .with_reminder_interval_minutes(60),
            now,
        )
        .await?
        .id;

    info!(teams = 2, users = 3, alerts = 3, "Seeded demo data");

    Ok(DemoData {
        engineering,
        marketing,
        alice,
        bob,
        carol,
        maintenance,
        standup,
        incident,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerthub_core::config::AppConfig;
    use alerthub_entity::alert::AlertFilter;
    use alerthub_store::MemoryStore;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_seed_creates_demo_organization() {
        let store = MemoryStore::new();
        let ctx = ServiceContext::new(&store, &AppConfig::default()).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();

        let demo = seed_demo_data(&ctx, now).await.unwrap();

        assert_eq!(ctx.directory.list_teams().len(), 2);
        assert_eq!(ctx.directory.list_users().len(), 3);
        let alerts = ctx.alerts.list(&AlertFilter::default(), now).await.unwrap();
        assert_eq!(alerts.len(), 3);

        let incident = ctx.alerts.get(demo.incident).await.unwrap();
        assert_eq!(incident.reminder_interval_minutes, Some(60));

        // Initial deliveries: org alert to 3 users, Eng alert to 2, incident to Alice.
        assert_eq!(ctx.deliveries.count().await.unwrap(), 6);

        let later = now + Duration::days(1);
        let active = ctx.alerts.list(&AlertFilter::active_only(), later).await.unwrap();
        assert!(active.iter().all(|a| a.id != demo.maintenance));
    }
}
