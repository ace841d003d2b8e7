//! Shared test helpers for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

use alerthub_core::config::AppConfig;
use alerthub_core::types::id::{TeamId, UserId};
use alerthub_entity::directory::{Team, User};
use alerthub_service::ServiceContext;
use alerthub_store::MemoryStore;
use alerthub_worker::ReminderScheduler;

/// Test application context
pub struct TestApp {
    /// Backing in-memory store
    pub store: MemoryStore,
    /// Wired services
    pub ctx: ServiceContext,
    /// Reminder tick
    pub scheduler: ReminderScheduler,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Default configuration, without initial deliveries so tick counts
    /// start from zero.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.reminders.deliver_on_create = false;
        Self::with_config(config)
    }

    /// Build the app from an explicit configuration
    pub fn with_config(config: AppConfig) -> Self {
        let store = MemoryStore::new();
        let ctx = ServiceContext::new(&store, &config).expect("Failed to wire services");
        let scheduler = ReminderScheduler::new(&ctx, &config.reminders);
        Self {
            store,
            ctx,
            scheduler,
            config,
        }
    }

    /// Register a team
    pub fn team(&self, name: &str) -> TeamId {
        self.store.directory.add_team(Team::new(name)).id
    }

    /// Register a user in the given teams
    pub fn user(&self, name: &str, teams: &[TeamId]) -> UserId {
        self.store
            .directory
            .add_user(User::new(name, teams.iter().copied()))
            .expect("Failed to add user")
            .id
    }
}

/// A Monday morning, mid-day enough that +2h stays on the same date
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}
