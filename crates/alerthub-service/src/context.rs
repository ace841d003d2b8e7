//! Service wiring over a [`MemoryStore`].

use std::sync::Arc;

use alerthub_core::config::AppConfig;
use alerthub_core::result::AppResult;
use alerthub_entity::delivery::SnoozePolicy;
use alerthub_store::MemoryStore;

use crate::alert::AlertService;
use crate::analytics::AnalyticsService;
use crate::delivery::DeliveryService;
use crate::directory::DirectoryService;
use crate::state::StateTracker;
use crate::user_alert::UserAlertService;
use crate::visibility::VisibilityResolver;

/// Every service, built once and shared by the host and the scheduler.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    /// Visibility resolution.
    pub resolver: Arc<VisibilityResolver>,
    /// Per-pair state transitions.
    pub tracker: Arc<StateTracker>,
    /// Delivery recording and log listing.
    pub deliveries: Arc<DeliveryService>,
    /// Alert administration.
    pub alerts: Arc<AlertService>,
    /// User views and actions.
    pub user_alerts: Arc<UserAlertService>,
    /// Metrics.
    pub analytics: Arc<AnalyticsService>,
    /// User and team listings.
    pub directory: Arc<DirectoryService>,
}

impl ServiceContext {
    /// Wire every service over the given store.
    pub fn new(store: &MemoryStore, config: &AppConfig) -> AppResult<Self> {
        let snooze = SnoozePolicy::from_config(&config.snooze)?;

        let resolver = Arc::new(VisibilityResolver::new(
            store.alerts.clone(),
            store.directory.clone(),
        ));
        let tracker = Arc::new(StateTracker::new(store.states.clone(), snooze));
        let deliveries = Arc::new(DeliveryService::new(
            Arc::clone(&tracker),
            store.log.clone(),
        ));
        let alerts = Arc::new(AlertService::new(
            store.alerts.clone(),
            Arc::clone(&resolver),
            Arc::clone(&deliveries),
            config.reminders.clone(),
        ));
        let user_alerts = Arc::new(UserAlertService::new(
            store.alerts.clone(),
            store.directory.clone(),
            Arc::clone(&resolver),
            Arc::clone(&tracker),
        ));
        let analytics = Arc::new(AnalyticsService::new(
            store.alerts.clone(),
            store.states.clone(),
            store.log.clone(),
        ));
        let directory = Arc::new(DirectoryService::new(store.directory.clone()));

        Ok(Self {
            resolver,
            tracker,
            deliveries,
            alerts,
            user_alerts,
            analytics,
            directory,
        })
    }
}
