//! Alert repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use alerthub_core::result::AppResult;
use alerthub_core::types::id::AlertId;
use alerthub_entity::alert::{Alert, AlertPatch};

/// Key-addressable storage for alert definitions.
///
/// There is no delete: alerts are retired by expiry or by
/// archiving, and their history stays addressable.
#[async_trait]
pub trait AlertRepository: Send + Sync + 'static {
    /// Store a new alert. Fails with `Conflict` if the id is taken.
    async fn insert(&self, alert: &Alert) -> AppResult<()>;

    /// Find an alert by id.
    async fn find_by_id(&self, id: AlertId) -> AppResult<Option<Alert>>;

    /// Apply a patch and revalidate the alert under the alert's lock.
    ///
    /// Fails with `NotFound` if the alert is unknown. A patch that leaves
    /// the alert invalid is rejected and nothing is written.
    async fn patch(
        &self,
        id: AlertId,
        patch: AlertPatch,
        now: DateTime<Utc>,
    ) -> AppResult<Alert>;

    /// Every alert, oldest first.
    async fn list(&self) -> AppResult<Vec<Alert>>;

    /// Number of stored alerts.
    async fn count(&self) -> AppResult<u64>;
}
