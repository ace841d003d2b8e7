//! Identity directory trait: the external source of users and teams.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::{TeamId, UserId};

/// Answers membership questions for visibility resolution.
///
/// Implementations backed by a remote identity provider should report
/// outages as [`ErrorKind::DirectoryUnavailable`](crate::error::ErrorKind)
/// so the scheduler can skip the affected alert and retry later.
#[async_trait]
pub trait Directory: Send + Sync + 'static {
    /// Whether the user is currently known.
    async fn user_exists(&self, user_id: UserId) -> AppResult<bool>;

    /// Whether the team is currently known.
    async fn team_exists(&self, team_id: TeamId) -> AppResult<bool>;

    /// Every user that belongs to the team.
    async fn team_members(&self, team_id: TeamId) -> AppResult<Vec<UserId>>;

    /// Every team the user belongs to.
    async fn user_teams(&self, user_id: UserId) -> AppResult<Vec<TeamId>>;

    /// Every known user in the organization.
    async fn all_users(&self) -> AppResult<Vec<UserId>>;
}
