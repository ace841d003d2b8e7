//! Resolves which users an alert targets and which alerts a user sees.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use alerthub_core::error::AppError;
use alerthub_core::result::AppResult;
use alerthub_core::traits::Directory;
use alerthub_core::types::id::{AlertId, TeamId, UserId};
use alerthub_entity::alert::{Alert, VisibilityScope};
use alerthub_store::repositories::AlertRepository;

/// Pure resolution over the alert store and the directory.
///
/// Results reflect the directory at call time: membership changes apply
/// to the next resolution, and users that no longer exist drop out of
/// explicit user lists without an error.
#[derive(Clone)]
pub struct VisibilityResolver {
    alerts: Arc<dyn AlertRepository>,
    directory: Arc<dyn Directory>,
}

impl std::fmt::Debug for VisibilityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityResolver").finish_non_exhaustive()
    }
}

impl VisibilityResolver {
    /// Creates a new resolver.
    pub fn new(alerts: Arc<dyn AlertRepository>, directory: Arc<dyn Directory>) -> Self {
        Self { alerts, directory }
    }

    /// Every user the alert targets at `now`. Empty outside the active window.
    pub async fn targets_of(
        &self,
        alert: &Alert,
        now: DateTime<Utc>,
    ) -> AppResult<BTreeSet<UserId>> {
        if !alert.is_active(now) {
            return Ok(BTreeSet::new());
        }
        self.scope_members(&alert.visibility).await
    }

    /// Every existing user a scope names, ignoring any alert window.
    pub async fn scope_members(&self, scope: &VisibilityScope) -> AppResult<BTreeSet<UserId>> {
        match scope {
            VisibilityScope::Organization => {
                Ok(self.directory.all_users().await?.into_iter().collect())
            }
            VisibilityScope::Team(team_id) => {
                let members = self.directory.team_members(*team_id).await?;
                Ok(members.into_iter().collect())
            }
            VisibilityScope::Users(listed) => {
                let mut existing = BTreeSet::new();
                for user_id in listed {
                    if self.directory.user_exists(*user_id).await? {
                        existing.insert(*user_id);
                    } else {
                        debug!(user_id = %user_id, "Dropping unknown user from target list");
                    }
                }
                Ok(existing)
            }
        }
    }

    /// Whether the alert targets `user_id` at `now`.
    pub async fn is_target(
        &self,
        alert: &Alert,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        if !alert.is_active(now) || !self.directory.user_exists(user_id).await? {
            return Ok(false);
        }
        let teams = self.directory.user_teams(user_id).await?;
        Ok(scope_includes(&alert.visibility, user_id, &teams))
    }

    /// Ids of every alert visible to the user at `now`.
    pub async fn alerts_for(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<BTreeSet<AlertId>> {
        Ok(self
            .visible_alerts(user_id, now)
            .await?
            .into_iter()
            .map(|a| a.id)
            .collect())
    }

    /// Every alert visible to the user at `now`, oldest first.
    pub async fn visible_alerts(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Alert>> {
        if !self.directory.user_exists(user_id).await? {
            return Ok(Vec::new());
        }
        let teams = self.directory.user_teams(user_id).await?;
        Ok(self
            .alerts
            .list()
            .await?
            .into_iter()
            .filter(|a| a.is_active(now) && scope_includes(&a.visibility, user_id, &teams))
            .collect())
    }

    /// Reject scopes whose targets do not exist.
    ///
    /// A team scope needs an existing team; a user list must be non-empty
    /// and name only existing users.
    pub async fn validate_scope(&self, scope: &VisibilityScope) -> AppResult<()> {
        match scope {
            VisibilityScope::Organization => Ok(()),
            VisibilityScope::Team(team_id) => {
                if self.directory.team_exists(*team_id).await? {
                    Ok(())
                } else {
                    Err(AppError::invalid_visibility_target(format!(
                        "Team {team_id} does not exist"
                    )))
                }
            }
            VisibilityScope::Users(listed) => {
                if listed.is_empty() {
                    return Err(AppError::invalid_visibility_target(
                        "User-scoped alert must name at least one user",
                    ));
                }
                for user_id in listed {
                    if !self.directory.user_exists(*user_id).await? {
                        return Err(AppError::invalid_visibility_target(format!(
                            "User {user_id} does not exist"
                        )));
                    }
                }
                Ok(())
            }
        }
    }
}

fn scope_includes(scope: &VisibilityScope, user_id: UserId, teams: &[TeamId]) -> bool {
    match scope {
        VisibilityScope::Organization => true,
        VisibilityScope::Team(team_id) => teams.contains(team_id),
        VisibilityScope::Users(listed) => listed.contains(&user_id),
    }
}
