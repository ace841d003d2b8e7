//! In-memory identity directory.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, warn};

use alerthub_core::error::AppError;
use alerthub_core::result::AppResult;
use alerthub_core::traits::Directory;
use alerthub_core::types::id::{TeamId, UserId};
use alerthub_entity::directory::{Team, User};

/// Users and teams held in memory.
///
/// The directory can be switched offline to exercise the
/// `DirectoryUnavailable` paths of callers.
#[derive(Debug)]
pub struct MemoryDirectory {
    users: DashMap<UserId, User>,
    teams: DashMap<TeamId, Team>,
    available: AtomicBool,
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self {
            users: DashMap::new(),
            teams: DashMap::new(),
            available: AtomicBool::new(true),
        }
    }
}

impl MemoryDirectory {
    /// Create an empty, online directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a team.
    pub fn add_team(&self, team: Team) -> Team {
        debug!(team_id = %team.id, name = %team.name, "Registered team");
        self.teams.insert(team.id, team.clone());
        team
    }

    /// Register a user. Every team the user names must already exist.
    pub fn add_user(&self, user: User) -> AppResult<User> {
        if let Some(missing) = user.teams.iter().find(|t| !self.teams.contains_key(t)) {
            return Err(AppError::not_found(format!("Team {missing} not found")));
        }
        debug!(user_id = %user.id, name = %user.name, "Registered user");
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Remove a user. Returns the removed record, if any.
    pub fn remove_user(&self, user_id: UserId) -> Option<User> {
        self.users.remove(&user_id).map(|(_, user)| user)
    }

    /// Look up a user.
    pub fn get_user(&self, user_id: UserId) -> Option<User> {
        self.users.get(&user_id).map(|u| u.value().clone())
    }

    /// Every user, sorted by name.
    pub fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.value().clone()).collect();
        users.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        users
    }

    /// Every team, sorted by name.
    pub fn list_teams(&self) -> Vec<Team> {
        let mut teams: Vec<Team> = self.teams.iter().map(|t| t.value().clone()).collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        teams
    }

    /// Take the directory offline or bring it back.
    pub fn set_available(&self, available: bool) {
        if !available {
            warn!("Directory marked unavailable");
        }
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::directory_unavailable("Directory is offline"))
        }
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn user_exists(&self, user_id: UserId) -> AppResult<bool> {
        self.ensure_available()?;
        Ok(self.users.contains_key(&user_id))
    }

    async fn team_exists(&self, team_id: TeamId) -> AppResult<bool> {
        self.ensure_available()?;
        Ok(self.teams.contains_key(&team_id))
    }

    async fn team_members(&self, team_id: TeamId) -> AppResult<Vec<UserId>> {
        self.ensure_available()?;
        let mut members: Vec<UserId> = self
            .users
            .iter()
            .filter(|u| u.value().is_member_of(team_id))
            .map(|u| *u.key())
            .collect();
        members.sort();
        Ok(members)
    }

    async fn user_teams(&self, user_id: UserId) -> AppResult<Vec<TeamId>> {
        self.ensure_available()?;
        Ok(self
            .users
            .get(&user_id)
            .map(|u| u.teams.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn all_users(&self) -> AppResult<Vec<UserId>> {
        self.ensure_available()?;
        let mut ids: Vec<UserId> = self.users.iter().map(|u| *u.key()).collect();
        ids.sort();
        Ok(ids)
    }
}
