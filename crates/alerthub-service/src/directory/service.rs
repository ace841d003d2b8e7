//! Read access to users and teams.

use std::sync::Arc;

use alerthub_entity::directory::{Team, User};
use alerthub_store::MemoryDirectory;

/// Lists the users and teams of the organization.
#[derive(Debug, Clone)]
pub struct DirectoryService {
    directory: Arc<MemoryDirectory>,
}

impl DirectoryService {
    /// Creates a new directory service.
    pub fn new(directory: Arc<MemoryDirectory>) -> Self {
        Self { directory }
    }

    /// Every user, sorted by name.
    pub fn list_users(&self) -> Vec<User> {
        self.directory.list_users()
    }

    /// Every team, sorted by name.
    pub fn list_teams(&self) -> Vec<Team> {
        self.directory.list_teams()
    }

    /// The backing directory, for registering users and teams.
    pub fn directory(&self) -> &Arc<MemoryDirectory> {
        &self.directory
    }
}
