//! User entity.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use alerthub_core::types::id::{TeamId, UserId};

/// A member of the (single) organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Teams the user belongs to; may be empty.
    #[serde(default)]
    pub teams: BTreeSet<TeamId>,
}

impl User {
    /// Create a user with a fresh id and the given teams.
    pub fn new(name: impl Into<String>, teams: impl IntoIterator<Item = TeamId>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            teams: teams.into_iter().collect(),
        }
    }

    /// Whether the user belongs to `team`.
    pub fn is_member_of(&self, team: TeamId) -> bool {
        self.teams.contains(&team)
    }
}
