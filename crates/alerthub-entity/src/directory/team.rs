//! Team entity.

use serde::{Deserialize, Serialize};

use alerthub_core::types::id::TeamId;

/// A named group of users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Unique team identifier.
    pub id: TeamId,
    /// Display name.
    pub name: String,
}

impl Team {
    /// Create a team with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TeamId::new(),
            name: name.into(),
        }
    }
}
