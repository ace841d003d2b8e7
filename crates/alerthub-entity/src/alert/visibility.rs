//! Visibility scope: who an alert targets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use alerthub_core::types::id::{TeamId, UserId};

/// The audience rule of an alert.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "targets", rename_all = "snake_case")]
pub enum VisibilityScope {
    /// Every user of the organization.
    #[default]
    Organization,
    /// Every member of one team.
    Team(TeamId),
    /// An explicit list of users.
    Users(BTreeSet<UserId>),
}

/// The shape of a [`VisibilityScope`], used for filtering alert lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudienceKind {
    /// Organization-wide.
    Organization,
    /// Team-scoped.
    Team,
    /// User-scoped.
    Users,
}

impl VisibilityScope {
    /// Build a user-list scope.
    pub fn users(ids: impl IntoIterator<Item = UserId>) -> Self {
        Self::Users(ids.into_iter().collect())
    }

    /// The shape of this scope.
    pub fn audience(&self) -> AudienceKind {
        match self {
            Self::Organization => AudienceKind::Organization,
            Self::Team(_) => AudienceKind::Team,
            Self::Users(_) => AudienceKind::Users,
        }
    }
}
