//! Alert list filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::Alert;
use super::severity::Severity;
use super::visibility::AudienceKind;

/// Criteria for listing alerts. Empty criteria match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertFilter {
    /// Only alerts of this severity.
    #[serde(default)]
    pub severity: Option<Severity>,
    /// `Some(true)` for active alerts only, `Some(false)` for inactive only.
    #[serde(default)]
    pub active: Option<bool>,
    /// Only alerts whose scope has this shape.
    #[serde(default)]
    pub audience: Option<AudienceKind>,
}

impl AlertFilter {
    /// Active alerts only.
    pub fn active_only() -> Self {
        Self {
            active: Some(true),
            ..Self::default()
        }
    }

    /// Whether `alert` passes every criterion, evaluated at `now`.
    pub fn matches(&self, alert: &Alert, now: DateTime<Utc>) -> bool {
        if self.severity.is_some_and(|s| s != alert.severity) {
            return false;
        }
        if self.active.is_some_and(|a| a != alert.is_active(now)) {
            return false;
        }
        if self
            .audience
            .is_some_and(|kind| kind != alert.visibility.audience())
        {
            return false;
        }
        true
    }
}
