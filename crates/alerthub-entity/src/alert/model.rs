//! Alert entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use alerthub_core::error::AppError;
use alerthub_core::result::AppResult;
use alerthub_core::types::id::AlertId;

use super::channel::DeliveryChannel;
use super::severity::Severity;
use super::visibility::VisibilityScope;

/// An alert definition owned by the alert store.
///
/// Alerts are never deleted. They stop producing deliveries once their
/// expiry passes or an admin archives them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Unique alert identifier.
    pub id: AlertId,
    /// Short headline.
    pub title: String,
    /// Body text shown to the user.
    pub body: String,
    /// How urgent the alert is.
    pub severity: Severity,
    /// Requested delivery channel.
    pub channel: DeliveryChannel,
    /// Who the alert targets.
    pub visibility: VisibilityScope,
    /// First instant the alert is active.
    pub start_time: DateTime<Utc>,
    /// First instant the alert is no longer active, if any.
    pub expiry_time: Option<DateTime<Utc>>,
    /// Whether ticks re-deliver this alert.
    pub reminder_enabled: bool,
    /// Per-alert reminder interval override, in minutes.
    pub reminder_interval_minutes: Option<u64>,
    /// Archived alerts are inactive regardless of their window.
    pub archived: bool,
    /// When the alert was created.
    pub created_at: DateTime<Utc>,
    /// When the alert was last updated by an admin.
    pub updated_at: DateTime<Utc>,
}

impl Alert {
    /// Build a new alert from an admin definition.
    ///
    /// A missing start time means "starts now".
    pub fn from_definition(def: AlertDefinition, now: DateTime<Utc>) -> Self {
        Self {
            id: AlertId::new(),
            title: def.title,
            body: def.body,
            severity: def.severity,
            channel: def.channel,
            visibility: def.visibility,
            start_time: def.start_time.unwrap_or(now),
            expiry_time: def.expiry_time,
            reminder_enabled: def.reminder_enabled,
            reminder_interval_minutes: def.reminder_interval_minutes,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the alert's window contains `at` and it is not archived.
    pub fn is_active(&self, at: DateTime<Utc>) -> bool {
        !self.archived && at >= self.start_time && !self.is_expired(at)
    }

    /// Whether the alert's expiry has passed at `at`. Expiry is terminal.
    pub fn is_expired(&self, at: DateTime<Utc>) -> bool {
        self.expiry_time.is_some_and(|exp| at >= exp)
    }

    /// The minimum spacing between two deliveries to the same user.
    pub fn reminder_interval(&self, default: Duration) -> Duration {
        self.reminder_interval_minutes
            .and_then(|m| i64::try_from(m).ok())
            .and_then(Duration::try_minutes)
            .unwrap_or(default)
    }

    /// Apply an admin patch in place.
    pub fn apply_patch(&mut self, patch: AlertPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
        if let Some(severity) = patch.severity {
            self.severity = severity;
        }
        if let Some(channel) = patch.channel {
            self.channel = channel;
        }
        if let Some(visibility) = patch.visibility {
            self.visibility = visibility;
        }
        if let Some(start_time) = patch.start_time {
            self.start_time = start_time;
        }
        if let Some(expiry_time) = patch.expiry_time {
            self.expiry_time = expiry_time;
        }
        if let Some(enabled) = patch.reminder_enabled {
            self.reminder_enabled = enabled;
        }
        if let Some(interval) = patch.reminder_interval_minutes {
            self.reminder_interval_minutes = interval;
        }
        if let Some(archived) = patch.archived {
            self.archived = archived;
        }
        self.updated_at = now;
    }

    /// Check the fields that do not depend on the directory.
    pub fn validate(&self) -> AppResult<()> {
        validate_fields(
            &self.title,
            Some(self.start_time),
            self.expiry_time,
            self.reminder_interval_minutes,
        )
    }
}

/// Admin input for creating an alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertDefinition {
    /// Short headline.
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub body: String,
    /// Severity; defaults to `Info`.
    #[serde(default)]
    pub severity: Severity,
    /// Requested channel; defaults to in-app.
    #[serde(default)]
    pub channel: DeliveryChannel,
    /// Audience; defaults to the whole organization.
    #[serde(default)]
    pub visibility: VisibilityScope,
    /// Start of the active window; `None` means creation time.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// End of the active window; `None` means never expires.
    #[serde(default)]
    pub expiry_time: Option<DateTime<Utc>>,
    /// Whether ticks re-deliver this alert.
    #[serde(default = "default_true")]
    pub reminder_enabled: bool,
    /// Reminder interval override in minutes.
    #[serde(default)]
    pub reminder_interval_minutes: Option<u64>,
}

impl AlertDefinition {
    /// Create a definition with defaults for everything but the text.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity: Severity::default(),
            channel: DeliveryChannel::default(),
            visibility: VisibilityScope::default(),
            start_time: None,
            expiry_time: None,
            reminder_enabled: true,
            reminder_interval_minutes: None,
        }
    }

    /// Set the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the audience.
    pub fn with_visibility(mut self, visibility: VisibilityScope) -> Self {
        self.visibility = visibility;
        self
    }

    /// Set the active window.
    pub fn with_window(
        mut self,
        start_time: Option<DateTime<Utc>>,
        expiry_time: Option<DateTime<Utc>>,
    ) -> Self {
        self.start_time = start_time;
        self.expiry_time = expiry_time;
        self
    }

    /// Override the reminder interval.
    pub fn with_reminder_interval_minutes(mut self, minutes: u64) -> Self {
        self.reminder_interval_minutes = Some(minutes);
        self
    }

    /// Check the fields that do not depend on the directory.
    pub fn validate(&self) -> AppResult<()> {
        validate_fields(
            &self.title,
            self.start_time,
            self.expiry_time,
            self.reminder_interval_minutes,
        )
    }
}

/// Admin input for updating an alert. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertPatch {
    /// New headline.
    #[serde(default)]
    pub title: Option<String>,
    /// New body.
    #[serde(default)]
    pub body: Option<String>,
    /// New severity.
    #[serde(default)]
    pub severity: Option<Severity>,
    /// New channel.
    #[serde(default)]
    pub channel: Option<DeliveryChannel>,
    /// New audience.
    #[serde(default)]
    pub visibility: Option<VisibilityScope>,
    /// New start time.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// New expiry; `Some(None)` (JSON `null`) clears it.
    #[serde(
        default,
        deserialize_with = "deserialize_double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry_time: Option<Option<DateTime<Utc>>>,
    /// Enable or disable reminders.
    #[serde(default)]
    pub reminder_enabled: Option<bool>,
    /// New interval override; `Some(None)` (JSON `null`) restores the default.
    #[serde(
        default,
        deserialize_with = "deserialize_double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub reminder_interval_minutes: Option<Option<u64>>,
    /// Archive or unarchive.
    #[serde(default)]
    pub archived: Option<bool>,
}

impl AlertPatch {
    /// Whether the patch changes who the alert targets.
    pub fn changes_visibility(&self) -> bool {
        self.visibility.is_some()
    }
}

fn validate_fields(
    title: &str,
    start_time: Option<DateTime<Utc>>,
    expiry_time: Option<DateTime<Utc>>,
    reminder_interval_minutes: Option<u64>,
) -> AppResult<()> {
    if title.trim().is_empty() {
        return Err(AppError::validation("Alert title must not be empty"));
    }
    if let (Some(start), Some(expiry)) = (start_time, expiry_time) {
        if expiry <= start {
            return Err(AppError::validation(format!(
                "Alert expiry {expiry} must be after its start {start}"
            )));
        }
    }
    if reminder_interval_minutes == Some(0) {
        return Err(AppError::validation(
            "Reminder interval must be at least one minute",
        ));
    }
    Ok(())
}

fn default_true() -> bool {
    true
}

/// A present field becomes `Some`, so an explicit `null` reads as `Some(None)`.
/// Absent fields fall back to `#[serde(default)]`.
fn deserialize_double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
