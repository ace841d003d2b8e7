//! Snooze boundary configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Largest offset accepted, matching real-world zones (UTC-12 .. UTC+14).
const MIN_OFFSET_MINUTES: i32 = -12 * 60;
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Which calendar a snooze's "end of day" is measured in.
///
/// A snooze always lasts until the next midnight of this fixed offset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnoozeConfig {
    /// Offset from UTC in minutes; `0` means UTC days.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl SnoozeConfig {
    /// Check the offset is a plausible time zone.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(MIN_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&self.utc_offset_minutes) {
            return Err(AppError::configuration(format!(
                "snooze.utc_offset_minutes must be within {MIN_OFFSET_MINUTES}..={MAX_OFFSET_MINUTES}, got {}",
                self.utc_offset_minutes
            )));
        }
        Ok(())
    }
}
