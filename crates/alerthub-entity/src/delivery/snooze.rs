//! End-of-day computation for snoozes.

use chrono::{DateTime, FixedOffset, NaiveTime, Offset, TimeZone, Utc};

use alerthub_core::config::SnoozeConfig;
use alerthub_core::error::AppError;
use alerthub_core::result::AppResult;

/// Fixes which calendar "end of the current day" is measured in.
///
/// The snooze ends at the next local midnight, an exclusive bound: the
/// pair is suppressed for every instant of the day including 23:59:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnoozePolicy {
    offset: FixedOffset,
}

impl SnoozePolicy {
    /// Snoozes end at UTC midnight.
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Snoozes end at midnight of a fixed UTC offset.
    pub fn from_offset_minutes(minutes: i32) -> AppResult<Self> {
        let offset = FixedOffset::east_opt(minutes * 60).ok_or_else(|| {
            AppError::configuration(format!("Invalid snooze UTC offset: {minutes} minutes"))
        })?;
        Ok(Self { offset })
    }

    /// Build the policy from configuration.
    pub fn from_config(config: &SnoozeConfig) -> AppResult<Self> {
        config.validate()?;
        Self::from_offset_minutes(config.utc_offset_minutes)
    }

    /// The instant the day containing `now` ends.
    pub fn end_of_day(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.with_timezone(&self.offset).date_naive();
        let Some(tomorrow) = today.succ_opt() else {
            return DateTime::<Utc>::MAX_UTC;
        };
        self.offset
            .from_local_datetime(&tomorrow.and_time(NaiveTime::MIN))
            .single()
            .map(|midnight| midnight.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl Default for SnoozePolicy {
    fn default() -> Self {
        Self::utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utc_end_of_day() {
        let policy = SnoozePolicy::utc();
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap();
        assert_eq!(
            policy.end_of_day(now),
            Utc.with_ymd_and_hms(2026, 3, 3, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_last_second_of_day_still_today() {
        let policy = SnoozePolicy::utc();
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 23, 59, 59).unwrap();
        assert_eq!(
            policy.end_of_day(now),
            Utc.with_ymd_and_hms(2026, 3, 3, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_offset_moves_the_boundary() {
        // UTC+9: 20:00 UTC on the 2nd is already 05:00 on the 3rd locally.
        let policy = SnoozePolicy::from_offset_minutes(9 * 60).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 20, 0, 0).unwrap();
        assert_eq!(
            policy.end_of_day(now),
            Utc.with_ymd_and_hms(2026, 3, 3, 15, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_invalid_offset_rejected() {
        let cfg = SnoozeConfig {
            utc_offset_minutes: 24 * 60,
        };
        assert!(SnoozePolicy::from_config(&cfg).is_err());
    }
}
