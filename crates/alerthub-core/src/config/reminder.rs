//! Reminder cadence and tick scheduling configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How often a (user, alert) pair may be re-delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Minimum minutes between two deliveries of the same alert to the
    /// same user, unless the alert overrides it.
    #[serde(default = "default_interval_minutes")]
    pub default_interval_minutes: u64,
    /// Deliver to every current target as soon as an active alert is created.
    #[serde(default = "default_true")]
    pub deliver_on_create: bool,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            default_interval_minutes: default_interval_minutes(),
            deliver_on_create: true,
        }
    }
}

/// How often the host invokes a reminder tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Whether the host runs ticks at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between two ticks.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_seconds: u64,
}

impl SchedulerConfig {
    /// The tick period as a [`Duration`].
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_seconds)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_interval_seconds: default_tick_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval_minutes() -> u64 {
    120
}

fn default_tick_interval() -> u64 {
    300
}
