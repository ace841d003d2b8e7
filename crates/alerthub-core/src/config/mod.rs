//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field carries a serde default so an empty file
//! yields a working configuration.

pub mod logging;
pub mod reminder;
pub mod snooze;

use serde::{Deserialize, Serialize};

pub use self::logging::LoggingConfig;
pub use self::reminder::{ReminderConfig, SchedulerConfig};
pub use self::snooze::SnoozeConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged configuration
/// (default.toml + environment overlay + `ALERTHUB__*` variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Reminder cadence settings.
    #[serde(default)]
    pub reminders: ReminderConfig,
    /// Host-side tick scheduling.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Snooze boundary policy.
    #[serde(default)]
    pub snooze: SnoozeConfig,
    /// Startup bootstrap settings.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

/// Startup bootstrap configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Seed the demo teams, users, and alerts on startup.
    #[serde(default = "default_true")]
    pub seed_demo_data: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default` with the `config/{env}` overlay and
    /// environment variables prefixed with `ALERTHUB__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ALERTHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let app: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        app.validate()?;
        Ok(app)
    }

    /// Reject values that would make the scheduler misbehave.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.reminders.default_interval_minutes == 0 {
            return Err(AppError::configuration(
                "reminders.default_interval_minutes must be > 0",
            ));
        }
        if self.scheduler.tick_interval_seconds == 0 {
            return Err(AppError::configuration(
                "scheduler.tick_interval_seconds must be > 0",
            ));
        }
        self.snooze.validate()?;
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
