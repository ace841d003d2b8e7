//! Reminder delivery for AlertHub.
//!
//! This crate provides:
//! - The reminder scheduler, whose `tick(now)` walks active alerts and
//!   records every due reminder
//! - A host that invokes the tick on a fixed interval via
//!   `tokio-cron-scheduler` and cancels in-flight ticks on shutdown

pub mod host;
pub mod report;
pub mod scheduler;

pub use host::ReminderHost;
pub use report::{TickFailure, TickReport};
pub use scheduler::ReminderScheduler;
