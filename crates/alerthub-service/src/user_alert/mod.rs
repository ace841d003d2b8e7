//! Per-user alert views and user actions.

pub mod service;

pub use service::{UserAlert, UserAlertQuery, UserAlertService};
