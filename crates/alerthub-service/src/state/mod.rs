//! Per-(user, alert) state tracking.

pub mod tracker;

pub use tracker::StateTracker;
