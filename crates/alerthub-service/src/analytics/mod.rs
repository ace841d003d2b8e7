//! Read-only analytics projection.

pub mod service;

pub use service::{AlertMetrics, AnalyticsService, Metrics};
