//! # alerthub-service
//!
//! Business logic service layer for AlertHub. Each service orchestrates
//! the repositories and the identity directory to implement one group of
//! use cases: alert administration, per-user alert views and actions,
//! delivery recording, and analytics.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. Every time-dependent
//! operation takes `now` explicitly.

pub mod alert;
pub mod analytics;
pub mod bootstrap;
pub mod context;
pub mod delivery;
pub mod directory;
pub mod state;
pub mod user_alert;
pub mod visibility;

pub use alert::AlertService;
pub use analytics::{AlertMetrics, AnalyticsService, Metrics};
pub use bootstrap::{DemoData, seed_demo_data};
pub use context::ServiceContext;
pub use delivery::DeliveryService;
pub use directory::DirectoryService;
pub use state::StateTracker;
pub use user_alert::{UserAlert, UserAlertQuery, UserAlertService};
pub use visibility::VisibilityResolver;
