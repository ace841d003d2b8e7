//! Alert domain entities.

pub mod channel;
pub mod filter;
pub mod model;
pub mod severity;
pub mod visibility;

pub use channel::DeliveryChannel;
pub use filter::AlertFilter;
pub use model::{Alert, AlertDefinition, AlertPatch};
pub use severity::Severity;
pub use visibility::{AudienceKind, VisibilityScope};
