//! Delivery entities: per-pair state, the append-only event ledger,
//! and the snooze boundary policy.

pub mod event;
pub mod snooze;
pub mod state;

pub use event::{DeliveryEvent, DeliveryFilter, DeliveryKind};
pub use snooze::SnoozePolicy;
pub use state::{DeliveryState, ReadStatus, ReminderDecision, StateChange};
