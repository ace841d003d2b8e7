//! Repository traits implemented by storage backends.

pub mod alert;
pub mod delivery_log;
pub mod delivery_state;

pub use alert::AlertRepository;
pub use delivery_log::DeliveryLogRepository;
pub use delivery_state::DeliveryStateRepository;
