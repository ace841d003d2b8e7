//! In-memory repository implementations backed by `dashmap`.

pub mod alert;
pub mod delivery_log;
pub mod delivery_state;
pub mod directory;

pub use alert::MemoryAlertRepository;
pub use delivery_log::MemoryDeliveryLog;
pub use delivery_state::MemoryDeliveryStateRepository;
pub use directory::MemoryDirectory;
