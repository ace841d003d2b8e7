//! Delivery recording and the delivery log view.

pub mod service;

pub use service::DeliveryService;
