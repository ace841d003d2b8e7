//! Alert administration.

pub mod service;

pub use service::AlertService;
