//! Alert visibility resolution.

pub mod resolver;

pub use resolver::VisibilityResolver;
