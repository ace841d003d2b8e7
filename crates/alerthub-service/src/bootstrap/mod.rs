//! Demo data seeding.

pub mod seed;

pub use seed::{DemoData, seed_demo_data};
