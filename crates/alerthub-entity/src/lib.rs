//! # alerthub-entity
//!
//! Domain entity models for AlertHub. Every struct in this crate is either
//! a stored record (alerts, users, teams, delivery states, delivery events)
//! or a value object used to create, patch, or filter them. All entities
//! derive `Debug`, `Clone`, `Serialize`, and `Deserialize`.

pub mod alert;
pub mod delivery;
pub mod directory;
