//! Core type definitions used across the AlertHub workspace.

pub mod id;

pub use id::*;
