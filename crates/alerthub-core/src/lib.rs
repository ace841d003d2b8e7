//! # alerthub-core
//!
//! Core crate for AlertHub. Contains configuration schemas, typed
//! identifiers, the directory trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other AlertHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
