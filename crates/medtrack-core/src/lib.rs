//! # medtrack-core
//!
//! Core crate for MedTrack. Contains configuration schemas, session
//! lifecycle events, and the unified error system.
//!
//! This crate has **no** internal dependencies on other MedTrack crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
