//! # medtrack-cli
//!
//! Command definitions and terminal rendering for the MedTrack client.
//! Commands go through the same route guard as the interactive views, so
//! role restrictions behave identically regardless of entry point.

pub mod commands;
pub mod context;
pub mod output;

pub use commands::Cli;
