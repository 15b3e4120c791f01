//! Role-based access control.

pub mod predicates;

pub use predicates::*;
