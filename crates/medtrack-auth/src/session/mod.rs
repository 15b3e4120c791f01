//! Session lifecycle state machine.

pub mod manager;
pub mod state;

pub use manager::{AuthAttempt, SessionManager, ValidationOutcome};
pub use state::{Session, SessionStatus};
