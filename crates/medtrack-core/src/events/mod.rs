//! Session lifecycle events emitted by MedTrack.
//!
//! Events are broadcast by the session manager and the request pipeline
//! and consumed by the host application, which decides how to render
//! them (navigation, notices).

pub mod session;

pub use session::{InvalidationReason, SessionEvent};
