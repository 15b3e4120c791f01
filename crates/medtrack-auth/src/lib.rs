//! # medtrack-auth
//!
//! Authentication core for MedTrack: the credential store, the pure RBAC
//! predicate engine, the session state machine, and the route guard.
//!
//! Nothing in this crate performs HTTP itself; network round-trips are
//! injected through the [`guard::SessionValidator`] seam so the session
//! logic stays testable in isolation.

pub mod credentials;
pub mod guard;
pub mod rbac;
pub mod session;

pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore, StoredSession};
pub use guard::{RouteDecision, RouteGuard, SessionValidator};
pub use session::{Session, SessionManager, SessionStatus};
