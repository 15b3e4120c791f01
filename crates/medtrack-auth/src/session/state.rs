//! Session status and derived snapshot types.

use serde::{Deserialize, Serialize};

use medtrack_entity::user::User;

/// Authentication lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// No credentials held.
    Anonymous,
    /// A login, register, or logout round-trip is in flight.
    Authenticating,
    /// A user and access token are held (possibly optimistically, pending
    /// the first validation round-trip).
    Authenticated,
    /// The access token was rejected; the request pipeline may still
    /// resolve this via refresh.
    Expired,
}

/// A derived view of the current session.
///
/// Never stored; recomputed from the state machine on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The current user, when one is held.
    pub user: Option<User>,
    /// Whether the session counts as authenticated.
    pub is_authenticated: bool,
    /// The lifecycle state.
    pub status: SessionStatus,
}

impl Session {
    /// An anonymous session.
    pub fn anonymous() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            status: SessionStatus::Anonymous,
        }
    }
}
