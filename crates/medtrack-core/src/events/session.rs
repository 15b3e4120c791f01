//! Session lifecycle event types.

use serde::{Deserialize, Serialize};

/// Why a session was forcibly invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationReason {
    /// No refresh token was available when the access token was rejected.
    MissingRefreshToken,
    /// The refresh endpoint rejected the refresh token.
    RefreshRejected,
}

/// Events related to the local session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// A user logged in (or registered) successfully.
    Authenticated {
        /// The authenticated user's ID.
        user_id: String,
    },
    /// The user logged out; local state was cleared.
    LoggedOut,
    /// A refresh produced a new access token transparently.
    TokenRefreshed,
    /// The session was invalidated and credentials were cleared.
    ///
    /// The host application should navigate to the login view and show
    /// a session-expired notice.
    Invalidated {
        /// Why the session was invalidated.
        reason: InvalidationReason,
    },
}
