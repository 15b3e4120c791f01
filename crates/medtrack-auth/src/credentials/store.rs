//! Credential store trait and the persisted session record.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use medtrack_core::AppResult;
use medtrack_entity::auth::Credentials;
use medtrack_entity::user::User;

/// The record a [`CredentialStore`] persists: the token pair plus the
/// serialized user.
///
/// Mutated only through explicit `set`/`clear` operations; never partially.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    /// The access/refresh token pair.
    #[serde(flatten)]
    pub credentials: Credentials,
    /// The user record from the last successful login or validation.
    #[serde(default)]
    pub user: Option<User>,
}

impl StoredSession {
    /// Build a record from a token pair and user.
    pub fn new(credentials: Credentials, user: User) -> Self {
        Self {
            credentials,
            user: Some(user),
        }
    }

    /// Whether the record holds an access token.
    pub fn has_access_token(&self) -> bool {
        self.credentials.has_access_token()
    }
}

/// Trait for credential persistence backends.
///
/// Every `set`/`clear` must be immediately visible to subsequent `get`
/// calls from any component in the same process. Token contents are
/// treated as opaque strings and never validated here.
#[async_trait]
pub trait CredentialStore: Send + Sync + std::fmt::Debug + 'static {
    /// Read the current persisted session. A store with nothing persisted
    /// returns an empty record, not an error.
    async fn get(&self) -> AppResult<StoredSession>;

    /// Replace the persisted session atomically.
    async fn set(&self, session: &StoredSession) -> AppResult<()>;

    /// Clear all three slots together.
    async fn clear(&self) -> AppResult<()>;
}
