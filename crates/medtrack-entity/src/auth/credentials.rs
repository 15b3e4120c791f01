//! Token pair held by the credential store.

use serde::{Deserialize, Serialize};

/// The access/refresh token pair.
///
/// Tokens are opaque strings; nothing in the client inspects their
/// contents. Both slots are cleared together on logout or irrecoverable
/// refresh failure, never individually.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Short-lived credential attached to API calls.
    pub access_token: Option<String>,
    /// Longer-lived credential used solely to obtain a new access token.
    pub refresh_token: Option<String>,
}

impl Credentials {
    /// Create a credential pair from both tokens.
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
        }
    }

    /// Whether an access token is present.
    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }
}
