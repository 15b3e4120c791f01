//! Request/response shapes for the auth endpoints.

use serde::{Deserialize, Serialize};

use crate::user::{Role, User};

/// Credentials submitted to the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Plaintext password (sent over TLS only).
    pub password: String,
}

/// Profile + credentials submitted to the register endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Requested role; the server defaults to `patient` when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Response shape shared by login and register.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// The authenticated user.
    pub user: User,
    /// The issued access token.
    pub access_token: String,
    /// The issued refresh token.
    pub refresh_token: String,
}

/// Body of the refresh endpoint call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// The refresh token being exchanged.
    pub refresh_token: String,
}

/// Successful refresh endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// The new access token.
    pub access_token: String,
    /// A rotated refresh token, when the server issues one.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Response of the profile/validate endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// The user the token belongs to.
    pub user: User,
}
