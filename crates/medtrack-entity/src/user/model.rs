//! User entity model.

use serde::{Deserialize, Serialize};

use super::role::Role;

/// A registered user in the MedTrack system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier (opaque server-issued string).
    #[serde(alias = "_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address (login identifier).
    pub email: String,
    /// User role (RBAC).
    pub role: Role,
    /// Whether the account is active.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl User {
    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
