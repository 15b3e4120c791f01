//! User administration endpoints.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use medtrack_core::AppResult;
use medtrack_entity::user::{Role, User};

use crate::pipeline::ApiClient;
use crate::transport::ApiRequest;

#[derive(Debug, Deserialize)]
struct UsersEnvelope {
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: User,
}

/// User endpoints over the request pipeline. All of them are
/// admin-gated server-side except the patient directory, which
/// healthcare providers may read.
pub struct UserApi {
    client: Arc<ApiClient>,
}

impl UserApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// List all users.
    pub async fn list(&self) -> AppResult<Vec<User>> {
        let envelope: UsersEnvelope = self.client.send(ApiRequest::get("/users")).await?.json()?;
        Ok(envelope.users)
    }

    /// Fetch a single user.
    pub async fn get(&self, id: &str) -> AppResult<User> {
        let envelope: UserEnvelope = self
            .client
            .send(ApiRequest::get(format!("/users/{id}")))
            .await?
            .json()?;
        Ok(envelope.user)
    }

    /// Change a user's role.
    pub async fn update_role(&self, id: &str, role: Role) -> AppResult<User> {
        let envelope: UserEnvelope = self
            .client
            .send(ApiRequest::patch(
                format!("/users/{id}/role"),
                json!({ "role": role }),
            ))
            .await?
            .json()?;
        Ok(envelope.user)
    }

    /// Activate or deactivate a user account.
    pub async fn set_active(&self, id: &str, active: bool) -> AppResult<User> {
        let envelope: UserEnvelope = self
            .client
            .send(ApiRequest::patch(
                format!("/users/{id}/status"),
                json!({ "isActive": active }),
            ))
            .await?
            .json()?;
        Ok(envelope.user)
    }

    /// List patients, for prescription forms.
    pub async fn patients(&self) -> AppResult<Vec<User>> {
        let envelope: UsersEnvelope = self
            .client
            .send(ApiRequest::get("/users/patients"))
            .await?
            .json()?;
        Ok(envelope.users)
    }
}
