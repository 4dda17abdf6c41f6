use evidencias_core::roles::UserRole;
use evidencias_core::types::DbId;
use evidencias_core::user::{RegisterInput, RoleChange, UserPatch};
use serde::Serialize;

use crate::client::EvidenciasClient;
use crate::error::ClientError;
use crate::models::User;

/// Body of `POST /users`.
#[derive(Serialize)]
struct NewAccount<'a> {
    #[serde(flatten)]
    account: &'a RegisterInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<UserRole>,
}

/// Account administration. The server only allows these for `ADMIN`.
pub struct UsersApi<'a> {
    client: &'a EvidenciasClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a EvidenciasClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<User>, ClientError> {
        self.client.get_data("/users").await
    }

    /// Create an account on someone's behalf; without `role` the server's
    /// default role applies.
    pub async fn create(&self, account: &RegisterInput, role: Option<UserRole>) -> Result<User, ClientError> {
        let account = account.clone().normalized();
        for (field, value) in [("name", &account.name), ("email", &account.email), ("password", &account.password)] {
            if value.trim().is_empty() {
                return Err(ClientError::required(field));
            }
        }
        let body = NewAccount {
            account: &account,
            role,
        };
        self.client.post_data("/users", &body).await
    }

    pub async fn update(&self, id: DbId, patch: &UserPatch) -> Result<User, ClientError> {
        let patch = patch.clone().normalized();
        if patch.name.as_deref() == Some("") {
            return Err(ClientError::required("name"));
        }
        if patch.email.as_deref() == Some("") {
            return Err(ClientError::required("email"));
        }
        self.client.put_data(&format!("/users/{id}"), &patch).await
    }

    pub async fn change_role(&self, id: DbId, role: UserRole) -> Result<User, ClientError> {
        self.client
            .patch_data(&format!("/users/{id}/role"), &RoleChange { role })
            .await
    }

    /// Soft delete: the account stays listed with `is_active = false`.
    pub async fn deactivate(&self, id: DbId) -> Result<User, ClientError> {
        let url = self.client.url(&format!("/users/{id}/deactivate"));
        let response = self.client.send(|http| Ok(http.patch(&url))).await?;
        crate::client::read_data(response).await
    }
}
