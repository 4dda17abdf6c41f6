use evidencias_core::roles::UserRole;
use evidencias_core::types::DbId;
use evidencias_core::user::UserPatch;

use crate::client::EvidenciasClient;
use crate::error::ClientError;
use crate::models::User;

use super::track;

/// Account administration for `ADMIN` users.
#[derive(Debug)]
pub struct UsersPage {
    client: EvidenciasClient,
    pub users: Vec<User>,
    pub last_error: Option<String>,
}

impl UsersPage {
    pub fn new(client: EvidenciasClient) -> Self {
        Self {
            client,
            users: Vec::new(),
            last_error: None,
        }
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        let result = self.client.users().list().await;
        self.users = track(&mut self.last_error, result)?;
        Ok(())
    }

    pub async fn change_role(&mut self, id: DbId, role: UserRole) -> Result<(), ClientError> {
        let result = self.client.users().change_role(id, role).await;
        let user = track(&mut self.last_error, result)?;
        self.replace(user);
        Ok(())
    }

    pub async fn update(&mut self, id: DbId, patch: &UserPatch) -> Result<(), ClientError> {
        let result = self.client.users().update(id, patch).await;
        let user = track(&mut self.last_error, result)?;
        self.replace(user);
        Ok(())
    }

    /// The account stays in the list, marked inactive.
    pub async fn deactivate(&mut self, id: DbId) -> Result<(), ClientError> {
        let result = self.client.users().deactivate(id).await;
        let user = track(&mut self.last_error, result)?;
        self.replace(user);
        Ok(())
    }

    fn replace(&mut self, user: User) {
        if let Some(slot) = self.users.iter_mut().find(|u| u.id == user.id) {
            *slot = user;
        }
    }
}
