use crate::client::EvidenciasClient;
use crate::error::ClientError;
use crate::models::User;

use super::track;

/// Sign-in and sign-up form. Fields are kept after a failed attempt.
#[derive(Debug)]
pub struct LoginPage {
    client: EvidenciasClient,
    pub name: String,
    pub email: String,
    pub password: String,
    pub last_error: Option<String>,
}

impl LoginPage {
    pub fn new(client: EvidenciasClient) -> Self {
        Self {
            client,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            last_error: None,
        }
    }

    pub async fn submit_login(&mut self) -> Result<User, ClientError> {
        let result = self.client.login(&self.email, &self.password).await;
        track(&mut self.last_error, result)
    }

    pub async fn submit_register(&mut self) -> Result<User, ClientError> {
        let result = self
            .client
            .register(&self.name, &self.email, &self.password)
            .await;
        track(&mut self.last_error, result)
    }
}
