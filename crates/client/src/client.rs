//! Authenticated transport and the auth operations.

use std::sync::Arc;

use evidencias_core::user::{LoginInput, RegisterInput};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{AttendanceApi, EventsApi, FilesApi, NotesApi, UsersApi};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::{AuthResponse, DataEnvelope, User};
use crate::session::{Session, TokenStore};

/// Client for one evidence API deployment.
///
/// Cheap to clone; clones share the HTTP connection pool and the session.
#[derive(Debug, Clone)]
pub struct EvidenciasClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl EvidenciasClient {
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(http, config, store))
    }

    /// Build on an existing [`reqwest::Client`] to share its connection pool.
    pub fn with_client(http: reqwest::Client, config: ClientConfig, store: Arc<dyn TokenStore>) -> Self {
        Self {
            http,
            base_url: config.base_url,
            session: Arc::new(Session::new(store)),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn events(&self) -> EventsApi<'_> {
        EventsApi::new(self)
    }

    pub fn files(&self) -> FilesApi<'_> {
        FilesApi::new(self)
    }

    pub fn attendance(&self) -> AttendanceApi<'_> {
        AttendanceApi::new(self)
    }

    pub fn notes(&self) -> NotesApi<'_> {
        NotesApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    // ---- auth ----

    /// Exchange credentials for a session.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ClientError> {
        if email.trim().is_empty() {
            return Err(ClientError::required("email"));
        }
        if password.is_empty() {
            return Err(ClientError::required("password"));
        }

        let body = LoginInput {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&body)
            .send()
            .await?;
        let auth: AuthResponse = read_json(ensure_success(response).await?).await?;

        self.session
            .set_tokens(auth.token_pair(), auth.user.clone())
            .await?;
        tracing::info!(user_id = %auth.user.id, "Signed in");
        Ok(auth.user)
    }

    /// Create an account, then sign in with it.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, ClientError> {
        for (field, value) in [("name", name), ("email", email), ("password", password)] {
            if value.trim().is_empty() {
                return Err(ClientError::required(field));
            }
        }

        let body = RegisterInput {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(&body)
            .send()
            .await?;
        let _: User = read_data(ensure_success(response).await?).await?;

        self.login(email, password).await
    }

    /// Revoke the server-side sessions if possible, then always forget the
    /// local credentials.
    pub async fn logout(&self) -> Result<(), ClientError> {
        if let Some(token) = self.session.access_token().await {
            let result = self
                .http
                .post(self.url("/auth/logout"))
                .bearer_auth(token)
                .send()
                .await;
            match result {
                Ok(response) if response.status().is_success() => {}
                Ok(response) => {
                    tracing::warn!(status = %response.status(), "Server logout rejected");
                }
                Err(e) => tracing::warn!(error = %e, "Server logout failed"),
            }
        }
        self.session.clear().await
    }

    pub async fn current_user(&self) -> Option<User> {
        self.session.current_user().await
    }

    /// Resume a persisted session.
    ///
    /// Returns `None` when there are no stored tokens or the server no longer
    /// accepts them (the session is cleared). Other failures propagate and
    /// keep the stored tokens.
    pub async fn restore(&self) -> Result<Option<User>, ClientError> {
        if !self.session.init().await? {
            return Ok(None);
        }
        match self.get_data::<User>("/auth/me").await {
            Ok(user) => {
                self.session.set_user(user.clone()).await;
                Ok(Some(user))
            }
            Err(e) if e.is_auth() => {
                self.session.clear().await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    // ---- transport ----

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send an authorized request built by `build`.
    ///
    /// On a 401 the token pair is refreshed once and the request rebuilt and
    /// replayed. A failed refresh, or a replay that is rejected again, clears
    /// the session.
    pub(crate) async fn send<F>(&self, build: F) -> Result<Response, ClientError>
    where
        F: Fn(&reqwest::Client) -> Result<RequestBuilder, ClientError>,
    {
        let token = self
            .session
            .access_token()
            .await
            .ok_or_else(|| ClientError::Auth("Not signed in".into()))?;

        let response = build(&self.http)?.bearer_auth(&token).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return ensure_success(response).await;
        }

        let fresh = self.refresh_after(&token).await?;
        let response = build(&self.http)?.bearer_auth(&fresh).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            let err = ClientError::from_response(response).await;
            tracing::warn!("Request rejected after token refresh; signing out");
            self.session.clear().await?;
            return Err(err);
        }
        ensure_success(response).await
    }

    /// Return a usable access token after `stale` was rejected.
    ///
    /// Only one refresh runs at a time. A caller that waited for another
    /// caller's refresh reuses its result.
    async fn refresh_after(&self, stale: &str) -> Result<String, ClientError> {
        let _guard = self.session.lock_refresh().await;

        let tokens = match self.session.tokens().await {
            Some(tokens) if tokens.access_token != stale => return Ok(tokens.access_token),
            Some(tokens) => tokens,
            None => return Err(ClientError::Auth("Session expired".into())),
        };

        tracing::debug!("Access token rejected; refreshing");
        let response = self
            .http
            .post(self.url("/auth/refresh"))
            .json(&serde_json::json!({ "refresh_token": tokens.refresh_token }))
            .send()
            .await?;

        if !response.status().is_success() {
            let err = ClientError::from_response(response).await;
            tracing::warn!(error = %err, "Token refresh failed; signing out");
            self.session.clear().await?;
            return Err(match err {
                ClientError::Auth(msg) => ClientError::Auth(msg),
                other => ClientError::Auth(other.to_string()),
            });
        }

        let auth: AuthResponse = read_json(response).await?;
        self.session.replace_tokens(auth.token_pair()).await?;
        self.session.set_user(auth.user).await;
        Ok(auth.access_token)
    }

    // ---- request helpers ----

    pub(crate) async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        let response = self.send(|http| Ok(http.get(&url))).await?;
        read_data(response).await
    }

    pub(crate) async fn get_data_query<Q, T>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        Q: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self.send(|http| Ok(http.get(&url).query(query))).await?;
        read_data(response).await
    }

    pub(crate) async fn post_data<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self.send(|http| Ok(http.post(&url).json(body))).await?;
        read_data(response).await
    }

    pub(crate) async fn put_data<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self.send(|http| Ok(http.put(&url).json(body))).await?;
        read_data(response).await
    }

    pub(crate) async fn patch_data<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self.send(|http| Ok(http.patch(&url).json(body))).await?;
        read_data(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let url = self.url(path);
        self.send(|http| Ok(http.delete(&url))).await?;
        Ok(())
    }
}

/// Pass a success response through; turn anything else into an error.
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ClientError::from_response(response).await)
    }
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Unwrap the `{ "data": ... }` envelope.
pub(crate) async fn read_data<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    read_json::<DataEnvelope<T>>(response).await.map(|e| e.data)
}
