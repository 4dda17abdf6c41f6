//! Credential storage and the session lifecycle.
//!
//! A [`Session`] is created once and passed to the client by reference. It
//! owns the access/refresh token pair, the signed-in user and the
//! [`AuthState`] the view layer observes. Tokens survive restarts through a
//! [`TokenStore`].

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex, MutexGuard, RwLock};

use crate::error::ClientError;
use crate::models::User;

/// The two tokens issued by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

// ---------------------------------------------------------------------------
// Token stores
// ---------------------------------------------------------------------------

/// Durable home of the token pair.
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    async fn load(&self) -> Result<Option<TokenPair>, ClientError>;
    async fn save(&self, tokens: &TokenPair) -> Result<(), ClientError>;
    async fn clear(&self) -> Result<(), ClientError>;
}

/// Keeps the token pair in a JSON file. A missing file means "no session".
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn store_error(e: impl std::fmt::Display) -> ClientError {
    ClientError::TokenStore(e.to_string())
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<TokenPair>, ClientError> {
        match tokio::fs::read(&self.path).await {
            Ok(data) => serde_json::from_slice(&data).map(Some).map_err(store_error),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(store_error(e)),
        }
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(store_error)?;
        }
        let data = serde_json::to_vec(tokens).map_err(store_error)?;
        tokio::fs::write(&self.path, data).await.map_err(store_error)
    }

    async fn clear(&self) -> Result<(), ClientError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(store_error(e)),
        }
    }
}

/// Process-local store; tokens are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<TokenPair>, ClientError> {
        Ok(self.tokens.lock().await.clone())
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), ClientError> {
        *self.tokens.lock().await = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), ClientError> {
        *self.tokens.lock().await = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The signed-in identity and its credentials.
pub struct Session {
    store: Arc<dyn TokenStore>,
    tokens: RwLock<Option<TokenPair>>,
    user: RwLock<Option<User>>,
    state: watch::Sender<AuthState>,
    /// Held for the duration of a token refresh so concurrent 401s share one.
    refresh: Mutex<()>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(AuthState::Unauthenticated);
        Self {
            store,
            tokens: RwLock::new(None),
            user: RwLock::new(None),
            state,
            refresh: Mutex::new(()),
        }
    }

    /// Load persisted tokens. Returns whether a token pair was found.
    ///
    /// The user is not known until the server confirms the tokens.
    pub async fn init(&self) -> Result<bool, ClientError> {
        let loaded = self.store.load().await?;
        let found = loaded.is_some();
        *self.tokens.write().await = loaded;
        self.publish(if found {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        });
        Ok(found)
    }

    pub async fn tokens(&self) -> Option<TokenPair> {
        self.tokens.read().await.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.tokens
            .read()
            .await
            .as_ref()
            .map(|t| t.access_token.clone())
    }

    /// Start a session after login.
    pub async fn set_tokens(&self, tokens: TokenPair, user: User) -> Result<(), ClientError> {
        self.store.save(&tokens).await?;
        *self.tokens.write().await = Some(tokens);
        *self.user.write().await = Some(user);
        self.publish(AuthState::Authenticated);
        Ok(())
    }

    /// Swap in a rotated token pair, keeping the session authenticated.
    pub async fn replace_tokens(&self, tokens: TokenPair) -> Result<(), ClientError> {
        self.store.save(&tokens).await?;
        *self.tokens.write().await = Some(tokens);
        Ok(())
    }

    pub async fn set_user(&self, user: User) {
        *self.user.write().await = Some(user);
    }

    pub async fn current_user(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    /// End the session: wipe tokens and user, then the persisted copy.
    ///
    /// In-memory state is cleared even when the store fails.
    pub async fn clear(&self) -> Result<(), ClientError> {
        *self.tokens.write().await = None;
        *self.user.write().await = None;
        self.publish(AuthState::Unauthenticated);
        self.store.clear().await
    }

    pub fn state(&self) -> AuthState {
        *self.state.borrow()
    }

    /// Observe state transitions; `Unauthenticated` means "show the login page".
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub(crate) async fn lock_refresh(&self) -> MutexGuard<'_, ()> {
        self.refresh.lock().await
    }

    fn publish(&self, state: AuthState) {
        self.state.send_if_modified(|current| {
            let changed = *current != state;
            *current = state;
            changed
        });
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
