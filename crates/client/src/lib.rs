//! Client for the evidence API.
//!
//! - [`session`] -- the credential store and its explicit lifecycle.
//! - [`client::EvidenciasClient`] -- authenticated transport with the
//!   one-shot token refresh, plus the auth operations.
//! - [`api`] -- one typed operation group per entity.
//! - [`views`] -- headless page state: what each screen loads, holds and
//!   shows after an action.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod views;

pub use client::EvidenciasClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use session::{AuthState, FileTokenStore, MemoryTokenStore, Session, TokenPair, TokenStore};
