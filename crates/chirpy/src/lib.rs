//! # Chirpy
//!
//! Authentication and session-token lifecycle for the Chirpy backend.
//!
//! Users log in with email and password and receive two credentials:
//! a short-lived signed access token sent on every request, and a
//! long-lived opaque refresh token stored server-side that can mint new
//! access tokens until it expires or is revoked.
//!
//! This crate wires the layers together: configuration from the
//! environment, a [`SessionManager`](chirpy_session::SessionManager) builder, logging setup, and the
//! mapping of auth errors onto HTTP responses.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chirpy::prelude::*;
//!
//! # async fn run() -> Result<(), ChirpyError> {
//! let config = AuthConfig::from_env()?;
//! init_tracing(&config.log_filter);
//!
//! let sessions = ChirpyAuth::builder()
//!     .config(config)
//!     .store(Arc::new(MemoryStore::new()))
//!     .build()?;
//!
//! let session = sessions.login("a@b.com", "secret1").await?;
//! let header = format!("Bearer {}", session.access_token);
//! let user_id = require_user(&sessions, Some(&header)).await?;
//! # let _ = user_id;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod service;
pub mod telemetry;

pub use config::{AuthConfig, ConfigError};
pub use error::ChirpyError;
pub use service::{ChirpyAuth, ChirpyAuthBuilder};

pub use chirpy_crypto as crypto;
pub use chirpy_session as session;

/// Convenient re-exports for the common case.
pub mod prelude {
    pub use crate::config::{AuthConfig, ConfigError};
    pub use crate::error::ChirpyError;
    pub use crate::http::{ErrorBody, public_message, require_user, status_code};
    pub use crate::service::{ChirpyAuth, ChirpyAuthBuilder};
    pub use crate::telemetry::init_tracing;

    pub use chirpy_crypto::{AccessTokenCodec, HmacJwtCodec, PasswordHasher, UserId};
    pub use chirpy_session::{
        AuthError, AuthStore, Authenticator, BearerPolicy, MemoryStore, RefreshToken,
        RefreshTokenStore, Session, SessionConfig, SessionManager, StoreError, UserRecord,
        extract_bearer,
    };
}
