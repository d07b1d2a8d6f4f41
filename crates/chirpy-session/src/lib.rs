//! Session management for Chirpy.
//!
//! This crate handles the lifecycle of a user's credentials:
//!
//! 1. **Login** — checking an email/password pair and handing out a token
//!    pair ([`SessionManager::login`])
//! 2. **Refresh tokens** — long-lived, opaque, stored server-side and
//!    revocable ([`RefreshTokenStore`])
//! 3. **Authentication** — turning an `Authorization` header into a
//!    [`UserId`](chirpy_crypto::UserId) on every protected request
//!    ([`Authenticator`], [`extract_bearer`])
//!
//! # How it fits in the stack
//!
//! ```text
//! HTTP layer (above)  ← maps AuthError to a status code
//!     ↕
//! Session layer (this crate)  ← login / refresh / revoke / authenticate
//!     ↕                ↕
//! Crypto (below)     AuthStore (external persistence)
//! ```

#![allow(async_fn_in_trait)]

mod auth;
mod bearer;
mod error;
mod manager;
mod memory;
mod refresh;
mod session;
mod store;

pub use auth::Authenticator;
pub use bearer::{BearerPolicy, extract_bearer};
pub use error::{AuthError, StoreError};
pub use manager::SessionManager;
pub use memory::MemoryStore;
pub use refresh::{RefreshTokenStore, generate_token};
pub use session::{RefreshToken, Session, SessionConfig};
pub use store::{AuthStore, RefreshTokenRecord, UserRecord};
