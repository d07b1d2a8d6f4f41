//! The persistence boundary.
//!
//! The session layer never owns user or refresh-token rows; it reads and
//! writes them through [`AuthStore`]. A Postgres-backed service and the
//! in-process [`MemoryStore`](crate::MemoryStore) are interchangeable
//! behind this trait.

use std::future::Future;

use chirpy_crypto::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// A user account as the store holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    /// PHC-formatted Argon2id hash. Never the plaintext.
    #[serde(skip_serializing, default)]
    pub hashed_password: String,
    pub is_chirpy_red: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted refresh token.
///
/// Only `revoked_at` and `updated_at` ever change after insertion, and
/// `revoked_at` only goes from `None` to `Some`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// `true` once the token has been revoked.
    #[inline]
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// `true` if `now` is past the token's expiry.
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Storage operations the session layer needs.
///
/// # Trait bounds
///
/// `Send + Sync + 'static` because one store is shared (behind an `Arc`)
/// by every request task, and each returned future must be `Send` so
/// callers can run it on any runtime thread.
///
/// Implementations must make a completed `mark_refresh_token_revoked`
/// visible to every later `get_refresh_token` for the same token.
pub trait AuthStore: Send + Sync + 'static {
    /// Looks a user up by email. `Ok(None)` when no such user exists.
    fn get_user_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, StoreError>> + Send;

    /// Inserts a user.
    ///
    /// # Errors
    /// [`StoreError::Conflict`] if the email is already taken.
    fn create_user(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> impl Future<Output = Result<UserRecord, StoreError>> + Send;

    /// Inserts a refresh token row bound to `user_id`.
    ///
    /// # Errors
    /// [`StoreError::Conflict`] if the token string already exists.
    fn create_refresh_token(
        &self,
        token: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<RefreshTokenRecord, StoreError>> + Send;

    /// Looks a refresh token up by its string, whatever its state.
    fn get_refresh_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<RefreshTokenRecord>, StoreError>> + Send;

    /// Sets `revoked_at` and `updated_at` to `revoked_at` if the token is
    /// not revoked yet. A no-op for an already-revoked or unknown token.
    fn mark_refresh_token_revoked(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
