//! In-process [`AuthStore`] for development and tests.
//!
//! Keeps users and refresh tokens in two `HashMap`s behind async
//! `RwLock`s. Nothing is persisted; restarting the process forgets every
//! account and session.

use std::collections::HashMap;

use chirpy_crypto::UserId;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{AuthStore, RefreshTokenRecord, StoreError, UserRecord};

/// A `HashMap`-backed store.
///
/// Users are keyed by email (the login lookup), refresh tokens by their
/// token string (the refresh/revoke lookup). Checks and writes for a row
/// happen under one write lock, so concurrent revokes of the same token
/// can't both "win".
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserRecord>>,
    refresh_tokens: RwLock<HashMap<String, RefreshTokenRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a refresh token row as-is, bypassing the normal issue path.
    ///
    /// Lets tests and fixtures seed rows with arbitrary timestamps
    /// (already expired, already revoked).
    pub async fn insert_refresh_token(&self, record: RefreshTokenRecord) {
        self.refresh_tokens
            .write()
            .await
            .insert(record.token.clone(), record);
    }

    /// Number of refresh token rows ever issued, in any state.
    pub async fn refresh_token_count(&self) -> usize {
        self.refresh_tokens.read().await.len()
    }

    /// Number of registered users.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

impl AuthStore for MemoryStore {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn create_user(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(email) {
            return Err(StoreError::Conflict(format!("email {email} already registered")));
        }

        let now = Utc::now();
        let user = UserRecord {
            id: UserId::new(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_chirpy_red: false,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord, StoreError> {
        let mut tokens = self.refresh_tokens.write().await;
        if tokens.contains_key(token) {
            return Err(StoreError::Conflict("refresh token already exists".into()));
        }

        let now = Utc::now();
        let record = RefreshTokenRecord {
            token: token.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
            expires_at,
            revoked_at: None,
        };
        tokens.insert(record.token.clone(), record.clone());
        Ok(record)
    }

    async fn get_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StoreError> {
        Ok(self.refresh_tokens.read().await.get(token).cloned())
    }

    async fn mark_refresh_token_revoked(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut tokens = self.refresh_tokens.write().await;
        if let Some(record) = tokens.get_mut(token) {
            if record.revoked_at.is_none() {
                record.revoked_at = Some(revoked_at);
                record.updated_at = revoked_at;
            }
        }
        Ok(())
    }
}
