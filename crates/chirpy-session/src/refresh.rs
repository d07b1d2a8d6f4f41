//! Refresh tokens: issue, validate, revoke.
//!
//! A refresh token is a random string stored server-side. Whoever holds
//! it can mint access tokens for the owning user until it expires or is
//! revoked. Tokens are never extended and never deleted here; expiry is
//! decided by comparing timestamps when the token is presented.
//!
//! Lifecycle of one token:
//!
//! ```text
//!   Active ──(revoke)──→ Revoked        (terminal, stored)
//!     │
//!     └──(expires_at passes)──→ Expired (computed on validate, not stored)
//! ```
//!
//! Refreshing does not rotate the token: the same refresh token keeps
//! working for its whole lifetime unless revoked, so a leaked one stays
//! usable until then.

use std::sync::Arc;

use chirpy_crypto::UserId;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::{AuthError, AuthStore, RefreshToken};

/// Manages refresh tokens on top of an [`AuthStore`].
#[derive(Debug)]
pub struct RefreshTokenStore<S> {
    store: Arc<S>,
    lifetime: Duration,
}

impl<S> Clone for RefreshTokenStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            lifetime: self.lifetime,
        }
    }
}

impl<S: AuthStore> RefreshTokenStore<S> {
    /// Creates a token store whose tokens live for `lifetime`.
    pub fn new(store: Arc<S>, lifetime: Duration) -> Self {
        Self { store, lifetime }
    }

    /// Issues and persists a new refresh token for `user_id`.
    ///
    /// # Errors
    /// - [`AuthError::TokenSigning`] — the lifetime pushes the expiry out
    ///   of the representable time range
    /// - [`AuthError::StoreFailure`] — the row can't be written
    pub async fn issue(&self, user_id: UserId) -> Result<RefreshToken, AuthError> {
        let expires_at = Utc::now().checked_add_signed(self.lifetime).ok_or_else(|| {
            AuthError::TokenSigning(format!("refresh token lifetime {} out of range", self.lifetime))
        })?;
        let token = generate_token();

        let record = self
            .store
            .create_refresh_token(&token, user_id, expires_at)
            .await
            .inspect_err(|e| tracing::error!(%user_id, error = %e, "failed to store refresh token"))?;

        tracing::info!(%user_id, expires_at = %record.expires_at, "refresh token issued");

        Ok(RefreshToken {
            token: record.token,
            expires_at: record.expires_at,
        })
    }

    /// Checks that `token` is live and returns its owner.
    ///
    /// # Errors
    /// - [`AuthError::NotFound`] — no such token
    /// - [`AuthError::Revoked`] — explicitly revoked (checked first, so a
    ///   revoked token is reported as revoked even once it has also expired)
    /// - [`AuthError::Expired`] — past `expires_at`
    pub async fn validate(&self, token: &str) -> Result<UserId, AuthError> {
        self.validate_at(token, Utc::now()).await
    }

    /// [`validate`](Self::validate) against the clock reading `now`.
    pub async fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<UserId, AuthError> {
        let record = self
            .store
            .get_refresh_token(token)
            .await?
            .ok_or(AuthError::NotFound)?;

        if record.is_revoked() {
            tracing::warn!(user_id = %record.user_id, "revoked refresh token presented");
            return Err(AuthError::Revoked);
        }
        if record.is_expired_at(now) {
            tracing::debug!(user_id = %record.user_id, "expired refresh token presented");
            return Err(AuthError::Expired);
        }

        Ok(record.user_id)
    }

    /// Revokes `token`. Revoking an already-revoked token succeeds and
    /// leaves its original `revoked_at` in place.
    ///
    /// # Errors
    /// [`AuthError::NotFound`] if the token was never issued.
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        let record = self
            .store
            .get_refresh_token(token)
            .await?
            .ok_or(AuthError::NotFound)?;

        if record.is_revoked() {
            tracing::debug!(user_id = %record.user_id, "refresh token already revoked");
            return Ok(());
        }

        self.store
            .mark_refresh_token_revoked(token, Utc::now())
            .await?;

        tracing::info!(user_id = %record.user_id, "refresh token revoked");
        Ok(())
    }
}

/// Generates a random 64-character hex string (256 bits of entropy).
///
/// Uses the thread-local CSPRNG, so tokens are unguessable. 256 bits also
/// makes an accidental collision between two users' tokens negligible.
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}
