//! The session manager: login, refresh, revoke and authenticate.
//!
//! This ties the pieces together:
//! - [`PasswordHasher`] checks credentials at login
//! - an [`AccessTokenCodec`] mints and verifies access tokens
//! - [`RefreshTokenStore`] owns the long-lived refresh tokens
//!
//! ## Flows
//!
//! ```text
//! login(email, pw) ──→ verify pw ──→ access token + refresh token
//! refresh(rt)      ──→ validate rt ──→ new access token (rt unchanged)
//! revoke(rt)       ──→ mark rt revoked
//! authenticate(h)  ──→ extract bearer ──→ verify access token   (no store)
//! ```
//!
//! Only login, refresh and revoke touch the store. The per-request
//! `authenticate` path is pure computation over the token and the secret.
//!
//! # Concurrency note
//!
//! `SessionManager` holds no mutable state of its own; wrap it in an `Arc`
//! and call it from any number of tasks. Consistency of refresh-token rows
//! is the store's job.

use std::sync::Arc;

use chirpy_crypto::{AccessTokenCodec, HmacJwtCodec, PasswordHasher, UserId};

use crate::{
    AuthError, AuthStore, Authenticator, RefreshTokenStore, Session, SessionConfig, UserRecord,
};

/// Orchestrates the user-facing authentication flows.
#[derive(Debug)]
pub struct SessionManager<S, C = HmacJwtCodec> {
    store: Arc<S>,
    refresh_tokens: RefreshTokenStore<S>,
    codec: C,
    hasher: PasswordHasher,
    config: SessionConfig,
}

impl<S, C> SessionManager<S, C>
where
    S: AuthStore,
    C: AccessTokenCodec,
{
    /// Creates a manager over `store`, minting access tokens with `codec`.
    pub fn new(store: Arc<S>, codec: C, config: SessionConfig) -> Self {
        let refresh_tokens =
            RefreshTokenStore::new(Arc::clone(&store), config.refresh_token_ttl);
        Self {
            store,
            refresh_tokens,
            codec,
            hasher: PasswordHasher::new(),
            config,
        }
    }

    /// The configuration this manager was built with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The underlying refresh-token store.
    pub fn refresh_tokens(&self) -> &RefreshTokenStore<S> {
        &self.refresh_tokens
    }

    /// Creates a user account with a hashed password.
    ///
    /// The Argon2 cost is paid on the calling task.
    ///
    /// # Errors
    /// - [`AuthError::HashingFailure`] — the KDF failed
    /// - [`AuthError::StoreFailure`] — e.g. the email is already taken
    pub async fn register(&self, email: &str, password: &str) -> Result<UserRecord, AuthError> {
        let hashed = self.hasher.hash(password)?;
        let user = self.store.create_user(email, &hashed).await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Logs a user in and hands out a fresh token pair.
    ///
    /// Each login creates a new refresh token; earlier sessions of the same
    /// user stay valid. An unknown email still runs one password
    /// verification, so both rejections take about as long. The Argon2
    /// cost is paid on the calling task.
    ///
    /// # Errors
    /// - [`AuthError::Unauthorized`] — unknown email or wrong password
    ///   (the caller cannot tell which)
    /// - [`AuthError::HashingFailure`] — the stored hash is corrupt
    /// - [`AuthError::StoreFailure`] — the store failed
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let Some(user) = self.store.get_user_by_email(email).await? else {
            self.hasher.verify_dummy(password);
            tracing::debug!("login rejected: unknown email");
            return Err(AuthError::Unauthorized);
        };

        if !self.hasher.verify(password, &user.hashed_password)? {
            tracing::debug!(user_id = %user.id, "login rejected: wrong password");
            return Err(AuthError::Unauthorized);
        }

        let access_token = self.codec.issue(user.id, self.config.access_token_ttl)?;
        let refresh_token = self.refresh_tokens.issue(user.id).await?;

        tracing::info!(user_id = %user.id, "user logged in");

        Ok(Session {
            user_id: user.id,
            access_token,
            refresh_token,
        })
    }

    /// Exchanges a live refresh token for a new access token.
    ///
    /// The refresh token itself is neither rotated nor extended.
    ///
    /// # Errors
    /// [`AuthError::NotFound`], [`AuthError::Revoked`], [`AuthError::Expired`]
    /// from validation, or [`AuthError::StoreFailure`].
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let user_id = self.refresh_tokens.validate(refresh_token).await?;
        let access_token = self.codec.issue(user_id, self.config.access_token_ttl)?;

        tracing::info!(%user_id, "access token refreshed");
        Ok(access_token)
    }

    /// Revokes a refresh token (logout). Idempotent.
    ///
    /// # Errors
    /// [`AuthError::NotFound`] for an unknown token, or
    /// [`AuthError::StoreFailure`].
    pub async fn revoke_session(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.refresh_tokens.revoke(refresh_token).await
    }

    /// Verifies a bare access token. No store access.
    pub fn verify_access_token(&self, token: &str) -> Result<UserId, AuthError> {
        self.codec.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "access token rejected");
            AuthError::from(e)
        })
    }

    /// Extracts the bearer token from `authorization` and verifies it.
    pub fn authenticate_header(&self, authorization: Option<&str>) -> Result<UserId, AuthError> {
        let token = self.config.bearer_policy.extract(authorization)?;
        self.verify_access_token(&token)
    }
}

impl<S, C> Authenticator for SessionManager<S, C>
where
    S: AuthStore,
    C: AccessTokenCodec,
{
    async fn authenticate(&self, authorization: Option<&str>) -> Result<UserId, AuthError> {
        self.authenticate_header(authorization)
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `SessionManager`, run against `MemoryStore`.
    //!
    //! Naming: `test_{function}_{scenario}_{expected}`.

    use super::*;
    use crate::{BearerPolicy, MemoryStore, StoreError};
    use chrono::Duration;

    const SECRET: &str = "test-signing-secret";

    // -- Helpers ----------------------------------------------------------

    fn manager() -> (Arc<MemoryStore>, SessionManager<MemoryStore>) {
        manager_with(SessionConfig::default())
    }

    fn manager_with(config: SessionConfig) -> (Arc<MemoryStore>, SessionManager<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let codec = HmacJwtCodec::new(SECRET).unwrap();
        let mgr = SessionManager::new(Arc::clone(&store), codec, config);
        (store, mgr)
    }

    /// A store whose every call fails, to check error propagation.
    struct BrokenStore;

    impl AuthStore for BrokenStore {
        async fn get_user_by_email(&self, _: &str) -> Result<Option<UserRecord>, StoreError> {
            Err(StoreError::backend("db down"))
        }
        async fn create_user(&self, _: &str, _: &str) -> Result<UserRecord, StoreError> {
            Err(StoreError::backend("db down"))
        }
        async fn create_refresh_token(
            &self,
            _: &str,
            _: UserId,
            _: chrono::DateTime<chrono::Utc>,
        ) -> Result<crate::RefreshTokenRecord, StoreError> {
            Err(StoreError::backend("db down"))
        }
        async fn get_refresh_token(
            &self,
            _: &str,
        ) -> Result<Option<crate::RefreshTokenRecord>, StoreError> {
            Err(StoreError::backend("db down"))
        }
        async fn mark_refresh_token_revoked(
            &self,
            _: &str,
            _: chrono::DateTime<chrono::Utc>,
        ) -> Result<(), StoreError> {
            Err(StoreError::backend("db down"))
        }
    }

    // =====================================================================
    // register()
    // =====================================================================

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let (store, mgr) = manager();

        mgr.register("a@b.com", "secret1").await.unwrap();

        let user = store.get_user_by_email("a@b.com").await.unwrap().unwrap();
        assert_ne!(user.hashed_password, "secret1");
        assert!(user.hashed_password.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_returns_store_failure() {
        let (_store, mgr) = manager();
        mgr.register("a@b.com", "secret1").await.unwrap();

        let result = mgr.register("a@b.com", "other").await;

        assert!(matches!(result, Err(AuthError::StoreFailure(StoreError::Conflict(_)))));
    }

    // =====================================================================
    // login()
    // =====================================================================

    #[tokio::test]
    async fn test_login_valid_credentials_returns_verifiable_session() {
        let (store, mgr) = manager();
        let user = mgr.register("a@b.com", "secret1").await.unwrap();

        let session = mgr.login("a@b.com", "secret1").await.expect("login should succeed");

        assert_eq!(session.user_id, user.id);
        let codec = HmacJwtCodec::new(SECRET).unwrap();
        assert_eq!(codec.verify(&session.access_token).unwrap(), user.id);

        let row = store
            .get_refresh_token(&session.refresh_token.token)
            .await
            .unwrap()
            .expect("refresh token should be persisted");
        assert_eq!(row.user_id, user.id);
        assert_eq!(row.revoked_at, None);
    }

    #[tokio::test]
    async fn test_login_wrong_password_returns_unauthorized() {
        let (store, mgr) = manager();
        mgr.register("a@b.com", "secret1").await.unwrap();

        let result = mgr.login("a@b.com", "secret2").await;

        assert!(matches!(result, Err(AuthError::Unauthorized)));
        assert_eq!(store.refresh_token_count().await, 0, "no token on failure");
    }

    #[tokio::test]
    async fn test_login_unknown_email_returns_same_error_as_wrong_password() {
        let (_store, mgr) = manager();
        mgr.register("a@b.com", "secret1").await.unwrap();

        let unknown = mgr.login("x@b.com", "secret1").await.unwrap_err();
        let wrong = mgr.login("a@b.com", "nope").await.unwrap_err();

        assert!(matches!(unknown, AuthError::Unauthorized));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_login_unknown_email_takes_as_long_as_wrong_password() {
        let (_store, mgr) = manager();
        mgr.register("a@b.com", "secret1").await.unwrap();
        // First call also computes the throwaway hash.
        let _ = mgr.login("warm@b.com", "secret1").await;

        let start = std::time::Instant::now();
        for _ in 0..3 {
            let _ = mgr.login("x@b.com", "secret1").await;
        }
        let unknown = start.elapsed();

        let start = std::time::Instant::now();
        for _ in 0..3 {
            let _ = mgr.login("a@b.com", "nope").await;
        }
        let wrong = start.elapsed();

        assert!(unknown * 4 >= wrong, "unknown={unknown:?} wrong={wrong:?}");
    }

    #[tokio::test]
    async fn test_login_overflowing_refresh_ttl_returns_error_without_panicking() {
        let (store, mgr) = manager_with(SessionConfig {
            refresh_token_ttl: Duration::MAX,
            ..SessionConfig::default()
        });
        mgr.register("a@b.com", "secret1").await.unwrap();

        let result = mgr.login("a@b.com", "secret1").await;

        assert!(matches!(result, Err(AuthError::TokenSigning(_))));
        assert_eq!(store.refresh_token_count().await, 0);
    }

    #[tokio::test]
    async fn test_login_overflowing_access_ttl_returns_error_without_panicking() {
        let (_store, mgr) = manager_with(SessionConfig {
            access_token_ttl: Duration::MAX,
            ..SessionConfig::default()
        });
        mgr.register("a@b.com", "secret1").await.unwrap();

        let result = mgr.login("a@b.com", "secret1").await;

        assert!(matches!(result, Err(AuthError::TokenSigning(_))));
    }

    #[tokio::test]
    async fn test_login_corrupt_stored_hash_returns_hashing_failure() {
        let (store, mgr) = manager();
        store.create_user("a@b.com", "not-a-phc-string").await.unwrap();

        let result = mgr.login("a@b.com", "secret1").await;

        assert!(matches!(result, Err(AuthError::HashingFailure(_))));
    }

    #[tokio::test]
    async fn test_login_twice_creates_two_sessions() {
        let (store, mgr) = manager();
        mgr.register("a@b.com", "secret1").await.unwrap();

        let a = mgr.login("a@b.com", "secret1").await.unwrap();
        let b = mgr.login("a@b.com", "secret1").await.unwrap();

        assert_ne!(a.refresh_token.token, b.refresh_token.token);
        assert_eq!(store.refresh_token_count().await, 2);
    }

    #[tokio::test]
    async fn test_login_store_down_returns_store_failure() {
        let codec = HmacJwtCodec::new(SECRET).unwrap();
        let mgr = SessionManager::new(Arc::new(BrokenStore), codec, SessionConfig::default());

        let result = mgr.login("a@b.com", "secret1").await;

        assert!(matches!(result, Err(AuthError::StoreFailure(_))));
    }

    // =====================================================================
    // refresh()
    // =====================================================================

    #[tokio::test]
    async fn test_refresh_live_token_returns_new_access_token() {
        let (_store, mgr) = manager();
        let user = mgr.register("a@b.com", "secret1").await.unwrap();
        let session = mgr.login("a@b.com", "secret1").await.unwrap();

        let access = mgr.refresh(&session.refresh_token.token).await.unwrap();

        assert_eq!(mgr.verify_access_token(&access).unwrap(), user.id);
    }

    #[tokio::test]
    async fn test_refresh_twice_gives_distinct_valid_tokens_and_leaves_row_alone() {
        let (store, mgr) = manager();
        let user = mgr.register("a@b.com", "secret1").await.unwrap();
        let session = mgr.login("a@b.com", "secret1").await.unwrap();
        let rt = &session.refresh_token.token;
        let before = store.get_refresh_token(rt).await.unwrap().unwrap();

        let first = mgr.refresh(rt).await.unwrap();
        let second = mgr.refresh(rt).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(mgr.verify_access_token(&first).unwrap(), user.id);
        assert_eq!(mgr.verify_access_token(&second).unwrap(), user.id);
        let after = store.get_refresh_token(rt).await.unwrap().unwrap();
        assert_eq!(before, after, "refresh must not mutate the refresh token");
    }

    #[tokio::test]
    async fn test_refresh_unknown_token_returns_not_found() {
        let (_store, mgr) = manager();

        let result = mgr.refresh("nonexistent-token").await;

        assert!(matches!(result, Err(AuthError::NotFound)));
    }

    #[tokio::test]
    async fn test_refresh_after_revoke_returns_revoked() {
        let (_store, mgr) = manager();
        mgr.register("a@b.com", "secret1").await.unwrap();
        let session = mgr.login("a@b.com", "secret1").await.unwrap();

        mgr.revoke_session(&session.refresh_token.token).await.unwrap();

        let result = mgr.refresh(&session.refresh_token.token).await;
        assert!(matches!(result, Err(AuthError::Revoked)));
    }

    #[tokio::test]
    async fn test_refresh_with_access_token_returns_not_found() {
        // An access token is not a refresh token.
        let (_store, mgr) = manager();
        mgr.register("a@b.com", "secret1").await.unwrap();
        let session = mgr.login("a@b.com", "secret1").await.unwrap();

        let result = mgr.refresh(&session.access_token).await;

        assert!(matches!(result, Err(AuthError::NotFound)));
    }

    // =====================================================================
    // revoke_session()
    // =====================================================================

    #[tokio::test]
    async fn test_revoke_session_twice_is_ok() {
        let (_store, mgr) = manager();
        mgr.register("a@b.com", "secret1").await.unwrap();
        let session = mgr.login("a@b.com", "secret1").await.unwrap();

        mgr.revoke_session(&session.refresh_token.token).await.unwrap();
        mgr.revoke_session(&session.refresh_token.token).await.unwrap();
    }

    #[tokio::test]
    async fn test_revoke_session_does_not_invalidate_issued_access_token() {
        // Access tokens are stateless; they run until their own expiry.
        let (_store, mgr) = manager();
        let user = mgr.register("a@b.com", "secret1").await.unwrap();
        let session = mgr.login("a@b.com", "secret1").await.unwrap();

        mgr.revoke_session(&session.refresh_token.token).await.unwrap();

        assert_eq!(mgr.verify_access_token(&session.access_token).unwrap(), user.id);
    }

    // =====================================================================
    // authenticate()
    // =====================================================================

    #[tokio::test]
    async fn test_authenticate_valid_bearer_returns_user() {
        let (_store, mgr) = manager();
        let user = mgr.register("a@b.com", "secret1").await.unwrap();
        let session = mgr.login("a@b.com", "secret1").await.unwrap();
        let header = format!("Bearer {}", session.access_token);

        let resolved = mgr.authenticate(Some(&header)).await.unwrap();

        assert_eq!(resolved, user.id);
    }

    #[tokio::test]
    async fn test_authenticate_missing_header_returns_missing_header() {
        let (_store, mgr) = manager();

        let result = mgr.authenticate(None).await;

        assert!(matches!(result, Err(AuthError::MissingHeader)));
    }

    #[tokio::test]
    async fn test_authenticate_foreign_secret_returns_invalid_signature() {
        let (_store, mgr) = manager();
        let other = HmacJwtCodec::new("someone-elses-secret").unwrap();
        let token = other.issue(UserId::new(), Duration::hours(1)).unwrap();
        let header = format!("Bearer {token}");

        let result = mgr.authenticate(Some(&header)).await;

        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    #[tokio::test]
    async fn test_authenticate_expired_token_returns_expired() {
        let (_store, mgr) = manager();
        let codec = HmacJwtCodec::new(SECRET).unwrap();
        let token = codec
            .issue_at(UserId::new(), Duration::hours(1), chrono::Utc::now() - Duration::hours(2))
            .unwrap();
        let header = format!("Bearer {token}");

        let result = mgr.authenticate(Some(&header)).await;

        assert!(matches!(result, Err(AuthError::Expired)));
    }

    #[tokio::test]
    async fn test_authenticate_does_not_touch_store() {
        // The hot path must work even when the store is unreachable.
        let codec = HmacJwtCodec::new(SECRET).unwrap();
        let token = codec.issue(UserId::new(), Duration::hours(1)).unwrap();
        let mgr = SessionManager::new(Arc::new(BrokenStore), codec, SessionConfig::default());
        let header = format!("Bearer {token}");

        assert!(mgr.authenticate(Some(&header)).await.is_ok());
    }

    #[tokio::test]
    async fn test_authenticate_lenient_policy_accepts_bare_token() {
        let (_store, mgr) = manager_with(SessionConfig {
            bearer_policy: BearerPolicy::Lenient,
            ..SessionConfig::default()
        });
        let user = mgr.register("a@b.com", "secret1").await.unwrap();
        let session = mgr.login("a@b.com", "secret1").await.unwrap();

        let resolved = mgr.authenticate(Some(&session.access_token)).await.unwrap();

        assert_eq!(resolved, user.id);
    }

    #[tokio::test]
    async fn test_authenticate_strict_policy_rejects_bare_token() {
        let (_store, mgr) = manager();
        mgr.register("a@b.com", "secret1").await.unwrap();
        let session = mgr.login("a@b.com", "secret1").await.unwrap();

        let result = mgr.authenticate(Some(&session.access_token)).await;

        assert!(matches!(result, Err(AuthError::MalformedHeader)));
    }

    #[tokio::test]
    async fn test_access_token_ttl_follows_config() {
        let (_store, mgr) = manager_with(SessionConfig {
            access_token_ttl: Duration::minutes(5),
            ..SessionConfig::default()
        });
        mgr.register("a@b.com", "secret1").await.unwrap();
        let session = mgr.login("a@b.com", "secret1").await.unwrap();
        let codec = HmacJwtCodec::new(SECRET).unwrap();

        let later = chrono::Utc::now() + Duration::minutes(6);

        assert!(matches!(
            codec.verify_at(&session.access_token, later),
            Err(chirpy_crypto::CryptoError::Expired)
        ));
    }
}
