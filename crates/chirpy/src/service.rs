//! `ChirpyAuth` builder.
//!
//! This is the entry point for wiring up authentication at startup. It
//! ties the layers together: config → codec → session manager → store.

use std::sync::Arc;

use chirpy_crypto::HmacJwtCodec;
use chirpy_session::{AuthStore, SessionManager};

use crate::{AuthConfig, ChirpyError};

/// Namespace for [`ChirpyAuth::builder`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use chirpy::prelude::*;
///
/// let config = AuthConfig::from_vars([("SECRET", "s3cret")])?;
/// let sessions = ChirpyAuth::builder()
///     .config(config)
///     .store(Arc::new(MemoryStore::new()))
///     .build()?;
/// # Ok::<(), ChirpyError>(())
/// ```
pub struct ChirpyAuth;

impl ChirpyAuth {
    /// Creates a new builder.
    pub fn builder<S: AuthStore>() -> ChirpyAuthBuilder<S> {
        ChirpyAuthBuilder::new()
    }
}

/// Builder for a [`SessionManager`] backed by HMAC-signed access tokens.
pub struct ChirpyAuthBuilder<S> {
    config: Option<AuthConfig>,
    store: Option<Arc<S>>,
}

impl<S: AuthStore> ChirpyAuthBuilder<S> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            config: None,
            store: None,
        }
    }

    /// Sets the configuration (usually from [`AuthConfig::from_env`]).
    pub fn config(mut self, config: AuthConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the persistence backend.
    pub fn store(mut self, store: Arc<S>) -> Self {
        self.store = Some(store);
        self
    }

    /// Validates the configuration and builds the session manager.
    ///
    /// # Errors
    /// - [`ChirpyError::Incomplete`] — no config or no store was given
    /// - [`ChirpyError::Config`] — the config fails validation
    /// - [`ChirpyError::Crypto`] — the signing key could not be built
    pub fn build(self) -> Result<SessionManager<S, HmacJwtCodec>, ChirpyError> {
        let config = self.config.ok_or(ChirpyError::Incomplete("a config"))?;
        let store = self.store.ok_or(ChirpyError::Incomplete("a store"))?;

        config.validate()?;
        let codec = HmacJwtCodec::new(&config.secret)?;
        let session_config = config.session_config();

        tracing::info!(
            access_token_ttl_secs = session_config.access_token_ttl.num_seconds(),
            refresh_token_ttl_days = session_config.refresh_token_ttl.num_days(),
            bearer_policy = ?session_config.bearer_policy,
            "auth configured"
        );

        Ok(SessionManager::new(store, codec, session_config))
    }
}

impl<S: AuthStore> Default for ChirpyAuthBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
