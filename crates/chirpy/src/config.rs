//! Startup configuration, read from the environment.
//!
//! Everything here is read once, validated, and then handed to
//! [`ChirpyAuthBuilder::config`](crate::ChirpyAuthBuilder::config). Nothing
//! reads the environment after startup.
//!
//! | Variable                 | Default  | Meaning                          |
//! |--------------------------|----------|----------------------------------|
//! | `SECRET`                 | required | HMAC key for access tokens       |
//! | `ACCESS_TOKEN_TTL_SECS`  | `3600`   | access-token lifetime            |
//! | `REFRESH_TOKEN_TTL_DAYS` | `60`     | refresh-token lifetime           |
//! | `BEARER_POLICY`          | `strict` | `strict` or `lenient`            |
//! | `LOG_FILTER`             | `info`   | `tracing` env-filter directive   |

use chirpy_session::{BearerPolicy, SessionConfig};
use chrono::Duration;
use serde::Deserialize;

/// Errors raised while loading or validating [`AuthConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is missing or could not be parsed.
    #[error("invalid environment: {0}")]
    Env(#[from] envy::Error),

    /// A `.env` file exists but could not be read.
    #[error("failed to load .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),

    /// `SECRET` is empty or whitespace.
    #[error("SECRET must be set to a non-empty value")]
    EmptySecret,

    /// A token lifetime is zero.
    #[error("{0} must be greater than zero")]
    InvalidTtl(&'static str),
}

/// Authentication settings.
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// Signing secret for access tokens.
    pub secret: String,

    #[serde(default = "default_access_token_ttl_secs")]
    pub access_token_ttl_secs: u64,

    #[serde(default = "default_refresh_token_ttl_days")]
    pub refresh_token_ttl_days: u64,

    #[serde(default)]
    pub bearer_policy: BearerPolicy,

    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_access_token_ttl_secs() -> u64 {
    3600
}

fn default_refresh_token_ttl_days() -> u64 {
    60
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .field("refresh_token_ttl_days", &self.refresh_token_ttl_days)
            .field("bearer_policy", &self.bearer_policy)
            .field("log_filter", &self.log_filter)
            .finish()
    }
}

impl AuthConfig {
    /// Loads `.env` (if present) and then the process environment.
    ///
    /// A missing `.env` file is fine; an unreadable one is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(dotenvy::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let config: Self = envy::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Builds a config from explicit `(NAME, value)` pairs instead of the
    /// process environment.
    ///
    /// ```rust
    /// use chirpy::AuthConfig;
    ///
    /// let config = AuthConfig::from_vars([("SECRET", "s3cret")]).unwrap();
    /// assert_eq!(config.access_token_ttl_secs, 3600);
    /// ```
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars.into_iter().map(|(k, v)| (k.into(), v.into()));
        let config: Self = envy::from_iter(vars)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects a blank secret and zero lifetimes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.access_token_ttl_secs == 0 {
            return Err(ConfigError::InvalidTtl("ACCESS_TOKEN_TTL_SECS"));
        }
        if self.refresh_token_ttl_days == 0 {
            return Err(ConfigError::InvalidTtl("REFRESH_TOKEN_TTL_DAYS"));
        }
        Ok(())
    }

    /// The session settings derived from this config.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            access_token_ttl: Duration::seconds(clamp(
                self.access_token_ttl_secs,
                MAX_TTL_DAYS * 86_400,
            )),
            refresh_token_ttl: Duration::days(clamp(self.refresh_token_ttl_days, MAX_TTL_DAYS)),
            bearer_policy: self.bearer_policy,
        }
    }
}

/// Upper bound on any token lifetime, so `now + ttl` cannot overflow.
const MAX_TTL_DAYS: i64 = 365 * 100;

fn clamp(value: u64, max: i64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX).min(max)
}
