//! Session types: what a successful login hands back, and the knobs that
//! control token lifetimes.

use chirpy_crypto::UserId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::BearerPolicy;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for token lifetimes and header parsing.
///
/// Built once at startup and never changed afterwards.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long an access token stays valid. Default: 1 hour.
    pub access_token_ttl: Duration,

    /// How long a refresh token stays valid. Default: 60 days.
    pub refresh_token_ttl: Duration,

    /// How strictly the `Authorization` header is parsed.
    pub bearer_policy: BearerPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            access_token_ttl: Duration::hours(1),
            refresh_token_ttl: Duration::days(60),
            bearer_policy: BearerPolicy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// RefreshToken
// ---------------------------------------------------------------------------

/// A freshly issued refresh token as returned to the client.
///
/// The token string is opaque: 64 lowercase hex characters with no
/// structure a client may rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The result of a successful login.
///
/// `access_token` goes into `Authorization: Bearer ...` on every request;
/// `refresh_token` is only presented to the refresh and revoke endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub access_token: String,
    pub refresh_token: RefreshToken,
}
