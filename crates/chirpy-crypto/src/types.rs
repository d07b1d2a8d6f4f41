//! Identity and claim types shared by every Chirpy crate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// UserId
// ---------------------------------------------------------------------------

/// A unique identifier for a user account.
///
/// Newtype over a UUID so a user id can't be mixed up with any other
/// UUID-shaped value (a post id, a token id). Serializes as the bare
/// hyphenated string, which is also what goes into a token's `sub` claim.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generates a fresh random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// Claims
// ---------------------------------------------------------------------------

/// The payload of an access token.
///
/// Timestamps are Unix seconds (UTC), as in any standard JWT. `jti` is a
/// random per-token id; it makes two tokens minted for the same user in
/// the same second distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer, always [`ISSUER`](crate::ISSUER) for tokens we mint.
    #[serde(default)]
    pub iss: String,

    /// Subject: the user id as a string.
    pub sub: String,

    /// Issued at.
    #[serde(default)]
    pub iat: i64,

    /// Expires at.
    pub exp: i64,

    /// Token id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}
