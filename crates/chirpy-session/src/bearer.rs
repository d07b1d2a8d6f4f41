//! Pulling the token out of an `Authorization` header.
//!
//! The expected form is `Bearer <token>`. What happens when the prefix is
//! missing is a policy decision, see [`BearerPolicy`].

use serde::{Deserialize, Serialize};

use crate::AuthError;

const BEARER_PREFIX: &str = "Bearer ";

/// How to treat an `Authorization` header that lacks the `Bearer ` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BearerPolicy {
    /// The header must start with `Bearer `. Anything else is
    /// [`AuthError::MalformedHeader`].
    #[default]
    Strict,

    /// Removes the first `Bearer ` occurrence and returns the rest, so a
    /// header with no prefix at all is taken whole as the token. Kept for
    /// clients that send bare tokens.
    Lenient,
}

impl BearerPolicy {
    /// Extracts the token from a raw `Authorization` header value.
    ///
    /// # Errors
    /// - [`AuthError::MissingHeader`] — header absent or empty, or nothing
    ///   after the prefix
    /// - [`AuthError::MalformedHeader`] — no `Bearer ` prefix (strict only)
    pub fn extract(self, header: Option<&str>) -> Result<String, AuthError> {
        let header = match header {
            Some(h) if !h.is_empty() => h,
            _ => return Err(AuthError::MissingHeader),
        };

        let token = match self {
            BearerPolicy::Strict => header
                .strip_prefix(BEARER_PREFIX)
                .ok_or(AuthError::MalformedHeader)?
                .to_string(),
            BearerPolicy::Lenient => header.replacen(BEARER_PREFIX, "", 1),
        };

        if token.is_empty() {
            return Err(AuthError::MissingHeader);
        }
        Ok(token)
    }
}

/// Extracts a bearer token using the [`Strict`](BearerPolicy::Strict) policy.
///
/// ```rust
/// use chirpy_session::extract_bearer;
///
/// assert_eq!(extract_bearer(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
/// assert!(extract_bearer(Some("")).is_err());
/// ```
pub fn extract_bearer(header: Option<&str>) -> Result<String, AuthError> {
    BearerPolicy::Strict.extract(header)
}
