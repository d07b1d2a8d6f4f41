//! Error types for the session layer.

use chirpy_crypto::CryptoError;

/// Errors raised by an [`AuthStore`](crate::AuthStore) implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated (duplicate email or token).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend failed (connection lost, query error, timeout).
    #[error("store backend failed: {0}")]
    Backend(String),
}

impl StoreError {
    /// Wraps any displayable backend error.
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Errors that can occur while logging in, refreshing, revoking or
/// authenticating.
///
/// Every token failure keeps its own variant even though the HTTP layer
/// currently answers all of them with 401: audit logging and clients
/// deciding whether to refresh depend on telling them apart.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Login failed. Deliberately does not say whether the email or the
    /// password was wrong.
    #[error("incorrect email or password")]
    Unauthorized,

    /// The access token's MAC does not match.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The access token declares a non-HMAC algorithm.
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The access token or refresh token is past its expiry.
    #[error("token expired")]
    Expired,

    /// The refresh token was explicitly revoked.
    #[error("refresh token revoked")]
    Revoked,

    /// No refresh token with that value exists.
    #[error("refresh token not found")]
    NotFound,

    /// The access token's subject is not a user id.
    #[error("malformed token subject: {0}")]
    MalformedSubject(String),

    /// The access token could not be parsed.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// No `Authorization` header, or a `Bearer ` prefix with no token.
    #[error("missing authorization header")]
    MissingHeader,

    /// The `Authorization` header does not use the Bearer scheme.
    #[error("authorization header must use the Bearer scheme")]
    MalformedHeader,

    /// Password hashing failed or a stored hash is corrupt.
    #[error("password hashing failed: {0}")]
    HashingFailure(String),

    /// An access token could not be signed.
    #[error("token signing failed: {0}")]
    TokenSigning(String),

    /// The store failed. Never retried here.
    #[error(transparent)]
    StoreFailure(#[from] StoreError),
}

impl AuthError {
    /// `true` for failures caused by the server rather than by the
    /// caller's credentials.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::HashingFailure(_) | Self::TokenSigning(_) | Self::StoreFailure(_)
        )
    }
}

impl From<CryptoError> for AuthError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidSignature => Self::InvalidSignature,
            CryptoError::UnsupportedAlgorithm(alg) => Self::UnsupportedAlgorithm(alg),
            CryptoError::Expired => Self::Expired,
            CryptoError::MalformedSubject(sub) => Self::MalformedSubject(sub),
            CryptoError::MalformedToken(msg) => Self::MalformedToken(msg),
            CryptoError::Hashing(msg) => Self::HashingFailure(msg),
            CryptoError::Signing(msg) => Self::TokenSigning(msg),
            e @ CryptoError::EmptySecret => Self::TokenSigning(e.to_string()),
        }
    }
}
