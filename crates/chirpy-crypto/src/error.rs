//! Error types for the crypto layer.
//!
//! Token failures are split into distinct variants because callers branch
//! on them: an expired token asks the client to refresh, a bad signature
//! or a foreign algorithm points at tampering.

/// Errors that can occur while hashing passwords or handling access tokens.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// The token's MAC does not match the configured secret.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The token declares an algorithm outside the HMAC family
    /// (`none`, RSA, ECDSA, or an unknown name).
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The token's `exp` claim lies in the past.
    #[error("token expired")]
    Expired,

    /// The `sub` claim is not a valid user identifier.
    #[error("malformed token subject: {0}")]
    MalformedSubject(String),

    /// The token could not be parsed at all: wrong segment count, bad
    /// base64, invalid JSON, or missing required claims.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The password KDF failed, or a stored hash is not a valid PHC string.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Producing a token signature failed.
    #[error("token signing failed: {0}")]
    Signing(String),

    /// A codec was constructed with an empty signing secret.
    #[error("signing secret must not be empty")]
    EmptySecret,
}

impl From<jsonwebtoken::errors::Error> for CryptoError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => {
                Self::UnsupportedAlgorithm(err.to_string())
            }
            ErrorKind::InvalidSubject => Self::MalformedSubject(err.to_string()),
            _ => Self::MalformedToken(err.to_string()),
        }
    }
}
