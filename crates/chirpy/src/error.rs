//! Unified error type for the Chirpy auth stack.

use chirpy_crypto::CryptoError;
use chirpy_session::AuthError;

use crate::config::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// Startup code deals with this single type; the `#[from]` attributes let
/// `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ChirpyError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Building the token codec failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// An authentication flow failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The builder was missing a required part.
    #[error("builder is missing {0}")]
    Incomplete(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_error() {
        let err: ChirpyError = ConfigError::EmptySecret.into();
        assert!(matches!(err, ChirpyError::Config(_)));
        assert!(err.to_string().contains("SECRET"));
    }

    #[test]
    fn test_from_crypto_error() {
        let err: ChirpyError = CryptoError::EmptySecret.into();
        assert!(matches!(err, ChirpyError::Crypto(_)));
    }

    #[test]
    fn test_from_auth_error() {
        let err: ChirpyError = AuthError::Revoked.into();
        assert!(matches!(err, ChirpyError::Auth(AuthError::Revoked)));
    }

    #[test]
    fn test_incomplete_names_missing_part() {
        let err = ChirpyError::Incomplete("a store");
        assert_eq!(err.to_string(), "builder is missing a store");
    }
}
