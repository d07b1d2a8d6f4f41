//! Password hashing with Argon2id.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`):
//! the algorithm, its cost parameters and the salt travel with the digest,
//! so the string can be stored as-is and verified later without any other
//! context. Cost parameters are the `argon2` crate defaults, which keeps
//! every verification equally expensive.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordVerifier, SaltString};
use argon2::{Argon2, PasswordHasher as _};
use std::fmt;
use std::sync::OnceLock;

use crate::CryptoError;

/// Hashes and verifies user passwords.
///
/// Cheap to clone and safe to share; it only holds the KDF configuration.
#[derive(Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("algorithm", &"argon2id")
            .finish()
    }
}

impl PasswordHasher {
    /// Creates a hasher using Argon2id with default cost parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes `password` with a fresh random salt.
    ///
    /// # Errors
    /// Returns [`CryptoError::Hashing`] if the KDF cannot run.
    pub fn hash(&self, password: &str) -> Result<String, CryptoError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CryptoError::Hashing(e.to_string()))
    }

    /// Checks `password` against a stored PHC hash.
    ///
    /// The digest comparison is constant-time. A wrong password is
    /// `Ok(false)`, never an error.
    ///
    /// # Errors
    /// Returns [`CryptoError::Hashing`] if `hash` is not a valid PHC string
    /// or names parameters the KDF rejects.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, CryptoError> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| CryptoError::Hashing(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CryptoError::Hashing(e.to_string())),
        }
    }

    /// Runs a full verification against a fixed throwaway hash and
    /// discards the outcome.
    ///
    /// Call this when there is no stored hash to check (unknown account)
    /// so the caller spends the same KDF time as for a wrong password.
    pub fn verify_dummy(&self, password: &str) {
        if let Some(hash) = self.dummy_hash() {
            let _ = self.verify(password, hash);
        }
    }

    /// The throwaway hash used by [`verify_dummy`](Self::verify_dummy).
    /// Computed on first use; `None` only if the KDF itself fails.
    pub fn dummy_hash(&self) -> Option<&'static str> {
        static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

        DUMMY_HASH
            .get_or_init(|| self.hash("chirpy-unknown-account").ok())
            .as_deref()
    }
}
