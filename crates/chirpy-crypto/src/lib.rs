//! Credential primitives for Chirpy.
//!
//! This crate holds the two stateless building blocks of authentication:
//!
//! - **Passwords** ([`PasswordHasher`]) — Argon2id hashing and
//!   constant-time verification of user passwords.
//! - **Access tokens** ([`AccessTokenCodec`] trait, [`HmacJwtCodec`]) —
//!   short-lived, HMAC-signed JWTs that prove who a caller is.
//! - **Errors** ([`CryptoError`]) — what can go wrong while hashing,
//!   signing or verifying.
//!
//! Nothing here touches storage. Verifying an access token needs only the
//! token and the signing secret the codec was built with.
//!
//! ```text
//! Session (above)  ← decides when to mint and check tokens
//!     ↕
//! Crypto (this crate)  ← knows how to hash, sign and verify
//! ```

mod codec;
mod error;
mod password;
mod types;

pub use codec::{AccessTokenCodec, HmacJwtCodec, ISSUER};
pub use error::CryptoError;
pub use password::PasswordHasher;
pub use types::{Claims, UserId};
