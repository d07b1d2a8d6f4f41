//! Access-token codec: minting and checking signed JWTs.
//!
//! Access tokens are stateless. Everything needed to accept or reject one
//! is in the token itself (claims + signature) and in the secret the codec
//! was built with, so the per-request auth path never touches storage.
//!
//! The session layer only depends on the [`AccessTokenCodec`] trait; the
//! shipped implementation is [`HmacJwtCodec`] (compact JWS, HS256).

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{Claims, CryptoError, UserId};

/// The `iss` claim written into every access token.
pub const ISSUER: &str = "chirpy";

/// Algorithms accepted on verification: the HMAC family only. Anything
/// else (`none`, RSA, ECDSA) is refused before the signature is looked at.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] =
    [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Mints and verifies access tokens.
///
/// `Send + Sync + 'static` because one codec is built at startup and
/// shared by every request task.
pub trait AccessTokenCodec: Send + Sync + 'static {
    /// Mints a token for `user_id`, valid for `ttl` from now.
    ///
    /// # Errors
    /// Returns [`CryptoError::Signing`] if the token cannot be produced.
    fn issue(&self, user_id: UserId, ttl: Duration) -> Result<String, CryptoError>;

    /// Checks a token and returns the user it was issued to.
    ///
    /// # Errors
    /// - [`CryptoError::UnsupportedAlgorithm`] — header names a non-HMAC algorithm
    /// - [`CryptoError::InvalidSignature`] — MAC mismatch (wrong secret, tampering)
    /// - [`CryptoError::Expired`] — `exp` is in the past
    /// - [`CryptoError::MalformedSubject`] — `sub` is not a user id
    /// - [`CryptoError::MalformedToken`] — anything structurally broken
    fn verify(&self, token: &str) -> Result<UserId, CryptoError>;
}

// ---------------------------------------------------------------------------
// HmacJwtCodec
// ---------------------------------------------------------------------------

/// An [`AccessTokenCodec`] producing HS256-signed compact JWTs.
///
/// Tokens are readable by any standard JWT library configured with HMAC
/// and the same secret.
///
/// ```rust
/// use chirpy_crypto::{AccessTokenCodec, HmacJwtCodec, UserId};
/// use chrono::Duration;
///
/// let codec = HmacJwtCodec::new("super-secret").unwrap();
/// let user = UserId::new();
///
/// let token = codec.issue(user, Duration::hours(1)).unwrap();
/// assert_eq!(token.split('.').count(), 3);
/// assert_eq!(codec.verify(&token).unwrap(), user);
/// ```
#[derive(Clone)]
pub struct HmacJwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl HmacJwtCodec {
    /// Builds a codec keyed by `secret`.
    ///
    /// # Errors
    /// Returns [`CryptoError::EmptySecret`] for an empty secret: an empty
    /// HMAC key would let anyone mint valid tokens.
    pub fn new(secret: &str) -> Result<Self, CryptoError> {
        if secret.is_empty() {
            return Err(CryptoError::EmptySecret);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Mints a token as if the current time were `issued_at`.
    ///
    /// # Errors
    /// Returns [`CryptoError::Signing`] if `issued_at + ttl` falls outside
    /// the representable time range.
    pub fn issue_at(
        &self,
        user_id: UserId,
        ttl: Duration,
        issued_at: DateTime<Utc>,
    ) -> Result<String, CryptoError> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| CryptoError::Signing(format!("token lifetime {ttl} out of range")))?;
        let claims = Claims {
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Some(Uuid::new_v4().to_string()),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| CryptoError::Signing(e.to_string()))
    }

    /// Verifies a token against the clock reading `now`.
    ///
    /// Expiry has no leeway: a token whose `exp` is one second behind
    /// `now` is rejected.
    pub fn verify_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<UserId, CryptoError> {
        check_algorithm(token)?;

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation())?;
        let claims = data.claims;

        if now.timestamp() > claims.exp {
            return Err(CryptoError::Expired);
        }

        claims
            .sub
            .parse::<UserId>()
            .map_err(|_| CryptoError::MalformedSubject(claims.sub))
    }
}

impl AccessTokenCodec for HmacJwtCodec {
    fn issue(&self, user_id: UserId, ttl: Duration) -> Result<String, CryptoError> {
        self.issue_at(user_id, ttl, Utc::now())
    }

    fn verify(&self, token: &str) -> Result<UserId, CryptoError> {
        self.verify_at(token, Utc::now())
    }
}

impl fmt::Debug for HmacJwtCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacJwtCodec")
            .field("algorithm", &Algorithm::HS256)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Signature and shape checks only. Expiry is compared by hand in
/// [`HmacJwtCodec::verify_at`] so the clock can be injected.
fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
    validation.leeway = 0;
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}

/// Rejects tokens whose header declares anything but HMAC.
///
/// `jsonwebtoken` can't even parse a header naming `none` or an unknown
/// algorithm, so on a header parse failure the raw `alg` field is read
/// directly to tell "foreign algorithm" apart from "garbage". A name that
/// `jsonwebtoken` does know means the header broke for another reason.
fn check_algorithm(token: &str) -> Result<(), CryptoError> {
    match jsonwebtoken::decode_header(token) {
        Ok(header) if ACCEPTED_ALGORITHMS.contains(&header.alg) => Ok(()),
        Ok(header) => {
            tracing::warn!(alg = ?header.alg, "rejected token with non-HMAC algorithm");
            Err(CryptoError::UnsupportedAlgorithm(format!("{:?}", header.alg)))
        }
        Err(err) => match declared_algorithm(token) {
            Some(alg) if alg.parse::<Algorithm>().is_err() => {
                tracing::warn!(%alg, "rejected token with unknown algorithm");
                Err(CryptoError::UnsupportedAlgorithm(alg))
            }
            _ => Err(CryptoError::MalformedToken(err.to_string())),
        },
    }
}

fn declared_algorithm(token: &str) -> Option<String> {
    let header = token.split('.').next()?;
    let bytes = URL_SAFE_NO_PAD.decode(header.trim_end_matches('=')).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    value.get("alg")?.as_str().map(str::to_owned)
}
