//! Mapping auth outcomes onto HTTP responses.
//!
//! The web framework is not chosen here. Handlers call [`require_user`]
//! before doing any work and turn an [`AuthError`] into a response with
//! [`status_code`] and [`ErrorBody`]:
//!
//! ```text
//! request ──→ require_user(auth, header)
//!               ├─ Ok(user_id)  → run the handler
//!               └─ Err(e)       → status_code(&e), ErrorBody::from(&e)
//! ```
//!
//! Messages sent to clients are fixed strings; the error's own `Display`
//! (which may carry parser or backend detail) only goes to the log.

use chirpy_crypto::UserId;
use chirpy_session::{AuthError, Authenticator};
use http::StatusCode;
use serde::Serialize;

/// The HTTP status for `err`: 500 when the server is at fault, 401 for
/// everything the caller can fix by presenting other credentials.
pub fn status_code(err: &AuthError) -> StatusCode {
    if err.is_server_error() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::UNAUTHORIZED
    }
}

/// The client-facing message for `err`.
///
/// Login failures always read "Incorrect email or password", whichever
/// half of the pair was wrong.
pub fn public_message(err: &AuthError) -> &'static str {
    match err {
        AuthError::Unauthorized => "Incorrect email or password",
        AuthError::MissingHeader | AuthError::MalformedHeader => {
            "Unauthorized: Missing or malformed Authorization header"
        }
        AuthError::InvalidSignature
        | AuthError::UnsupportedAlgorithm(_)
        | AuthError::MalformedSubject(_)
        | AuthError::MalformedToken(_) => "Unauthorized: Token Invalid",
        AuthError::Expired => "Unauthorized: Token Expired",
        AuthError::NotFound => "Unauthorized: Refresh Token Invalid",
        AuthError::Revoked => "Unauthorized: Refresh Token Revoked",
        AuthError::TokenSigning(_) => "Unable to generate Web Token",
        AuthError::HashingFailure(_) | AuthError::StoreFailure(_) => "Something went wrong",
    }
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

impl From<&AuthError> for ErrorBody {
    fn from(err: &AuthError) -> Self {
        Self {
            error: public_message(err),
        }
    }
}

/// Authenticates a request, logging the rejection reason.
///
/// Call this first in every protected handler; on `Err` the handler must
/// return without side effects.
pub async fn require_user<A: Authenticator>(
    auth: &A,
    authorization: Option<&str>,
) -> Result<UserId, AuthError> {
    auth.authenticate(authorization).await.inspect_err(|e| {
        if e.is_server_error() {
            tracing::error!(error = %e, "authentication failed");
        } else {
            tracing::debug!(error = %e, "request rejected");
        }
    })
}
