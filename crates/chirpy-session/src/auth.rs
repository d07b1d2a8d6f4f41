//! The gate every protected endpoint goes through.
//!
//! Handlers don't care how a caller is authenticated, only who they are.
//! [`Authenticator`] is that seam: give it the raw `Authorization` header,
//! get back a [`UserId`] or an [`AuthError`]. [`SessionManager`]
//! implements it with stateless JWT verification; tests can plug in a
//! fixed-identity authenticator instead.
//!
//! [`SessionManager`]: crate::SessionManager

use chirpy_crypto::UserId;

use crate::AuthError;

/// Resolves a request's `Authorization` header to a user.
///
/// # Trait bounds
///
/// - `Send + Sync` → one authenticator is shared by all request tasks.
/// - `'static` → it lives as long as the server.
///
/// # Example
///
/// ```rust
/// use chirpy_crypto::UserId;
/// use chirpy_session::{AuthError, Authenticator, extract_bearer};
///
/// /// Treats the bearer token itself as the user id.
/// /// Only for local testing.
/// struct DevAuthenticator;
///
/// impl Authenticator for DevAuthenticator {
///     async fn authenticate(
///         &self,
///         authorization: Option<&str>,
///     ) -> Result<UserId, AuthError> {
///         let token = extract_bearer(authorization)?;
///         token
///             .parse()
///             .map_err(|_| AuthError::MalformedSubject(token))
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Authenticates a request from its raw `Authorization` header value.
    ///
    /// A failure must stop the request before any side effect happens.
    ///
    /// # Returns
    /// - `Ok(UserId)` — the caller's identity
    /// - `Err(AuthError)` — missing/malformed header or a rejected token
    fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> impl std::future::Future<Output = Result<UserId, AuthError>> + Send;
}
