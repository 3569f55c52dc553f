//! Identity resolution from an `Authorization` header.

use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;

use super::{AuthError, jwt, queries};
use crate::models::auth::User;

/// Required header form: `Authorization: Bearer <token>`, single space,
/// case-sensitive.
const BEARER_PREFIX: &str = "Bearer ";

/// Why identity resolution failed.
///
/// The first four kinds all surface as the same 401 at the HTTP
/// boundary; they exist separately for diagnostics only. `Store` is an
/// infrastructure failure, not a denial, and maps to 500.
#[derive(Debug, Error)]
pub enum AuthFailure {
    #[error("missing authorization header")]
    MissingToken,

    #[error("malformed authorization header")]
    MalformedHeader,

    #[error("invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("token subject no longer exists")]
    UnknownSubject,

    #[error(transparent)]
    Store(#[from] AuthError),
}

/// Resolve the caller's identity from the raw `Authorization` header
/// value, if any.
///
/// Steps run in a fixed order, each with its own failure kind:
/// 1. header present,
/// 2. `Bearer ` prefix matches,
/// 3. the remainder verifies as a token (the codec classifies parse
///    failures; nothing is pre-validated here),
/// 4. the token's subject still exists in the user store.
///
/// Token verification failures (malformed, bad signature, expired) are
/// logged with their exact kind but collapse to a single
/// `InvalidOrExpiredToken` so the caller cannot tell them apart.
pub async fn resolve_identity(
    pool: &PgPool,
    header: Option<&str>,
    secret: &[u8],
) -> Result<User, AuthFailure> {
    let header = header.ok_or(AuthFailure::MissingToken)?;
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthFailure::MalformedHeader)?;

    let claims = jwt::verify_token(token, secret).map_err(|e| {
        debug!(error = %e, "token verification failed");
        AuthFailure::InvalidOrExpiredToken
    })?;

    // A token can outlive its user: cryptographically valid, but the
    // subject it names is gone.
    queries::find_user_by_id(pool, claims.user_id)
        .await?
        .ok_or(AuthFailure::UnknownSubject)
}
