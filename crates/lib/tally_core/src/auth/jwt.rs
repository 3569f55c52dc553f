//! JWT token issuance and verification.
//!
//! Tokens are signed (HS256) but not encrypted: the payload is
//! integrity-protected only, so claims must never carry secret material.
//! Nothing is stored server-side; any process holding the shared secret
//! can verify tokens issued by any other.

use std::path::PathBuf;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use thiserror::Error;
use tracing::info;

use super::AuthError;
use crate::models::auth::TokenClaims;

/// Default token validity window: 24 hours.
pub const DEFAULT_TOKEN_VALIDITY_SECS: i64 = 24 * 60 * 60;

/// Why a token failed verification.
///
/// Kept distinct for diagnostics only; callers collapse all three into a
/// single externally visible failure.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("signature mismatch")]
    InvalidSignature,

    #[error("token expired")]
    Expired,
}

/// Issue a signed access token for `user_id`.
///
/// Claims are `{user_id, is_admin, iat, exp}` with
/// `exp = iat + validity_secs`.
pub fn issue_token(
    user_id: i64,
    is_admin: bool,
    secret: &[u8],
    validity_secs: i64,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = TokenClaims {
        user_id,
        is_admin,
        iat: now,
        exp: now + validity_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
}

/// Verify a token, returning the claims exactly as issued.
///
/// Expiry is compared against wall-clock time here rather than by the
/// library so that `now >= exp` already counts as expired, with zero
/// leeway.
pub fn verify_token(token: &str, secret: &[u8]) -> Result<TokenClaims, TokenError> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::default();
    validation.validate_exp = false;
    validation.leeway = 0;

    let claims = decode::<TokenClaims>(token, &key, &validation)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        })?
        .claims;

    if Utc::now().timestamp() >= claims.exp {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}

/// Resolve the JWT secret: env var `JWT_SECRET`, else a persisted file.
pub fn resolve_jwt_secret() -> String {
    if let Ok(secret) = std::env::var("JWT_SECRET") {
        if !secret.is_empty() {
            return secret;
        }
    }
    let secret_path = jwt_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    // Generate and persist
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = secret_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::write(&secret_path, &secret);
    info!(path = %secret_path.display(), "generated new JWT secret");
    secret
}

/// Path to the persisted JWT secret file.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tally")
        .join("jwt-secret")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"unit-test-secret";

    #[test]
    fn round_trip_preserves_claims() {
        let token = issue_token(42, true, SECRET, DEFAULT_TOKEN_VALIDITY_SECS).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.user_id, 42);
        assert!(claims.is_admin);
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_VALIDITY_SECS);
    }

    #[test]
    fn zero_validity_window_is_already_expired() {
        let token = issue_token(1, false, SECRET, 0).unwrap();
        assert!(matches!(
            verify_token(&token, SECRET),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn wrong_secret_fails_signature_check() {
        let token = issue_token(1, false, SECRET, 3600).unwrap();
        assert!(matches!(
            verify_token(&token, b"some-other-secret"),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn tampered_payload_fails() {
        let token = issue_token(7, false, SECRET, 3600).unwrap();
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        assert_eq!(parts.len(), 3);
        parts[1] = flip_first_char(&parts[1]);
        assert!(verify_token(&parts.join("."), SECRET).is_err());
    }

    #[test]
    fn tampered_signature_fails() {
        let token = issue_token(7, false, SECRET, 3600).unwrap();
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[2] = flip_first_char(&parts[2]);
        assert!(verify_token(&parts.join("."), SECRET).is_err());
    }

    #[test]
    fn malformed_shapes_are_rejected() {
        for garbage in ["", "x", "a.b", "a.b.c.d", "not a token at all"] {
            assert!(
                matches!(verify_token(garbage, SECRET), Err(TokenError::Malformed)),
                "expected Malformed for {garbage:?}"
            );
        }
    }

    /// Swap the first character for a different base64url character.
    fn flip_first_char(segment: &str) -> String {
        let replacement = if segment.starts_with('A') { "B" } else { "A" };
        format!("{replacement}{}", &segment[1..])
    }
}
