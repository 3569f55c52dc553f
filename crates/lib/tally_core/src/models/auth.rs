//! Authentication domain models.

use serde::{Deserialize, Serialize};

/// Domain user. Read-only from the auth core's perspective: created at
/// registration, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

/// User plus credential hash (only ever loaded for the login flow).
#[derive(Debug, Clone)]
pub struct UserWithPassword {
    pub user: User,
    pub password_hash: String,
}

/// JWT claims embedded in access tokens.
///
/// `is_admin` is a snapshot taken at issuance; changing the flag on the
/// user does not affect tokens already in the wild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — numeric user ID.
    pub user_id: i64,
    /// Admin flag at issuance time.
    pub is_admin: bool,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp), always `iat + validity window`.
    pub exp: i64,
}
