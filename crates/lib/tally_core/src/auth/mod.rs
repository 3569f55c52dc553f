//! Authentication and authorization logic.
//!
//! Token codec, identity resolution, ownership enforcement, password
//! hashing, and the user lookup queries they depend on.

pub mod identity;
pub mod jwt;
pub mod ownership;
pub mod password;
pub mod queries;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
