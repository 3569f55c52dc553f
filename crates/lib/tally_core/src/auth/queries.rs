//! User lookup queries.

use sqlx::PgPool;

use super::AuthError;
use crate::models::auth::{User, UserWithPassword};

/// Fetch a user by ID. This is the lookup identity resolution consumes.
pub async fn find_user_by_id(pool: &PgPool, user_id: i64) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, (i64, String, String, bool)>(
        "SELECT id, username, email, is_admin FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(id, username, email, is_admin)| User {
        id,
        username,
        email,
        is_admin,
    }))
}

/// Fetch a user with their password hash by username (login only).
pub async fn find_user_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<UserWithPassword>, AuthError> {
    let row = sqlx::query_as::<_, (i64, String, String, bool, String)>(
        "SELECT id, username, email, is_admin, password_hash FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(
        row.map(|(id, username, email, is_admin, password_hash)| UserWithPassword {
            user: User {
                id,
                username,
                email,
                is_admin,
            },
            password_hash,
        }),
    )
}

/// Create a new user, returning the stored row.
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, AuthError> {
    let (id, is_admin) = sqlx::query_as::<_, (i64, bool)>(
        "INSERT INTO users (username, email, password_hash) \
         VALUES ($1, $2, $3) RETURNING id, is_admin",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;
    Ok(User {
        id,
        username: username.to_string(),
        email: email.to_string(),
        is_admin,
    })
}

/// Check whether a username is already taken.
pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, AuthError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

/// Check whether an email is already registered.
pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, AuthError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}
