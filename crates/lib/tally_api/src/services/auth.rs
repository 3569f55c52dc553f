//! Authentication service — register and login flows.

use sqlx::PgPool;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::TokenResponse;
use tally_core::auth::{jwt, password, queries};
use tally_core::models::auth::User;

/// Minimum password length accepted at registration.
const MIN_PASSWORD_LEN: usize = 8;

/// Generic message returned for both unknown-user and wrong-password so
/// login cannot be used to enumerate accounts.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Pull a required field out of a request body, trimmed.
fn required_field(value: Option<String>, name: &str) -> AppResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(AppError::Validation(format!("{name} is required"))),
    }
}

/// Register a new user account and hand back a first token.
pub async fn register(
    pool: &PgPool,
    username: Option<String>,
    email: Option<String>,
    plain_password: Option<String>,
    jwt_secret: &[u8],
    token_validity_secs: i64,
) -> AppResult<TokenResponse> {
    let username = required_field(username, "username")?;
    let email = required_field(email, "email")?;
    let plain_password = required_field(plain_password, "password")?;

    if plain_password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if queries::username_exists(pool, &username).await? {
        return Err(AppError::Validation("Username already registered".into()));
    }
    if queries::email_exists(pool, &email).await? {
        return Err(AppError::Validation("Email already registered".into()));
    }

    let pw_hash = password::hash_password(&plain_password)?;
    let user = queries::create_user(pool, &username, &email, &pw_hash).await?;
    info!(username = %user.username, "registered new user");

    token_response(user, jwt_secret, token_validity_secs)
}

/// Authenticate with username + password.
pub async fn login(
    pool: &PgPool,
    username: Option<String>,
    plain_password: Option<String>,
    jwt_secret: &[u8],
    token_validity_secs: i64,
) -> AppResult<TokenResponse> {
    let username = required_field(username, "username")?;
    let plain_password = required_field(plain_password, "password")?;

    // Unknown user and wrong password must be indistinguishable.
    let found = match queries::find_user_by_username(pool, &username).await? {
        None => return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into())),
        Some(f) => f,
    };
    if !password::verify_password(&plain_password, &found.password_hash)? {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    token_response(found.user, jwt_secret, token_validity_secs)
}

/// Issue a token for `user` and shape the response body.
fn token_response(
    user: User,
    jwt_secret: &[u8],
    token_validity_secs: i64,
) -> AppResult<TokenResponse> {
    let token = jwt::issue_token(user.id, user.is_admin, jwt_secret, token_validity_secs)?;
    Ok(TokenResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: token_validity_secs,
        user: user.into(),
    })
}
