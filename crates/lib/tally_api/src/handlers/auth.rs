//! Authentication request handlers.

use axum::extract::State;
use axum::http::StatusCode;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::Json;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{LoginRequest, RegisterRequest, TokenResponse, UserResponse};
use crate::services::auth;

/// `POST /auth/register` — create a new user account.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let resp = auth::register(
        &state.pool,
        body.username,
        body.email,
        body.password,
        state.config.jwt_secret.as_bytes(),
        state.config.token_validity_secs,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// `POST /auth/login` — authenticate with username + password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::login(
        &state.pool,
        body.username,
        body.password,
        state.config.jwt_secret.as_bytes(),
        state.config.token_validity_secs,
    )
    .await?;
    Ok(Json(resp))
}

/// `GET /auth/me` — return the resolved identity. Requires authentication.
pub async fn me_handler(
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(user.0.into()))
}
