//! Authentication middleware — identity resolution before protected handlers.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::AppState;
use crate::error::AppError;
use tally_core::auth::identity::{AuthFailure, resolve_identity};
use tally_core::models::auth::User;

/// Key used to store the resolved identity in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Axum middleware: resolves the caller's identity from the
/// `Authorization` header and injects `AuthenticatedUser` into request
/// extensions. Any resolution failure ends the request here.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = match request.headers().get(AUTHORIZATION) {
        None => None,
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| AppError::from(AuthFailure::MalformedHeader))?,
        ),
    };

    let user = resolve_identity(&state.pool, header, state.config.jwt_secret.as_bytes())
        .await
        .map_err(|failure| {
            debug!(%failure, "identity resolution failed");
            AppError::from(failure)
        })?;

    request.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(request).await)
}
