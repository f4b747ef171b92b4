use axum::{
    Json,
    body::Bytes,
    extract::{Extension, State},
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::auth_dto::*},
    error::{AppError, Result},
    security::{token::Claims, validation},
};

/// Return the decoded claims for an already-verified bearer token.
///
/// The authentication gate runs before this handler; by the time it
/// executes the claims in the request extensions are trusted.
pub async fn verify_token(Extension(claims): Extension<Claims>) -> Result<impl IntoResponse> {
    debug!(sub = %claims.sub, "token verified");
    Ok(Json(claims))
}

/// Authenticate a username/password pair and issue a bearer token.
///
/// The login rate-limit gate runs before this handler. Credential
/// verification is bcrypt and therefore blocking; it runs on the blocking
/// pool. Bad credentials get the same opaque rejection as bad tokens.
pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<impl IntoResponse> {
    let request: LoginRequest = serde_json::from_slice(&body)?;

    validation::validate_length("username", &request.username, 255)?;
    validation::validate_length("password", &request.password, 1024)?;

    let store = state.credentials.clone();
    let username = request.username.clone();
    let password = request.password;
    let authenticated =
        tokio::task::spawn_blocking(move || store.authenticate(&username, &password)).await?;

    if !authenticated {
        debug!(username = %request.username, "login rejected");
        return Err(AppError::AuthRejected);
    }

    let token = state.issuer.issue(request.username, "user".to_string())?;

    Ok(Json(LoginResponse {
        success: true,
        token,
        expires_in: state.settings.jwt_expiry_seconds,
    }))
}
