use axum::{Json, body::Bytes, response::IntoResponse};
use tracing::debug;

use crate::{
    api::dto::user_dto::CreateUserResponse,
    error::Result,
    security::validation::{UserInput, ValidatedUser},
};

/// Create a user from untrusted input.
///
/// The record validator is total: the handler receives either a
/// fully-populated `ValidatedUser` or a classified rejection; partially
/// valid input never produces a partial record.
pub async fn create_user(body: Bytes) -> Result<impl IntoResponse> {
    let input: UserInput = serde_json::from_slice(&body)?;

    let user = ValidatedUser::validate(&input)?;

    debug!(name = %user.name(), role = %user.role(), "user accepted");

    Ok(Json(CreateUserResponse {
        success: true,
        user,
    }))
}
