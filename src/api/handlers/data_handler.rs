use axum::{Json, body::Bytes, response::IntoResponse};
use tracing::debug;

use crate::{api::dto::data_dto::DataResponse, error::Result, security::validation};

/// Accept a JSON payload after structural validation.
///
/// The body is parsed here rather than through the `Json` extractor so an
/// unparseable payload maps to the classified `MalformedInput` response
/// instead of a framework rejection.
pub async fn submit_data(body: Bytes) -> Result<impl IntoResponse> {
    let value: serde_json::Value = serde_json::from_slice(&body)?;

    validation::ensure_json_object(&value)?;

    debug!(fields = value.as_object().map(|o| o.len()).unwrap_or(0), "data payload accepted");

    Ok(Json(DataResponse { success: true }))
}
