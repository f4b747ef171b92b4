use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use tracing::debug;

use crate::{api::app_state::AppState, error::Result};

/// Serve a file from the download sandbox.
///
/// The untrusted path segment goes through the containment checker; only a
/// `SafePath` handle reaches the read. Traversal attempts and missing files
/// both map to the same opaque 400.
pub async fn download(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<impl IntoResponse> {
    let sandbox = state.sandbox.clone();
    let requested = file.clone();

    let (name, bytes) = tokio::task::spawn_blocking(move || {
        let safe = sandbox.resolve(&requested)?;
        let name = safe.file_name().unwrap_or_else(|| "download".to_string());
        let bytes = safe.read()?;
        Ok::<_, crate::error::AppError>((name, bytes))
    })
    .await??;

    debug!(file = %name, size = bytes.len(), "serving contained file");

    let headers = [
        (
            header::CONTENT_TYPE,
            "application/octet-stream".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", name),
        ),
    ];

    Ok((headers, bytes))
}
