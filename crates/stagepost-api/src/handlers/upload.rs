use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;
use stagepost_core::{UploadError, UploadRequest};
use stagepost_platform::FILE_FIELD;
use std::sync::Arc;

/// Filename used when the client sends a file part without one.
const FALLBACK_FILENAME: &str = "upload";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Upload one file and wait until the platform serves it.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    upload(&state, multipart).await.map_err(|e| {
        HttpAppError::from(e).hide_internal_details(state.config.is_production())
    })
}

async fn upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, UploadError> {
    let limit = state.config.max_upload_size_bytes;
    let multipart = multipart
        .map_err(|e| UploadError::InvalidInput(format!("Expected multipart form: {}", e)))?;
    let request = read_upload_request(multipart, limit).await?;

    let url = state.orchestrator.run_logged(request).await?;
    Ok(Json(UploadResponse { url }))
}

/// Pull the single `file` field out of the form.
async fn read_upload_request(
    mut multipart: Multipart,
    limit: usize,
) -> Result<UploadRequest, UploadError> {
    let mut upload: Option<UploadRequest> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit, "Failed to read multipart"))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        if upload.is_some() {
            return Err(UploadError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| FALLBACK_FILENAME.to_string());
        let content_type = field.content_type().map(|s| s.to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, limit, "Failed to read file data"))?;

        upload = Some(UploadRequest::new(data, filename, content_type)?);
    }

    upload.ok_or(UploadError::MissingFile)
}

/// A body cut off by the size limit is reported as such, not as a malformed form.
fn multipart_error(err: MultipartError, limit: usize, context: &str) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::PayloadTooLarge(format!("Upload exceeds the limit of {} bytes", limit))
    } else {
        UploadError::InvalidInput(format!("{}: {}", context, err.body_text()))
    }
}
