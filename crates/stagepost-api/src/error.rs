//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`; any [`UploadError`] converts
//! into it with `?` and renders as a JSON body with the status the error
//! reports for itself.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use stagepost_core::{ErrorMetadata, FieldError, LogLevel, UploadError};

/// JSON error bodies. Every failure renders exactly one of these shapes.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ErrorResponse {
    Message {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    NotReady {
        error: String,
        status: String,
    },
    Validation {
        errors: Vec<FieldError>,
    },
}

/// Wrapper type for UploadError to implement IntoResponse
/// (orphan rules: the error type lives in stagepost-core)
#[derive(Debug)]
pub struct HttpAppError {
    pub error: UploadError,
    hide_internal_details: bool,
}

impl From<UploadError> for HttpAppError {
    fn from(error: UploadError) -> Self {
        HttpAppError {
            error,
            hide_internal_details: false,
        }
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError::from(UploadError::from(err))
    }
}

impl HttpAppError {
    /// Drop transport details from the body; set from `AppConfig::is_production`.
    pub fn hide_internal_details(mut self, hide: bool) -> Self {
        self.hide_internal_details = hide;
        self
    }

    fn body(&self) -> ErrorResponse {
        let hide_internal_details = self.hide_internal_details;
        let error = &self.error;
        match error {
            UploadError::Validation(errors) => ErrorResponse::Validation {
                errors: errors.clone(),
            },
            UploadError::Timeout { last_status } => ErrorResponse::NotReady {
                error: error.client_message(),
                status: last_status.clone(),
            },
            UploadError::Transport(_) | UploadError::TransportWithSource { .. }
                if hide_internal_details =>
            {
                ErrorResponse::Message {
                    error: error.client_message(),
                    details: None,
                }
            }
            _ => ErrorResponse::Message {
                error: error.client_message(),
                details: error.details(),
            },
        }
    }
}

fn log_error(error: &UploadError) {
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, code, "Upload request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, code, "Upload request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, code, "Upload request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&self.error);

        (status, Json(self.body())).into_response()
    }
}
