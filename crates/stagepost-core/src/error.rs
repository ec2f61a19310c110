//! Error types module
//!
//! Every failure an upload can end in is a variant of [`UploadError`]. Each
//! variant describes its own HTTP presentation through [`ErrorMetadata`], so the
//! API layer only has to render it.

use serde::{Deserialize, Serialize};

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for rejected input and upstream refusals
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_UPLOAD_FAILED")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Path of the input field a platform user error refers to.
///
/// The platform reports either a single name or a path of segments
/// (e.g. `["files", "0", "originalSource"]`); both are passed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldPath {
    Single(String),
    Path(Vec<String>),
}

/// One field-level rejection reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Option<FieldPath>,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(FieldPath::Single(field.into())),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Platform rejected the request: {}", join_messages(.0))]
    Validation(Vec<FieldError>),

    #[error("Storage upload failed with status {status}: {body}")]
    Storage { status: u16, body: String },

    #[error("Platform request failed: {0}")]
    Transport(String),

    #[error("Platform request failed: {message}")]
    TransportWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("File did not become READY in time (last status: {last_status})")]
    Timeout { last_status: String },
}

/// Terminal result of one upload orchestration: the public URL or the failure.
pub type UploadOutcome = Result<String, UploadError>;

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<anyhow::Error> for UploadError {
    fn from(err: anyhow::Error) -> Self {
        UploadError::TransportWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for UploadError {
    fn from(err: serde_json::Error) -> Self {
        UploadError::Transport(format!("Malformed platform response: {}", err))
    }
}

impl UploadError {
    /// Detail string shown alongside the client message, when one applies.
    pub fn details(&self) -> Option<String> {
        match self {
            UploadError::MissingFile | UploadError::Validation(_) | UploadError::Timeout { .. } => {
                None
            }
            UploadError::InvalidInput(msg)
            | UploadError::PayloadTooLarge(msg)
            | UploadError::Transport(msg) => Some(msg.clone()),
            UploadError::Storage { body, .. } => Some(body.clone()),
            UploadError::TransportWithSource { source, .. } => Some(format!("{:#}", source)),
        }
    }
}

impl ErrorMetadata for UploadError {
    fn http_status_code(&self) -> u16 {
        match self {
            UploadError::MissingFile | UploadError::InvalidInput(_) => 400,
            UploadError::PayloadTooLarge(_) => 413,
            UploadError::Validation(_) => 422,
            UploadError::Storage { status, .. } => {
                if (100..=999).contains(status) {
                    *status
                } else {
                    502
                }
            }
            UploadError::Transport(_)
            | UploadError::TransportWithSource { .. }
            | UploadError::Timeout { .. } => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            UploadError::MissingFile => "MISSING_FILE",
            UploadError::InvalidInput(_) => "INVALID_INPUT",
            UploadError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            UploadError::Validation(_) => "PLATFORM_VALIDATION_FAILED",
            UploadError::Storage { .. } => "STORAGE_UPLOAD_FAILED",
            UploadError::Transport(_) | UploadError::TransportWithSource { .. } => {
                "PLATFORM_TRANSPORT_ERROR"
            }
            UploadError::Timeout { .. } => "ASSET_NOT_READY",
        }
    }

    fn client_message(&self) -> String {
        match self {
            UploadError::MissingFile => "No file uploaded".to_string(),
            UploadError::InvalidInput(_) => "Invalid upload".to_string(),
            UploadError::PayloadTooLarge(_) => "File too large".to_string(),
            UploadError::Validation(_) => "Platform rejected the upload".to_string(),
            UploadError::Storage { .. } => "Storage upload failed".to_string(),
            UploadError::Transport(_) | UploadError::TransportWithSource { .. } => {
                "Asset platform request failed".to_string()
            }
            UploadError::Timeout { .. } => "File did not become READY in time".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            UploadError::MissingFile
            | UploadError::InvalidInput(_)
            | UploadError::PayloadTooLarge(_) => LogLevel::Debug,
            UploadError::Validation(_) | UploadError::Storage { .. } => LogLevel::Warn,
            UploadError::Transport(_)
            | UploadError::TransportWithSource { .. }
            | UploadError::Timeout { .. } => LogLevel::Error,
        }
    }
}
