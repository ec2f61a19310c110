//! Stagepost Core Library
//!
//! This crate provides the domain models, error taxonomy, and configuration
//! shared by the platform client and the HTTP API.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{AppConfig, PlatformConfig, PollSettings};
pub use error::{ErrorMetadata, FieldError, FieldPath, LogLevel, UploadError, UploadOutcome};
pub use models::{
    AssetContentType, AssetKind, AssetObservation, FormParameter, RegisteredAsset, StagedTarget,
    UploadRequest, READY_STATUS, UNKNOWN_STATUS,
};
