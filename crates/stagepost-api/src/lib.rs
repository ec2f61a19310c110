//! HTTP surface for the upload service.
//!
//! Exposes `POST /upload` (one multipart file field named `file`) and a
//! liveness probe. All upload work is delegated to
//! [`stagepost_platform::UploadOrchestrator`].

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod setup;
pub mod state;
pub mod telemetry;
