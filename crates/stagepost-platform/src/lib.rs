//! Asset platform integration.
//!
//! An upload goes through three calls against the platform plus one against
//! its blob storage:
//!
//! 1. [`PlatformClient::stage_upload`] asks for a temporary upload target.
//! 2. [`BlobUploader::upload`] posts the bytes to that target.
//! 3. [`PlatformClient::register_file`] adopts the blob as a managed file.
//! 4. [`ReadinessPoller::wait_until_ready`] polls until the file is READY.
//!
//! [`UploadOrchestrator`] runs these in order and stops at the first failure.

pub mod blob;
pub mod client;
pub mod orchestrator;
pub mod poller;
mod queries;
mod wire;

pub use blob::{BlobUploader, FormPart, UploadForm, FILE_FIELD};
pub use client::PlatformClient;
pub use orchestrator::UploadOrchestrator;
pub use poller::{PollState, ReadinessPoller, StatusProbe};
