//! Domain models for a single upload orchestration.

mod asset;
mod upload;

pub use asset::{
    AssetContentType, AssetKind, AssetObservation, FormParameter, RegisteredAsset, StagedTarget,
    READY_STATUS, UNKNOWN_STATUS,
};
pub use upload::{UploadRequest, DEFAULT_CONTENT_TYPE};
