//! Response shapes of the platform's GraphQL API and their mapping to domain types.

use serde::Deserialize;
use stagepost_core::{AssetKind, AssetObservation, FieldError, RegisteredAsset, StagedTarget};

#[derive(Debug, Deserialize)]
pub(crate) struct GraphqlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphqlError {
    pub message: String,
}

// ----- stagedUploadsCreate -----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StagedUploadsData {
    pub staged_uploads_create: Option<StagedUploadsPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StagedUploadsPayload {
    pub staged_targets: Option<Vec<StagedTarget>>,
    pub user_errors: Option<Vec<FieldError>>,
}

// ----- fileCreate -----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileCreateData {
    pub file_create: Option<FileCreatePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileCreatePayload {
    pub files: Option<Vec<Option<CreatedFile>>>,
    pub user_errors: Option<Vec<FieldError>>,
}

/// Polymorphic result of `fileCreate`, discriminated by `__typename`.
#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
pub(crate) enum CreatedFile {
    GenericFile {
        id: String,
    },
    MediaImage {
        id: String,
    },
    Video {
        id: String,
    },
    #[serde(other)]
    Unsupported,
}

impl CreatedFile {
    pub fn into_registered(self) -> Option<RegisteredAsset> {
        let (kind, id) = match self {
            CreatedFile::GenericFile { id } => (AssetKind::GenericFile, id),
            CreatedFile::MediaImage { id } => (AssetKind::MediaImage, id),
            CreatedFile::Video { id } => (AssetKind::Video, id),
            CreatedFile::Unsupported => return None,
        };
        Some(RegisteredAsset { kind, id })
    }
}

// ----- node(id:) -----

#[derive(Debug, Deserialize)]
pub(crate) struct NodeData {
    pub node: Option<FileNode>,
}

/// Status reading of a managed file, one shape per kind.
#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
pub(crate) enum FileNode {
    GenericFile {
        #[serde(rename = "fileStatus")]
        file_status: Option<String>,
        url: Option<String>,
    },
    MediaImage {
        #[serde(rename = "fileStatus")]
        file_status: Option<String>,
        image: Option<ImageRef>,
    },
    Video {
        #[serde(rename = "fileStatus")]
        file_status: Option<String>,
        sources: Option<Vec<VideoSource>>,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageRef {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoSource {
    pub url: Option<String>,
    #[allow(dead_code)] // Requested for diagnostics; the first source wins regardless
    pub format: Option<String>,
}

impl FileNode {
    /// Resolve the kind-specific URL field. Returns `None` for node types
    /// that are not files.
    pub fn into_observation(self) -> Option<AssetObservation> {
        let observation = match self {
            FileNode::GenericFile { file_status, url } => AssetObservation {
                kind: AssetKind::GenericFile,
                status: file_status,
                url,
            },
            FileNode::MediaImage { file_status, image } => AssetObservation {
                kind: AssetKind::MediaImage,
                status: file_status,
                url: image.and_then(|image| image.url),
            },
            FileNode::Video {
                file_status,
                sources,
            } => AssetObservation {
                kind: AssetKind::Video,
                status: file_status,
                url: sources
                    .and_then(|sources| sources.into_iter().next())
                    .and_then(|source| source.url),
            },
            FileNode::Unsupported => return None,
        };
        Some(observation)
    }
}
