use serde::{Deserialize, Serialize};
use std::fmt;

/// Status the platform reports once an asset has finished processing.
pub const READY_STATUS: &str = "READY";

/// Reported in place of a status when none was ever observed.
pub const UNKNOWN_STATUS: &str = "UNKNOWN";

/// Content category the platform files an asset under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetContentType {
    Image,
    Video,
    File,
}

impl AssetContentType {
    /// Classify a MIME type: `video/*` and `image/*` get their own category,
    /// everything else is a generic file.
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.trim().to_ascii_lowercase();
        if mime.starts_with("video/") {
            AssetContentType::Video
        } else if mime.starts_with("image/") {
            AssetContentType::Image
        } else {
            AssetContentType::File
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetContentType::Image => "IMAGE",
            AssetContentType::Video => "VIDEO",
            AssetContentType::File => "FILE",
        }
    }
}

impl fmt::Display for AssetContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(name, value)` pair the storage backend expects in the upload form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormParameter {
    pub name: String,
    pub value: String,
}

impl FormParameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Temporary upload destination handed out by the platform.
///
/// `url` receives the bytes; `resource_url` is the durable reference used
/// when registering the file afterwards. Parameters keep the platform's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedTarget {
    pub url: String,
    pub resource_url: String,
    pub parameters: Vec<FormParameter>,
}

/// Concrete kind of a managed file on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    GenericFile,
    MediaImage,
    Video,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::GenericFile => "GenericFile",
            AssetKind::MediaImage => "MediaImage",
            AssetKind::Video => "Video",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File object created by registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredAsset {
    pub kind: AssetKind,
    pub id: String,
}

/// A single status reading for a registered asset.
///
/// The platform may leave `status` null while it is still ingesting. `url` is
/// whatever the kind-specific lookup found; it may be missing even when the
/// status is already READY.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetObservation {
    pub kind: AssetKind,
    pub status: Option<String>,
    pub url: Option<String>,
}

impl AssetObservation {
    pub fn is_ready(&self) -> bool {
        self.status.as_deref() == Some(READY_STATUS)
    }

    /// The public URL, only once the asset is READY and the URL is present.
    pub fn ready_url(&self) -> Option<&str> {
        if self.is_ready() {
            self.url.as_deref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(AssetContentType::from_mime("video/mp4"), AssetContentType::Video);
        assert_eq!(AssetContentType::from_mime("video/quicktime"), AssetContentType::Video);
        assert_eq!(AssetContentType::from_mime("image/png"), AssetContentType::Image);
        assert_eq!(AssetContentType::from_mime("image/svg+xml"), AssetContentType::Image);
        assert_eq!(AssetContentType::from_mime("IMAGE/JPEG"), AssetContentType::Image);
        assert_eq!(AssetContentType::from_mime("application/pdf"), AssetContentType::File);
        assert_eq!(AssetContentType::from_mime("text/plain"), AssetContentType::File);
        assert_eq!(
            AssetContentType::from_mime("application/octet-stream"),
            AssetContentType::File
        );
    }

    #[test]
    fn test_classification_requires_full_prefix() {
        // "imagery/x" is not an image type
        assert_eq!(AssetContentType::from_mime("imagery/x"), AssetContentType::File);
        assert_eq!(AssetContentType::from_mime("videos"), AssetContentType::File);
    }

    #[test]
    fn test_content_type_wire_form() {
        assert_eq!(
            serde_json::to_value(AssetContentType::Image).unwrap(),
            serde_json::json!("IMAGE")
        );
        assert_eq!(AssetContentType::File.to_string(), "FILE");
    }

    #[test]
    fn test_ready_url_requires_ready_status() {
        let mut obs = AssetObservation {
            kind: AssetKind::MediaImage,
            status: Some("PROCESSING".to_string()),
            url: Some("https://cdn/cat.png".to_string()),
        };
        assert_eq!(obs.ready_url(), None);

        obs.status = Some(READY_STATUS.to_string());
        assert_eq!(obs.ready_url(), Some("https://cdn/cat.png"));

        obs.url = None;
        assert!(obs.is_ready());
        assert_eq!(obs.ready_url(), None);
    }
}
