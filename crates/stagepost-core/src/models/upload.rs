use bytes::Bytes;

use crate::error::UploadError;

/// Content type assumed when the client does not send one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

const MAX_MIME_NAME_LEN: usize = 127;

/// One file received from the client.
///
/// The value is immutable once built; the orchestrator holds it for the
/// duration of a single upload and drops it afterwards.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    data: Bytes,
    filename: String,
    content_type: String,
}

impl UploadRequest {
    /// Build a request, checking the filename and MIME type.
    ///
    /// A missing content type falls back to [`DEFAULT_CONTENT_TYPE`].
    pub fn new(
        data: impl Into<Bytes>,
        filename: impl Into<String>,
        content_type: Option<String>,
    ) -> Result<Self, UploadError> {
        let filename = filename.into();
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(UploadError::InvalidInput(
                "Filename must not be empty".to_string(),
            ));
        }
        if filename.contains(['/', '\\', '\0']) {
            return Err(UploadError::InvalidInput(format!(
                "Filename contains invalid characters: {}",
                filename
            )));
        }

        let content_type = content_type
            .map(|ct| ct.trim().to_string())
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        if !is_valid_mime(&content_type) {
            return Err(UploadError::InvalidInput(format!(
                "Invalid MIME type: {}",
                content_type
            )));
        }

        Ok(Self {
            data: data.into(),
            filename: filename.to_string(),
            content_type,
        })
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// `type "/" subtype` per RFC 6838 section 4.2, parameters ignored.
fn is_valid_mime(value: &str) -> bool {
    let essence = value.split(';').next().unwrap_or_default().trim();
    match essence.split_once('/') {
        Some((kind, subtype)) => is_restricted_name(kind) && is_restricted_name(subtype),
        None => false,
    }
}

fn is_restricted_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() => {}
        _ => return false,
    }
    name.len() <= MAX_MIME_NAME_LEN
        && chars.all(|c| c.is_ascii_alphanumeric() || "!#$&-^_.+".contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_size_from_bytes() {
        let req = UploadRequest::new(vec![0u8; 1024], "cat.png", Some("image/png".into())).unwrap();
        assert_eq!(req.size(), 1024);
        assert_eq!(req.filename(), "cat.png");
        assert_eq!(req.content_type(), "image/png");
    }

    #[test]
    fn test_missing_content_type_defaults() {
        let req = UploadRequest::new(Bytes::from_static(b"x"), "notes.bin", None).unwrap();
        assert_eq!(req.content_type(), DEFAULT_CONTENT_TYPE);

        let req = UploadRequest::new(Bytes::from_static(b"x"), "notes.bin", Some("  ".into()))
            .unwrap();
        assert_eq!(req.content_type(), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_empty_filename_rejected() {
        let err = UploadRequest::new(Bytes::new(), "   ", None).unwrap_err();
        assert!(matches!(err, UploadError::InvalidInput(_)));
    }

    #[test]
    fn test_path_in_filename_rejected() {
        let err = UploadRequest::new(Bytes::new(), "../etc/passwd", None).unwrap_err();
        assert!(matches!(err, UploadError::InvalidInput(_)));
    }

    #[test]
    fn test_mime_validation() {
        assert!(is_valid_mime("image/png"));
        assert!(is_valid_mime("application/vnd.ms-excel"));
        assert!(is_valid_mime("image/svg+xml"));
        assert!(is_valid_mime("text/plain; charset=utf-8"));
        assert!(!is_valid_mime("png"));
        assert!(!is_valid_mime("image/"));
        assert!(!is_valid_mime("/png"));
        assert!(!is_valid_mime("image/p ng"));
        assert!(!is_valid_mime("image/png/extra"));
    }

    #[test]
    fn test_invalid_mime_rejected() {
        let err = UploadRequest::new(Bytes::new(), "a.txt", Some("not a mime".into())).unwrap_err();
        assert!(matches!(err, UploadError::InvalidInput(_)));
    }
}
