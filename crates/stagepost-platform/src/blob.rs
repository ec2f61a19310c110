//! Upload of the raw file bytes to a staged storage target.

use anyhow::Context;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use stagepost_core::{PlatformConfig, StagedTarget, UploadError, UploadRequest};

/// Name of the form field carrying the file itself.
pub const FILE_FIELD: &str = "file";

/// One entry of the storage upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        filename: String,
        content_type: String,
        data: Bytes,
    },
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

/// Ordered multipart form for a staged target: the target's parameters as
/// given, then the file as the last part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    parts: Vec<FormPart>,
}

impl UploadForm {
    pub fn from_target(target: &StagedTarget, request: &UploadRequest) -> Self {
        let mut parts: Vec<FormPart> = target
            .parameters
            .iter()
            .map(|param| FormPart::Text {
                name: param.name.clone(),
                value: param.value.clone(),
            })
            .collect();

        parts.push(FormPart::File {
            name: FILE_FIELD.to_string(),
            filename: request.filename().to_string(),
            content_type: request.content_type().to_string(),
            data: request.data().clone(),
        });

        Self { parts }
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn into_multipart(self) -> Result<Form, UploadError> {
        let mut form = Form::new();
        for part in self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File {
                    name,
                    filename,
                    content_type,
                    data,
                } => {
                    let len = data.len() as u64;
                    let file_part = Part::stream_with_length(Body::from(data), len)
                        .file_name(filename)
                        .mime_str(&content_type)
                        .map_err(|e| {
                            UploadError::InvalidInput(format!(
                                "Invalid MIME type {}: {}",
                                content_type, e
                            ))
                        })?;
                    form.part(name, file_part)
                }
            };
        }
        Ok(form)
    }
}

/// Posts file bytes to the storage backend behind a staged target.
#[derive(Clone, Debug)]
pub struct BlobUploader {
    http: Client,
}

impl BlobUploader {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Own client, bounded by `storage_timeout` rather than the GraphQL timeout.
    pub fn from_config(config: &PlatformConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.storage_timeout)
            .build()
            .context("Failed to create HTTP client for blob storage")?;
        Ok(Self::new(http))
    }

    /// Upload once. Any non-2xx response is returned as a storage failure
    /// with the backend's own status and body.
    pub async fn upload(
        &self,
        target: &StagedTarget,
        request: &UploadRequest,
    ) -> Result<(), UploadError> {
        let form = UploadForm::from_target(target, request).into_multipart()?;

        let response = self
            .http
            .post(&target.url)
            .multipart(form)
            .send()
            .await
            .context("Failed to send file to staged upload target")?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(UploadError::Storage {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(
            status = status.as_u16(),
            size = request.size(),
            "Blob uploaded to staged target"
        );
        Ok(())
    }
}
