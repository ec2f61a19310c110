//! RPC client for the asset platform's admin GraphQL endpoint.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use stagepost_core::{
    AssetContentType, AssetObservation, PlatformConfig, RegisteredAsset, StagedTarget,
    UploadError, UploadRequest,
};

use crate::poller::StatusProbe;
use crate::queries::{FILE_CREATE, FILE_STATUS, STAGED_UPLOADS_CREATE};
use crate::wire::{FileCreateData, GraphqlResponse, NodeData, StagedUploadsData};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Client for the platform's query/mutation endpoint.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone, Debug)]
pub struct PlatformClient {
    http: Client,
    endpoint: String,
    access_token: String,
}

impl PlatformClient {
    pub fn new(config: &PlatformConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .context("Failed to create HTTP client for asset platform")?;

        Ok(Self::with_http_client(http, config))
    }

    pub fn with_http_client(http: Client, config: &PlatformConfig) -> Self {
        Self {
            http,
            endpoint: config.graphql_endpoint(),
            access_token: config.access_token.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run one query or mutation and decode its `data`.
    ///
    /// Any non-empty `errors` array, a non-2xx status, or a missing `data`
    /// object is a transport failure.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, UploadError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .context("Failed to send request to asset platform")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(UploadError::Transport(format!(
                "Asset platform request failed: {} - {}",
                status, error_text
            )));
        }

        let body: GraphqlResponse<T> = response
            .json()
            .await
            .context("Failed to parse asset platform response")?;

        if let Some(errors) = body.errors.filter(|errors| !errors.is_empty()) {
            let messages = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(UploadError::Transport(messages));
        }

        body.data.ok_or_else(|| {
            UploadError::Transport("Asset platform response contained no data".to_string())
        })
    }

    /// Request a temporary upload target for `request`.
    pub async fn stage_upload(&self, request: &UploadRequest) -> Result<StagedTarget, UploadError> {
        let resource = AssetContentType::from_mime(request.content_type());
        let variables = json!({
            "input": [{
                "filename": request.filename(),
                "mimeType": request.content_type(),
                "fileSize": request.size().to_string(),
                "resource": resource,
                "httpMethod": "POST",
            }]
        });

        let data: StagedUploadsData = self.execute(STAGED_UPLOADS_CREATE, variables).await?;
        let payload = data.staged_uploads_create.ok_or_else(|| {
            UploadError::Transport("stagedUploadsCreate returned no payload".to_string())
        })?;

        let user_errors = payload.user_errors.unwrap_or_default();
        if !user_errors.is_empty() {
            return Err(UploadError::Validation(user_errors));
        }

        payload
            .staged_targets
            .and_then(|targets| targets.into_iter().next())
            .ok_or_else(|| {
                UploadError::Transport("stagedUploadsCreate returned no staged target".to_string())
            })
    }

    /// Adopt the uploaded blob at `target.resource_url` as a managed file.
    pub async fn register_file(
        &self,
        target: &StagedTarget,
        request: &UploadRequest,
    ) -> Result<RegisteredAsset, UploadError> {
        let content_type = AssetContentType::from_mime(request.content_type());
        let variables = json!({
            "files": [{
                "originalSource": target.resource_url,
                "filename": request.filename(),
                "contentType": content_type,
            }]
        });

        let data: FileCreateData = self.execute(FILE_CREATE, variables).await?;
        let payload = data
            .file_create
            .ok_or_else(|| UploadError::Transport("fileCreate returned no payload".to_string()))?;

        let user_errors = payload.user_errors.unwrap_or_default();
        if !user_errors.is_empty() {
            return Err(UploadError::Validation(user_errors));
        }

        let created = payload
            .files
            .and_then(|files| files.into_iter().flatten().next())
            .ok_or_else(|| UploadError::Transport("fileCreate returned no file".to_string()))?;

        created.into_registered().ok_or_else(|| {
            UploadError::Transport("fileCreate returned an unsupported file type".to_string())
        })
    }

    /// Read the current status of a file. `None` when the node no longer exists.
    pub async fn file_status(&self, id: &str) -> Result<Option<AssetObservation>, UploadError> {
        let data: NodeData = self.execute(FILE_STATUS, json!({ "id": id })).await?;
        match data.node {
            None => Ok(None),
            Some(node) => node.into_observation().map(Some).ok_or_else(|| {
                UploadError::Transport(format!("Node {} is not a file", id))
            }),
        }
    }
}

#[async_trait]
impl StatusProbe for PlatformClient {
    async fn probe(&self, asset: &RegisteredAsset) -> Result<Option<AssetObservation>, UploadError> {
        self.file_status(&asset.id).await
    }
}
