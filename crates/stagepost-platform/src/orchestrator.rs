//! Stage, upload, register, then wait: one file end to end.

use std::sync::Arc;

use stagepost_core::{
    AssetContentType, PlatformConfig, PollSettings, UploadError, UploadOutcome, UploadRequest,
};

use crate::blob::BlobUploader;
use crate::client::PlatformClient;
use crate::poller::ReadinessPoller;

/// Runs the upload protocol for one file at a time.
///
/// Built once at startup and shared between requests; it holds no per-upload
/// state. A failure in any phase ends the upload. Nothing already staged or
/// registered is cleaned up, the platform expires unused staged targets.
#[derive(Clone, Debug)]
pub struct UploadOrchestrator {
    client: Arc<PlatformClient>,
    uploader: BlobUploader,
    poller: ReadinessPoller<Arc<PlatformClient>>,
}

impl UploadOrchestrator {
    pub fn new(config: &PlatformConfig) -> anyhow::Result<Self> {
        let client = PlatformClient::new(config)?;
        let uploader = BlobUploader::from_config(config)?;
        Ok(Self::from_parts(client, uploader, config.poll))
    }

    pub fn from_parts(
        client: PlatformClient,
        uploader: BlobUploader,
        poll: PollSettings,
    ) -> Self {
        let client = Arc::new(client);
        Self {
            poller: ReadinessPoller::new(client.clone(), poll),
            client,
            uploader,
        }
    }

    pub fn poll_settings(&self) -> PollSettings {
        self.poller.settings()
    }

    pub async fn run(&self, request: UploadRequest) -> UploadOutcome {
        let content_type = AssetContentType::from_mime(request.content_type());
        tracing::info!(
            filename = %request.filename(),
            mime_type = %request.content_type(),
            content_type = %content_type,
            size = request.size(),
            "Starting upload"
        );

        let target = self.client.stage_upload(&request).await?;
        tracing::debug!(upload_url = %target.url, "Upload target staged");

        self.uploader.upload(&target, &request).await?;

        let asset = self.client.register_file(&target, &request).await?;
        drop(target);
        tracing::info!(
            asset_id = %asset.id,
            kind = %asset.kind,
            "File registered, waiting for processing"
        );

        let url = self.poller.wait_until_ready(&asset).await?;
        Ok(url)
    }

    /// Like [`run`](Self::run), logging how the upload ended.
    pub async fn run_logged(&self, request: UploadRequest) -> UploadOutcome {
        let filename = request.filename().to_string();
        let outcome = self.run(request).await;
        match &outcome {
            Ok(url) => tracing::info!(filename = %filename, url = %url, "Upload complete"),
            Err(UploadError::Validation(errors)) => tracing::warn!(
                filename = %filename,
                error_count = errors.len(),
                "Upload rejected by platform"
            ),
            Err(e) => tracing::warn!(filename = %filename, error = %e, "Upload failed"),
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;
    use std::time::Duration;

    const GRAPHQL_PATH: &str = "/admin/api/2024-10/graphql.json";

    fn orchestrator_for(server: &ServerGuard, max_attempts: u32) -> UploadOrchestrator {
        let config = PlatformConfig::new(server.url(), "shpat_test").with_poll(PollSettings {
            max_attempts,
            interval: Duration::from_millis(1),
        });
        UploadOrchestrator::new(&config).unwrap()
    }

    fn cat_png() -> UploadRequest {
        UploadRequest::new(vec![b'x'; 1024], "cat.png", Some("image/png".to_string())).unwrap()
    }

    async fn mock_stage(server: &mut ServerGuard) -> mockito::Mock {
        let upload_url = format!("{}/storage", server.url());
        server
            .mock("POST", GRAPHQL_PATH)
            .match_body(Matcher::Regex("stagedUploadsCreate".to_string()))
            .with_body(
                json!({ "data": { "stagedUploadsCreate": {
                    "stagedTargets": [{
                        "url": upload_url,
                        "resourceUrl": "https://storage.example/tmp/cat.png",
                        "parameters": [{ "name": "key", "value": "tmp/cat.png" }]
                    }],
                    "userErrors": []
                }}})
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await
    }

    async fn mock_register(server: &mut ServerGuard, hits: usize) -> mockito::Mock {
        server
            .mock("POST", GRAPHQL_PATH)
            .match_body(Matcher::Regex("fileCreate".to_string()))
            .with_body(
                json!({ "data": { "fileCreate": {
                    "files": [{ "__typename": "MediaImage", "id": "gid://1" }],
                    "userErrors": []
                }}})
                .to_string(),
            )
            .expect(hits)
            .create_async()
            .await
    }

    fn status_body(status: &str, url: Option<&str>) -> String {
        json!({ "data": { "node": {
            "__typename": "MediaImage",
            "fileStatus": status,
            "image": url.map(|u| json!({ "url": u }))
        }}})
        .to_string()
    }

    #[tokio::test]
    async fn test_happy_path_returns_public_url() {
        let mut server = Server::new_async().await;
        let stage = mock_stage(&mut server).await;
        let storage = server
            .mock("POST", "/storage")
            .with_status(201)
            .expect(1)
            .create_async()
            .await;
        let register = mock_register(&mut server, 1).await;
        let ready = server
            .mock("POST", GRAPHQL_PATH)
            .match_body(Matcher::Regex("fileStatus".to_string()))
            .with_body(status_body("READY", Some("https://cdn/cat.png")))
            .expect(1)
            .create_async()
            .await;

        let url = orchestrator_for(&server, 30).run(cat_png()).await.unwrap();
        assert_eq!(url, "https://cdn/cat.png");

        stage.assert_async().await;
        storage.assert_async().await;
        register.assert_async().await;
        ready.assert_async().await;
    }

    #[tokio::test]
    async fn test_storage_failure_skips_registration() {
        let mut server = Server::new_async().await;
        mock_stage(&mut server).await;
        server
            .mock("POST", "/storage")
            .with_status(403)
            .with_body("Forbidden")
            .create_async()
            .await;
        let register = mock_register(&mut server, 0).await;

        let err = orchestrator_for(&server, 30)
            .run(cat_png())
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Storage { status: 403, ref body } if body == "Forbidden"));
        register.assert_async().await;
    }

    #[tokio::test]
    async fn test_timeout_reports_last_status() {
        let mut server = Server::new_async().await;
        mock_stage(&mut server).await;
        server
            .mock("POST", "/storage")
            .with_status(204)
            .create_async()
            .await;
        mock_register(&mut server, 1).await;
        let polls = server
            .mock("POST", GRAPHQL_PATH)
            .match_body(Matcher::Regex("fileStatus".to_string()))
            .with_body(status_body("PROCESSING", None))
            .expect(2)
            .create_async()
            .await;

        let err = orchestrator_for(&server, 2)
            .run(cat_png())
            .await
            .unwrap_err();
        polls.assert_async().await;
        assert!(
            matches!(err, UploadError::Timeout { ref last_status } if last_status == "PROCESSING")
        );
    }

    #[tokio::test]
    async fn test_registration_failure_skips_polling() {
        let mut server = Server::new_async().await;
        mock_stage(&mut server).await;
        server
            .mock("POST", "/storage")
            .with_status(204)
            .create_async()
            .await;
        server
            .mock("POST", GRAPHQL_PATH)
            .match_body(Matcher::Regex("fileCreate".to_string()))
            .with_body(
                json!({ "data": { "fileCreate": {
                    "files": [],
                    "userErrors": [{
                        "field": ["files", "0", "originalSource"],
                        "message": "Invalid source"
                    }]
                }}})
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;
        let polls = server
            .mock("POST", GRAPHQL_PATH)
            .match_body(Matcher::Regex("fileStatus".to_string()))
            .expect(0)
            .create_async()
            .await;

        let err = orchestrator_for(&server, 30)
            .run(cat_png())
            .await
            .unwrap_err();
        assert!(
            matches!(err, UploadError::Validation(ref errors) if errors[0].message == "Invalid source")
        );
        polls.assert_async().await;
    }

    #[tokio::test]
    async fn test_registration_transport_error_skips_polling() {
        let mut server = Server::new_async().await;
        mock_stage(&mut server).await;
        server
            .mock("POST", "/storage")
            .with_status(204)
            .create_async()
            .await;
        server
            .mock("POST", GRAPHQL_PATH)
            .match_body(Matcher::Regex("fileCreate".to_string()))
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;
        let polls = server
            .mock("POST", GRAPHQL_PATH)
            .match_body(Matcher::Regex("fileStatus".to_string()))
            .expect(0)
            .create_async()
            .await;

        let err = orchestrator_for(&server, 30)
            .run(cat_png())
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Transport(ref msg) if msg.contains("502")));
        polls.assert_async().await;
    }
}
