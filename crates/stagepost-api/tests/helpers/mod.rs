//! Test helpers: build AppState and router against a mocked asset platform.
//!
//! Run from workspace root: `cargo test -p stagepost-api --test upload_test`.

#![allow(dead_code)]

pub mod platform;

use axum_test::TestServer;
use mockito::{Server, ServerGuard};
use stagepost_api::setup::routes;
use stagepost_api::state::AppState;
use stagepost_core::{AppConfig, PlatformConfig, PollSettings};
use std::sync::Arc;
use std::time::Duration;

/// Test application: HTTP server plus the mocked platform it talks to.
pub struct TestApp {
    pub server: TestServer,
    pub platform: ServerGuard,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn platform(&mut self) -> &mut ServerGuard {
        &mut self.platform
    }
}

/// Setup test app with the default polling ceiling.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_attempts(30).await
}

/// Setup test app whose poller gives up after `max_attempts` readings.
pub async fn setup_test_app_with_attempts(max_attempts: u32) -> TestApp {
    setup_test_app_with(|config| config.platform.poll.max_attempts = max_attempts).await
}

/// Setup test app after letting `configure` adjust the test config.
pub async fn setup_test_app_with<F>(configure: F) -> TestApp
where
    F: FnOnce(&mut AppConfig),
{
    let platform = Server::new_async().await;

    let mut config = create_test_config(&platform.url());
    configure(&mut config);
    let state = Arc::new(AppState::new(config).expect("Failed to build app state"));
    let app = routes::setup_routes(state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, platform }
}

fn create_test_config(platform_url: &str) -> AppConfig {
    let platform = PlatformConfig::new(platform_url, "shpat_test").with_poll(PollSettings {
        max_attempts: 30,
        interval: Duration::from_millis(5),
    });

    AppConfig {
        server_port: 4000,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
        max_upload_size_bytes: 10 * 1024 * 1024,
        http_concurrency_limit: 64,
        platform,
    }
}
