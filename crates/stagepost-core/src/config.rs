//! Configuration module
//!
//! Configuration is read once at startup. The platform part is handed to the
//! orchestrator as an immutable [`PlatformConfig`]; nothing reads the
//! environment after that.

use std::env;
use std::time::Duration;

const SERVER_PORT: u16 = 4000;
const POLL_MAX_ATTEMPTS: u32 = 30;
const POLL_INTERVAL_MS: u64 = 1000;
const PLATFORM_API_VERSION: &str = "2024-10";
const PLATFORM_HTTP_TIMEOUT_SECS: u64 = 30;
const STORAGE_UPLOAD_TIMEOUT_SECS: u64 = 600;
const MAX_UPLOAD_SIZE_MB: usize = 100;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Readiness polling budget: attempt ceiling and the fixed delay between attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollSettings {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: POLL_MAX_ATTEMPTS,
            interval: Duration::from_millis(POLL_INTERVAL_MS),
        }
    }
}

/// Everything needed to talk to the asset platform.
#[derive(Clone, Debug)]
pub struct PlatformConfig {
    /// Scheme and host, e.g. `https://example.myshopify.com`
    pub base_url: String,
    pub access_token: String,
    pub api_version: String,
    /// Per-request timeout for GraphQL calls
    pub http_timeout: Duration,
    /// Timeout for the whole blob upload, which carries the file body
    pub storage_timeout: Duration,
    pub poll: PollSettings,
}

impl PlatformConfig {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            access_token: access_token.into(),
            api_version: PLATFORM_API_VERSION.to_string(),
            http_timeout: Duration::from_secs(PLATFORM_HTTP_TIMEOUT_SECS),
            storage_timeout: Duration::from_secs(STORAGE_UPLOAD_TIMEOUT_SECS),
            poll: PollSettings::default(),
        }
    }

    pub fn with_poll(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }

    /// Versioned RPC endpoint
    pub fn graphql_endpoint(&self) -> String {
        format!(
            "{}/admin/api/{}/graphql.json",
            self.base_url, self.api_version
        )
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub max_upload_size_bytes: usize,
    pub http_concurrency_limit: usize,
    pub platform: PlatformConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let domain = lookup("PLATFORM_SHOP_DOMAIN")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("PLATFORM_SHOP_DOMAIN must be set"))?;
        let access_token = lookup("PLATFORM_ACCESS_TOKEN")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("PLATFORM_ACCESS_TOKEN must be set"))?;

        let max_attempts: u32 = lookup("POLL_MAX_ATTEMPTS")
            .unwrap_or_else(|| POLL_MAX_ATTEMPTS.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("POLL_MAX_ATTEMPTS must be a valid number"))?;
        if max_attempts == 0 {
            return Err(anyhow::anyhow!("POLL_MAX_ATTEMPTS must be at least 1"));
        }

        let poll_interval_ms: u64 = lookup("POLL_INTERVAL_MS")
            .unwrap_or_else(|| POLL_INTERVAL_MS.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("POLL_INTERVAL_MS must be a valid number"))?;

        let http_timeout_secs = lookup("PLATFORM_HTTP_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(PLATFORM_HTTP_TIMEOUT_SECS);

        let storage_timeout_secs = lookup("STORAGE_UPLOAD_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(STORAGE_UPLOAD_TIMEOUT_SECS);

        let max_upload_size_mb = lookup("MAX_UPLOAD_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_UPLOAD_SIZE_MB);
        let max_upload_size_bytes = max_upload_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"))?;

        let platform = PlatformConfig {
            base_url: normalize_base_url(&domain),
            access_token,
            api_version: lookup("PLATFORM_API_VERSION")
                .unwrap_or_else(|| PLATFORM_API_VERSION.to_string()),
            http_timeout: Duration::from_secs(http_timeout_secs),
            storage_timeout: Duration::from_secs(storage_timeout_secs),
            poll: PollSettings {
                max_attempts,
                interval: Duration::from_millis(poll_interval_ms),
            },
        };

        Ok(Self {
            server_port: lookup("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            max_upload_size_bytes,
            http_concurrency_limit: lookup("HTTP_CONCURRENCY_LIMIT")
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
            platform,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.environment)
    }

    pub fn platform(&self) -> &PlatformConfig {
        &self.platform
    }
}

fn is_production_name(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

/// Accept either a bare shop host or a full `http(s)://` base.
fn normalize_base_url(domain: &str) -> String {
    let domain = domain.trim().trim_end_matches('/');
    if domain.starts_with("http://") || domain.starts_with("https://") {
        domain.to_string()
    } else {
        format!("https://{}", domain)
    }
}
