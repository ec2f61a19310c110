//! Application state shared by all handlers.

use stagepost_core::AppConfig;
use stagepost_platform::UploadOrchestrator;

/// Read-only after startup; handlers receive it as `State<Arc<AppState>>`.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: AppConfig,
    pub orchestrator: UploadOrchestrator,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, anyhow::Error> {
        let orchestrator = UploadOrchestrator::new(config.platform())?;
        Ok(Self {
            config,
            orchestrator,
        })
    }
}
