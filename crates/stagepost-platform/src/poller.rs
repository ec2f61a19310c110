//! Readiness polling for registered assets.
//!
//! The poller asks a [`StatusProbe`] for the asset's status up to
//! `max_attempts` times, sleeping a fixed interval between attempts. It ends
//! on the first READY reading that carries a URL, when the asset disappears,
//! or when the budget runs out.

use async_trait::async_trait;
use stagepost_core::{
    AssetObservation, PollSettings, RegisteredAsset, UploadError, UNKNOWN_STATUS,
};
use tokio::time::sleep;

/// Source of status readings for a registered asset.
#[async_trait]
pub trait StatusProbe: Send + Sync {
    /// Current status, or `None` if the platform no longer resolves the asset.
    async fn probe(&self, asset: &RegisteredAsset) -> Result<Option<AssetObservation>, UploadError>;
}

#[async_trait]
impl<P: StatusProbe + ?Sized> StatusProbe for std::sync::Arc<P> {
    async fn probe(&self, asset: &RegisteredAsset) -> Result<Option<AssetObservation>, UploadError> {
        (**self).probe(asset).await
    }
}

/// Poller state. `Ready` and `Exhausted` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    Pending { last_status: Option<String> },
    Ready(String),
    Exhausted(String),
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Pending { .. })
    }

    /// Fold one probe result into the state.
    ///
    /// A READY reading without a URL stays pending; a vanished asset is
    /// exhausted immediately.
    pub fn observe(self, reading: Option<AssetObservation>) -> PollState {
        let last_status = match self {
            PollState::Pending { last_status } => last_status,
            terminal => return terminal,
        };

        let Some(observation) = reading else {
            return PollState::Exhausted(UNKNOWN_STATUS.to_string());
        };

        if let Some(url) = observation.ready_url() {
            return PollState::Ready(url.to_string());
        }

        PollState::Pending {
            last_status: observation.status.or(last_status),
        }
    }

    /// Final result: the URL, or the status to report as timed out. A state
    /// still pending when the budget ran out reports its last status.
    fn into_result(self) -> Result<String, String> {
        match self {
            PollState::Ready(url) => Ok(url),
            PollState::Exhausted(last_status) => Err(last_status),
            PollState::Pending { last_status } => {
                Err(last_status.unwrap_or_else(|| UNKNOWN_STATUS.to_string()))
            }
        }
    }
}

/// Waits for a registered asset to become READY.
#[derive(Debug, Clone)]
pub struct ReadinessPoller<P> {
    probe: P,
    settings: PollSettings,
}

impl<P: StatusProbe> ReadinessPoller<P> {
    pub fn new(probe: P, settings: PollSettings) -> Self {
        Self { probe, settings }
    }

    pub fn settings(&self) -> PollSettings {
        self.settings
    }

    /// Poll until READY or until the budget is spent.
    ///
    /// Probe errors abort the wait and are returned unchanged.
    pub async fn wait_until_ready(&self, asset: &RegisteredAsset) -> Result<String, UploadError> {
        self.run(asset)
            .await?
            .into_result()
            .map_err(|last_status| UploadError::Timeout { last_status })
    }

    async fn run(&self, asset: &RegisteredAsset) -> Result<PollState, UploadError> {
        let mut state = PollState::Pending { last_status: None };

        for attempt in 1..=self.settings.max_attempts {
            let reading = self.probe.probe(asset).await?;
            state = state.observe(reading);

            match &state {
                PollState::Ready(url) => {
                    tracing::info!(
                        asset_id = %asset.id,
                        kind = %asset.kind,
                        attempts = attempt,
                        url = %url,
                        "Asset is ready"
                    );
                    return Ok(state);
                }
                PollState::Exhausted(_) => {
                    tracing::warn!(
                        asset_id = %asset.id,
                        attempt,
                        "Asset no longer resolvable, giving up"
                    );
                    return Ok(state);
                }
                PollState::Pending { last_status } => {
                    tracing::debug!(
                        asset_id = %asset.id,
                        attempt,
                        max_attempts = self.settings.max_attempts,
                        status = last_status.as_deref().unwrap_or(UNKNOWN_STATUS),
                        "Waiting for asset to become ready"
                    );
                }
            }

            if attempt < self.settings.max_attempts {
                sleep(self.settings.interval).await;
            }
        }

        if let PollState::Pending { last_status } = &state {
            tracing::warn!(
                asset_id = %asset.id,
                max_attempts = self.settings.max_attempts,
                last_status = last_status.as_deref().unwrap_or(UNKNOWN_STATUS),
                "Asset did not become ready within attempt budget"
            );
        }
        Ok(state)
    }
}
