//! Live-subscriber broadcast port.
//!
//! Pushing updated state to connected clients is fire-and-forget from the
//! core's perspective; failures are logged by the caller and never fail
//! the update that triggered them.

use async_trait::async_trait;
use loreweaver_domain::{CampaignId, GameState};

#[derive(Debug, thiserror::Error)]
pub enum BroadcastError {
    #[error("broadcast transport error: {0}")]
    Transport(String),

    #[error("state encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BroadcastPort: Send + Sync {
    async fn broadcast_state(
        &self,
        campaign_id: CampaignId,
        state: &GameState,
    ) -> Result<(), BroadcastError>;
}
