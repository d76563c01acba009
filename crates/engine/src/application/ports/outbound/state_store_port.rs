//! Durable storage port for campaign state.
//!
//! "Not found" is `Ok(None)`, never an error; the cache layer decides
//! whether to fabricate an empty shell.

use async_trait::async_trait;
use loreweaver_domain::{Campaign, CampaignId, Character, GameState, World, WorldId};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("state serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StateStorePort: Send + Sync {
    async fn get_game_state(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<GameState>, StoreError>;
    async fn save_game_state(&self, state: &GameState) -> Result<(), StoreError>;

    async fn get_campaign(&self, campaign_id: CampaignId) -> Result<Option<Campaign>, StoreError>;
    async fn save_campaign(&self, campaign: &Campaign) -> Result<(), StoreError>;

    async fn get_world(&self, world_id: WorldId) -> Result<Option<World>, StoreError>;
    async fn save_world(&self, world: &World) -> Result<(), StoreError>;

    async fn list_characters(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Vec<Character>, StoreError>;
    async fn save_character(&self, character: &Character) -> Result<(), StoreError>;
}
