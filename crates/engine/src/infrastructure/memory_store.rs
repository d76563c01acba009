//! In-memory state store.
//!
//! Backs tests and single-process deployments. Entity maps are held in
//! separate locks so a slow roster scan never blocks a state save.

use std::collections::HashMap;

use async_trait::async_trait;
use loreweaver_domain::{Campaign, CampaignId, Character, GameState, World, WorldId};
use tokio::sync::RwLock;

use crate::application::ports::outbound::{StateStorePort, StoreError};

#[derive(Default)]
pub struct InMemoryStateStore {
    states: RwLock<HashMap<CampaignId, GameState>>,
    campaigns: RwLock<HashMap<CampaignId, Campaign>>,
    worlds: RwLock<HashMap<WorldId, World>>,
    characters: RwLock<HashMap<CampaignId, Vec<Character>>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_campaign(&self, campaign: Campaign) {
        self.campaigns
            .write()
            .await
            .insert(campaign.id.clone(), campaign);
    }

    pub async fn seed_world(&self, world: World) {
        self.worlds.write().await.insert(world.id.clone(), world);
    }

    pub async fn seed_character(&self, character: Character) {
        let mut characters = self.characters.write().await;
        let roster = characters.entry(character.campaign_id.clone()).or_default();
        upsert_character(roster, character);
    }
}

fn upsert_character(roster: &mut Vec<Character>, character: Character) {
    match roster.iter_mut().find(|c| c.id == character.id) {
        Some(existing) => *existing = character,
        None => roster.push(character),
    }
}

#[async_trait]
impl StateStorePort for InMemoryStateStore {
    async fn get_game_state(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<GameState>, StoreError> {
        Ok(self.states.read().await.get(&campaign_id).cloned())
    }

    async fn save_game_state(&self, state: &GameState) -> Result<(), StoreError> {
        self.states
            .write()
            .await
            .insert(state.campaign_id().clone(), state.clone());
        Ok(())
    }

    async fn get_campaign(&self, campaign_id: CampaignId) -> Result<Option<Campaign>, StoreError> {
        Ok(self.campaigns.read().await.get(&campaign_id).cloned())
    }

    async fn save_campaign(&self, campaign: &Campaign) -> Result<(), StoreError> {
        self.campaigns
            .write()
            .await
            .insert(campaign.id.clone(), campaign.clone());
        Ok(())
    }

    async fn get_world(&self, world_id: WorldId) -> Result<Option<World>, StoreError> {
        Ok(self.worlds.read().await.get(&world_id).cloned())
    }

    async fn save_world(&self, world: &World) -> Result<(), StoreError> {
        self.worlds
            .write()
            .await
            .insert(world.id.clone(), world.clone());
        Ok(())
    }

    async fn list_characters(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Vec<Character>, StoreError> {
        Ok(self
            .characters
            .read()
            .await
            .get(&campaign_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_character(&self, character: &Character) -> Result<(), StoreError> {
        let mut characters = self.characters.write().await;
        let roster = characters.entry(character.campaign_id.clone()).or_default();
        upsert_character(roster, character.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use loreweaver_domain::{CharacterId, PlayerId};

    use super::*;

    #[tokio::test]
    async fn save_character_replaces_by_id() {
        let store = InMemoryStateStore::new();
        let campaign_id = CampaignId::new("camp-1");
        let original = Character::new(CharacterId::new("ch-1"), campaign_id.clone(), "Brant");
        let renamed = Character::new(CharacterId::new("ch-1"), campaign_id.clone(), "Brant the Bold");

        store.save_character(&original).await.unwrap();
        store.save_character(&renamed).await.unwrap();

        let roster = store.list_characters(campaign_id).await.unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "Brant the Bold");
    }

    #[tokio::test]
    async fn game_state_round_trips_by_campaign() {
        let store = InMemoryStateStore::new();
        let state = GameState::empty_shell(CampaignId::new("camp-1"));
        store.save_game_state(&state).await.unwrap();

        let loaded = store
            .get_game_state(CampaignId::new("camp-1"))
            .await
            .unwrap();
        assert!(loaded.is_some());
        assert!(store
            .get_game_state(CampaignId::new("camp-2"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn seeded_entities_are_readable_through_the_port() {
        let store = InMemoryStateStore::new();
        let campaign = Campaign::new(
            CampaignId::new("camp-1"),
            "The Sunken Vale",
            PlayerId::new("pl-1"),
        );
        store.seed_campaign(campaign).await;
        store.seed_world(World::new(WorldId::new("w-1"), "Vale")).await;

        assert!(store
            .get_campaign(CampaignId::new("camp-1"))
            .await
            .unwrap()
            .is_some());
        assert!(store.get_world(WorldId::new("w-1")).await.unwrap().is_some());
    }
}
