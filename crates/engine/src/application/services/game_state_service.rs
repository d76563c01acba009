//! State cache and consistency manager.
//!
//! Holds the per-campaign authoritative working copy of game state in a
//! concurrent map. Reads hydrate lazily from the store and repair stale
//! sub-objects on every cache hit; writes stamp version and timestamp,
//! broadcast to live subscribers in parallel with persistence, and treat
//! persistence failures as log-only (the cache is the source of truth for
//! the rest of the process lifetime). Cache updates are whole-value
//! replacements, so readers never observe a partially mutated state.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use loreweaver_domain::{CampaignId, DomainError, GameState, DEFAULT_NARRATIVE_CAPACITY};
use tokio::sync::broadcast;

use crate::application::ports::outbound::{BroadcastPort, StateStorePort, StoreError};
use crate::infrastructure::settings::EngineSettings;

/// Default capacity of the in-process state-changed channel.
const DEFAULT_EVENT_CAPACITY: usize = 32;

/// In-process notification emitted after every successful state update.
#[derive(Debug, Clone)]
pub struct StateChangedEvent {
    pub campaign_id: CampaignId,
    pub state: GameState,
    pub description: String,
}

pub struct GameStateService {
    store: Arc<dyn StateStorePort>,
    broadcaster: Arc<dyn BroadcastPort>,
    cache: DashMap<CampaignId, GameState>,
    events: broadcast::Sender<StateChangedEvent>,
    narrative_capacity: usize,
}

impl GameStateService {
    pub fn new(store: Arc<dyn StateStorePort>, broadcaster: Arc<dyn BroadcastPort>) -> Self {
        let (events, _) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        Self {
            store,
            broadcaster,
            cache: DashMap::new(),
            events,
            narrative_capacity: DEFAULT_NARRATIVE_CAPACITY,
        }
    }

    pub fn with_settings(
        store: Arc<dyn StateStorePort>,
        broadcaster: Arc<dyn BroadcastPort>,
        settings: &EngineSettings,
    ) -> Self {
        let (events, _) = broadcast::channel(settings.broadcast_capacity.max(1));
        Self {
            store,
            broadcaster,
            cache: DashMap::new(),
            events,
            narrative_capacity: settings.narrative_capacity,
        }
    }

    /// Subscribe to state-changed notifications for all campaigns.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChangedEvent> {
        self.events.subscribe()
    }

    /// Working copy of a campaign's state. Never `None`: unknown campaigns
    /// get an empty shell bound to the requested id, cached like any other
    /// state. Errs only when the store fails on a cache miss.
    pub async fn get_state(&self, campaign_id: &CampaignId) -> Result<GameState, StoreError> {
        if let Some(cached) = self.cache.get(campaign_id).map(|entry| entry.value().clone()) {
            let mut state = cached;
            if self.hydrate(campaign_id, &mut state).await {
                self.cache.insert(campaign_id.clone(), state.clone());
            }
            return Ok(state);
        }

        let mut state = match self.store.get_game_state(campaign_id.clone()).await? {
            Some(state) => state,
            None => {
                tracing::debug!(
                    campaign_id = %campaign_id,
                    "no stored state, fabricating empty shell"
                );
                let mut shell = GameState::empty_shell(campaign_id.clone());
                shell.narrative_capacity = self.narrative_capacity;
                shell
            }
        };
        self.hydrate(campaign_id, &mut state).await;
        self.cache.insert(campaign_id.clone(), state.clone());
        Ok(state)
    }

    /// Write path. Stamps `last_updated` and bumps `version`, replaces the
    /// cache entry unconditionally (last-writer-wins), then broadcasts and
    /// persists in parallel. Only an empty campaign id fails the update;
    /// broadcast and persistence failures are logged and swallowed.
    pub async fn update_state(
        &self,
        mut state: GameState,
        description: impl Into<String>,
    ) -> Result<GameState, DomainError> {
        if state.campaign.id.is_empty() {
            return Err(DomainError::validation("campaign id must not be empty"));
        }
        let description = description.into();
        let campaign_id = state.campaign.id.clone();

        state.last_updated = Utc::now();
        state.version += 1;
        self.cache.insert(campaign_id.clone(), state.clone());

        let broadcast = self.broadcaster.broadcast_state(campaign_id.clone(), &state);
        let persist = self.persist(&state);
        let (broadcast_result, ()) = tokio::join!(broadcast, persist);
        if let Err(error) = broadcast_result {
            tracing::warn!(campaign_id = %campaign_id, %error, "state broadcast failed");
        }

        tracing::info!(
            campaign_id = %campaign_id,
            version = state.version,
            %description,
            "campaign state updated"
        );
        let event = StateChangedEvent {
            campaign_id,
            state: state.clone(),
            description,
        };
        // No listeners is the common case outside of live sessions.
        let _ = self.events.send(event);
        Ok(state)
    }

    /// Repair stale or partial sub-objects in place. Runs on every read;
    /// refetch failures are logged and the current value is kept. Returns
    /// whether anything changed.
    async fn hydrate(&self, campaign_id: &CampaignId, state: &mut GameState) -> bool {
        let mut changed = false;

        if state.campaign.id != *campaign_id || state.campaign.name.trim().is_empty() {
            match self.store.get_campaign(campaign_id.clone()).await {
                Ok(Some(campaign)) => {
                    state.campaign = campaign;
                    changed = true;
                }
                Ok(None) => {
                    if state.campaign.id != *campaign_id {
                        state.campaign.id = campaign_id.clone();
                        changed = true;
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        campaign_id = %campaign_id,
                        %error,
                        "campaign hydration failed"
                    );
                }
            }
        }

        let roster_stale = state.characters.is_empty()
            || state
                .campaign
                .character_ids
                .iter()
                .any(|id| state.characters.iter().all(|c| c.id != *id));
        if roster_stale {
            match self.store.list_characters(campaign_id.clone()).await {
                Ok(characters) if !characters.is_empty() => {
                    state
                        .campaign
                        .merge_character_ids(characters.iter().map(|c| c.id.clone()));
                    state.characters = characters;
                    changed = true;
                }
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!(
                        campaign_id = %campaign_id,
                        %error,
                        "character hydration failed"
                    );
                }
            }
        }

        if !state.campaign.world_id.is_empty() && state.world.id != state.campaign.world_id {
            match self.store.get_world(state.campaign.world_id.clone()).await {
                Ok(Some(world)) => {
                    state.world = world;
                    changed = true;
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(
                        campaign_id = %campaign_id,
                        %error,
                        "world hydration failed"
                    );
                }
            }
        }

        changed
    }

    /// Best-effort persistence of the aggregate and its sub-objects.
    /// Unnamed campaigns and worlds are skipped so empty shells never
    /// overwrite durable records.
    async fn persist(&self, state: &GameState) {
        let campaign_id = &state.campaign.id;
        if let Err(error) = self.store.save_game_state(state).await {
            tracing::warn!(campaign_id = %campaign_id, %error, "game state persistence failed");
        }
        if !state.campaign.name.trim().is_empty() {
            if let Err(error) = self.store.save_campaign(&state.campaign).await {
                tracing::warn!(campaign_id = %campaign_id, %error, "campaign persistence failed");
            }
        }
        for character in &state.characters {
            if let Err(error) = self.store.save_character(character).await {
                tracing::warn!(
                    campaign_id = %campaign_id,
                    character_id = %character.id,
                    %error,
                    "character persistence failed"
                );
            }
        }
        if state.world.is_named() {
            if let Err(error) = self.store.save_world(&state.world).await {
                tracing::warn!(campaign_id = %campaign_id, %error, "world persistence failed");
            }
        }
    }
}
