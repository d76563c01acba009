//! Campaign entity - one multiplayer play-session/world instance.
//!
//! The campaign is the unit of queue and cache partitioning. A denormalized
//! copy lives inside `GameState` for fast access during message processing;
//! the durable copy is owned by the state store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CampaignId, CharacterId, CombatId, PlayerId, WorldId};

/// Per-player readiness for the next session/turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerReadyStatus {
    pub character_id: Option<CharacterId>,
    pub player_name: String,
    pub is_ready: bool,
    pub ready_at: Option<DateTime<Utc>>,
}

impl PlayerReadyStatus {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            character_id: None,
            player_name: player_name.into(),
            is_ready: false,
            ready_at: None,
        }
    }
}

/// One multiplayer play-session/world instance.
///
/// Invariant: `player_ids` and `character_ids` are deduplicated sets; all
/// mutation goes through `add_player`/`add_character`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub owner: PlayerId,
    pub settings: HashMap<String, String>,
    pub world_id: WorldId,
    pub player_ids: Vec<PlayerId>,
    pub character_ids: Vec<CharacterId>,
    pub current_turn_character_id: Option<CharacterId>,
    pub current_combat_id: Option<CombatId>,
    pub ready_status: HashMap<PlayerId, PlayerReadyStatus>,
    pub selected_model: Option<String>,
}

impl Campaign {
    pub fn new(id: CampaignId, name: impl Into<String>, owner: PlayerId) -> Self {
        Self {
            id,
            name: name.into(),
            owner,
            ..Default::default()
        }
    }

    pub fn with_world(mut self, world_id: WorldId) -> Self {
        self.world_id = world_id;
        self
    }

    /// Add a player id, preserving the deduplicated-set invariant.
    pub fn add_player(&mut self, player_id: PlayerId) {
        if !self.player_ids.contains(&player_id) {
            self.player_ids.push(player_id);
        }
    }

    /// Add a character id, preserving the deduplicated-set invariant.
    pub fn add_character(&mut self, character_id: CharacterId) {
        if !self.character_ids.contains(&character_id) {
            self.character_ids.push(character_id);
        }
    }

    /// Merge newly discovered character ids into the roster, deduplicated.
    pub fn merge_character_ids<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = CharacterId>,
    {
        for id in ids {
            self.add_character(id);
        }
    }

    /// Mark a player ready, stamping the ready time.
    pub fn set_ready(&mut self, player_id: PlayerId, ready: bool, at: DateTime<Utc>) {
        let status = self
            .ready_status
            .entry(player_id)
            .or_insert_with(|| PlayerReadyStatus::new(""));
        status.is_ready = ready;
        status.ready_at = ready.then_some(at);
    }
}
