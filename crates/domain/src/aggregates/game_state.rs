//! GameState aggregate - the per-campaign working copy of everything the
//! message pipeline needs.
//!
//! One instance exists per campaign. It embeds a denormalized `Campaign`,
//! the `World`, the character roster, any active combat, and a bounded ring
//! of recent narrative entries. `version` strictly increases on every
//! successful update; `active_agent` always resolves to a known variant
//! because normalization happens at the hydration boundary.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AgentKind, Campaign, CampaignId, Character, Combat, NarrativeEntry, World};

/// Metadata key under which agents leave handoff instructions for the next
/// active agent.
pub const HANDOFF_CONTEXT_KEY: &str = "HandoffContext";

/// Default capacity of the recent-narrative ring.
pub const DEFAULT_NARRATIVE_CAPACITY: usize = 64;

/// Aggregate root for a single campaign's in-memory state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub campaign: Campaign,
    pub world: World,
    pub characters: Vec<Character>,
    pub current_combat: Option<Combat>,
    pub recent_narrative: Vec<NarrativeEntry>,
    #[serde(default)]
    pub narrative_capacity: usize,
    pub active_agent: AgentKind,
    pub version: u64,
    pub metadata: HashMap<String, String>,
    pub last_updated: DateTime<Utc>,
}

impl GameState {
    /// An empty shell bound to a campaign id, used when the store has
    /// nothing for that campaign yet. Never deleted by this subsystem.
    pub fn empty_shell(campaign_id: CampaignId) -> Self {
        let mut campaign = Campaign::default();
        campaign.id = campaign_id;
        Self {
            campaign,
            world: World::default(),
            characters: Vec::new(),
            current_combat: None,
            recent_narrative: Vec::new(),
            narrative_capacity: DEFAULT_NARRATIVE_CAPACITY,
            active_agent: AgentKind::GameMaster,
            version: 0,
            metadata: HashMap::new(),
            last_updated: Utc::now(),
        }
    }

    pub fn campaign_id(&self) -> &CampaignId {
        &self.campaign.id
    }

    /// Append a narrative entry, evicting the oldest beyond capacity.
    pub fn push_narrative(&mut self, entry: NarrativeEntry) {
        let capacity = if self.narrative_capacity == 0 {
            DEFAULT_NARRATIVE_CAPACITY
        } else {
            self.narrative_capacity
        };
        self.recent_narrative.push(entry);
        while self.recent_narrative.len() > capacity {
            self.recent_narrative.remove(0);
        }
    }

    /// Handoff instructions left by the previous agent, if any.
    pub fn handoff_context(&self) -> Option<&str> {
        self.metadata
            .get(HANDOFF_CONTEXT_KEY)
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Record handoff instructions for the next active agent.
    pub fn set_handoff_context(&mut self, note: impl Into<String>) {
        self.metadata.insert(HANDOFF_CONTEXT_KEY.to_string(), note.into());
    }

    /// Clear handoff instructions once consumed.
    pub fn clear_handoff_context(&mut self) {
        self.metadata.remove(HANDOFF_CONTEXT_KEY);
    }

    /// Whether `character_id` is listed in the cached roster.
    pub fn has_character(&self, character_id: &crate::CharacterId) -> bool {
        self.characters.iter().any(|c| c.id == *character_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NarrativeSource, PlayerId};

    #[test]
    fn empty_shell_binds_campaign_id() {
        let state = GameState::empty_shell(CampaignId::new("camp-9"));
        assert_eq!(state.campaign.id, CampaignId::new("camp-9"));
        assert_eq!(state.version, 0);
        assert_eq!(state.active_agent, AgentKind::GameMaster);
    }

    #[test]
    fn narrative_ring_evicts_oldest() {
        let mut state = GameState::empty_shell(CampaignId::new("camp-1"));
        state.narrative_capacity = 3;
        for i in 0..5 {
            state.push_narrative(NarrativeEntry::new(
                NarrativeSource::Player(PlayerId::new("p1")),
                format!("beat {i}"),
            ));
        }
        assert_eq!(state.recent_narrative.len(), 3);
        assert_eq!(state.recent_narrative[0].text, "beat 2");
        assert_eq!(state.recent_narrative[2].text, "beat 4");
    }

    #[test]
    fn handoff_context_round_trip() {
        let mut state = GameState::empty_shell(CampaignId::new("camp-1"));
        assert!(state.handoff_context().is_none());

        state.set_handoff_context("roll for initiative");
        assert_eq!(state.handoff_context(), Some("roll for initiative"));

        state.clear_handoff_context();
        assert!(state.handoff_context().is_none());
    }

    #[test]
    fn blank_handoff_context_reads_as_none() {
        let mut state = GameState::empty_shell(CampaignId::new("camp-1"));
        state.set_handoff_context("   ");
        assert!(state.handoff_context().is_none());
    }
}
