//! Character entity - a player- or campaign-owned character sheet summary.

use serde::{Deserialize, Serialize};

use crate::{CampaignId, CharacterId, PlayerId};

/// A character participating in a campaign.
///
/// Only the fields message routing cares about live here; full sheet data is
/// a store-level concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    pub campaign_id: CampaignId,
    pub name: String,
    pub player_id: Option<PlayerId>,
    pub level: u32,
    pub is_active: bool,
}

impl Character {
    pub fn new(id: CharacterId, campaign_id: CampaignId, name: impl Into<String>) -> Self {
        Self {
            id,
            campaign_id,
            name: name.into(),
            player_id: None,
            level: 1,
            is_active: true,
        }
    }

    pub fn with_player(mut self, player_id: PlayerId) -> Self {
        self.player_id = Some(player_id);
        self
    }
}
