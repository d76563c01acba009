//! Combat encounter state - initiative order and current actor.

use serde::{Deserialize, Serialize};

use crate::{CharacterId, CombatId};

/// An active combat encounter within a campaign.
///
/// `initiative_order` is the fixed turn order for the encounter;
/// `current_turn_index` points at the acting character.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combat {
    pub id: CombatId,
    pub initiative_order: Vec<CharacterId>,
    pub current_turn_index: usize,
    pub round: u32,
}

impl Combat {
    pub fn new(id: CombatId, initiative_order: Vec<CharacterId>) -> Self {
        Self {
            id,
            initiative_order,
            current_turn_index: 0,
            round: 1,
        }
    }

    /// Position of a character in the initiative order, case-insensitive.
    pub fn position_of(&self, character_id: &CharacterId) -> Option<usize> {
        self.initiative_order
            .iter()
            .position(|c| c.eq_ignore_case(character_id))
    }

    /// Forward wrap-around distance from the current actor to `index`.
    ///
    /// Distance 0 is the current actor; larger values are further away in
    /// turn order, modulo the order length.
    pub fn turns_until(&self, index: usize) -> usize {
        let len = self.initiative_order.len();
        if len == 0 {
            return 0;
        }
        (index + len - self.current_turn_index % len) % len
    }

    /// Advance to the next actor, wrapping and bumping the round counter.
    pub fn advance_turn(&mut self) {
        if self.initiative_order.is_empty() {
            return;
        }
        self.current_turn_index = (self.current_turn_index + 1) % self.initiative_order.len();
        if self.current_turn_index == 0 {
            self.round += 1;
        }
    }
}
