//! Priority scoring for queued player messages.
//!
//! Pure function of the request and a state snapshot. Higher scores drain
//! sooner; ties fall back to arrival order in the queue.

use loreweaver_domain::{CharacterId, GameState};

/// The player whose turn it is jumps the queue.
pub const CURRENT_TURN_BONUS: i32 = 100;
/// Peak bonus for the character currently acting in combat.
pub const INITIATIVE_WINDOW_BONUS: i32 = 50;
/// Falloff per step of forward wrap-around distance in the initiative order.
pub const INITIATIVE_DISTANCE_PENALTY: i32 = 10;
/// Short, likely time-critical quips are favored over long-form narration.
pub const SHORT_MESSAGE_BONUS: i32 = 5;
pub const SHORT_MESSAGE_MAX_CHARS: usize = 140;

pub fn message_priority(
    state: &GameState,
    character_id: Option<&CharacterId>,
    message: &str,
) -> i32 {
    let mut priority = 0;

    if let (Some(character_id), Some(current_turn)) =
        (character_id, state.campaign.current_turn_character_id.as_ref())
    {
        if character_id.eq_ignore_case(current_turn) {
            priority += CURRENT_TURN_BONUS;
        }
    }

    if let (Some(combat), Some(character_id)) = (state.current_combat.as_ref(), character_id) {
        if let Some(index) = combat.position_of(character_id) {
            let distance = combat.turns_until(index) as i32;
            priority +=
                (INITIATIVE_WINDOW_BONUS - INITIATIVE_DISTANCE_PENALTY * distance).max(0);
        }
    }

    if !message.trim().is_empty() && message.chars().count() < SHORT_MESSAGE_MAX_CHARS {
        priority += SHORT_MESSAGE_BONUS;
    }

    priority
}
