//! Aggregate roots - domain objects that own their related data.

pub mod game_state;

pub use game_state::{GameState, DEFAULT_NARRATIVE_CAPACITY, HANDOFF_CONTEXT_KEY};
