//! Domain entities owned by the state store, denormalized into `GameState`.

pub mod campaign;
pub mod character;
pub mod combat;
pub mod narrative;
pub mod world;

pub use campaign::{Campaign, PlayerReadyStatus};
pub use character::Character;
pub use combat::Combat;
pub use narrative::{NarrativeEntry, NarrativeSource};
pub use world::World;
