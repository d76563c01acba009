//! Agent kinds - the specialized responder variants a campaign can route to.
//!
//! The active agent is persisted on game state as a string, so stale or
//! hand-edited records can carry values that map to no variant. Parsing is
//! strict everywhere except the state-hydration boundary, which normalizes
//! unknown values to the game master exactly once (see `normalize`).

use std::fmt;
use std::str::FromStr;

use serde::de::Deserializer;
use serde::{Deserialize, Serialize, Serializer};

use crate::DomainError;

/// The specialized agent variants a message can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    GameMaster,
    Combat,
    CharacterCreation,
    CharacterManager,
    ShopKeeper,
    WorldBuilder,
}

impl AgentKind {
    /// All known variants, in routing-table order.
    pub const ALL: [AgentKind; 6] = [
        AgentKind::GameMaster,
        AgentKind::Combat,
        AgentKind::CharacterCreation,
        AgentKind::CharacterManager,
        AgentKind::ShopKeeper,
        AgentKind::WorldBuilder,
    ];

    /// Normalize a persisted active-agent field.
    ///
    /// Unknown or blank values resolve to `GameMaster`. Called exactly once,
    /// where state is hydrated from the store; every other parse site uses
    /// the strict `FromStr` and surfaces an error.
    pub fn normalize(value: &str) -> Self {
        value.parse().unwrap_or(AgentKind::GameMaster)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::GameMaster => "GameMaster",
            AgentKind::Combat => "Combat",
            AgentKind::CharacterCreation => "CharacterCreation",
            AgentKind::CharacterManager => "CharacterManager",
            AgentKind::ShopKeeper => "ShopKeeper",
            AgentKind::WorldBuilder => "WorldBuilder",
        }
    }
}

impl Default for AgentKind {
    fn default() -> Self {
        AgentKind::GameMaster
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for AgentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Deserialization is the hydration boundary: unknown values normalize
/// instead of failing, so a stale record never blocks a campaign.
impl<'de> Deserialize<'de> for AgentKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(AgentKind::normalize(&raw))
    }
}

impl FromStr for AgentKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gamemaster" | "game_master" | "gm" => Ok(AgentKind::GameMaster),
            "combat" => Ok(AgentKind::Combat),
            "charactercreation" | "character_creation" => Ok(AgentKind::CharacterCreation),
            "charactermanager" | "character_manager" => Ok(AgentKind::CharacterManager),
            "shopkeeper" | "shop_keeper" => Ok(AgentKind::ShopKeeper),
            "worldbuilder" | "world_builder" => Ok(AgentKind::WorldBuilder),
            _ => Err(DomainError::UnknownAgent(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_variants() {
        assert_eq!("GameMaster".parse::<AgentKind>().ok(), Some(AgentKind::GameMaster));
        assert_eq!("combat".parse::<AgentKind>().ok(), Some(AgentKind::Combat));
        assert_eq!(
            "character_creation".parse::<AgentKind>().ok(),
            Some(AgentKind::CharacterCreation)
        );
        assert_eq!("ShopKeeper".parse::<AgentKind>().ok(), Some(AgentKind::ShopKeeper));
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        let err = "Bard".parse::<AgentKind>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownAgent(_)));
    }

    #[test]
    fn normalize_falls_back_to_game_master() {
        assert_eq!(AgentKind::normalize("Combat"), AgentKind::Combat);
        assert_eq!(AgentKind::normalize("garbage"), AgentKind::GameMaster);
        assert_eq!(AgentKind::normalize(""), AgentKind::GameMaster);
    }

    #[test]
    fn deserialization_normalizes_unknown_values() {
        let kind: AgentKind = serde_json::from_str("\"combat\"").unwrap();
        assert_eq!(kind, AgentKind::Combat);

        let kind: AgentKind = serde_json::from_str("\"SomethingElse\"").unwrap();
        assert_eq!(kind, AgentKind::GameMaster);
    }

    #[test]
    fn serialization_uses_canonical_name() {
        let json = serde_json::to_string(&AgentKind::ShopKeeper).unwrap();
        assert_eq!(json, "\"ShopKeeper\"");
    }

    #[test]
    fn display_round_trips_through_parse() {
        for kind in AgentKind::ALL {
            assert_eq!(kind.as_str().parse::<AgentKind>().ok(), Some(kind));
        }
    }
}
