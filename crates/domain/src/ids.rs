//! Identifier newtypes for campaign-scoped entities.
//!
//! Ids arrive from clients as opaque strings, so they are string-backed
//! rather than parsed into UUIDs. Blank ids are representable (and checked
//! at the service boundary) because stale persisted state may carry them.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }

            /// Case-insensitive comparison for client-supplied ids.
            pub fn eq_ignore_case(&self, other: &$name) -> bool {
                self.0.eq_ignore_ascii_case(&other.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

// Core entity IDs
define_id!(CampaignId);
define_id!(PlayerId);
define_id!(CharacterId);
define_id!(WorldId);
define_id!(CombatId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_id_is_empty() {
        assert!(CampaignId::new("").is_empty());
        assert!(CampaignId::new("   ").is_empty());
        assert!(!CampaignId::new("camp-1").is_empty());
    }

    #[test]
    fn eq_ignore_case_matches_mixed_case() {
        let a = CharacterId::new("Char-ABC");
        let b = CharacterId::new("char-abc");
        assert!(a.eq_ignore_case(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn display_round_trips() {
        let id = WorldId::new("world-7");
        assert_eq!(id.to_string(), "world-7");
    }
}
