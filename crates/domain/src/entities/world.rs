//! World entity - the campaign's setting container.

use serde::{Deserialize, Serialize};

use crate::WorldId;

/// The setting a campaign plays in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    pub id: WorldId,
    pub name: String,
    pub description: String,
}

impl World {
    pub fn new(id: WorldId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// A world with a blank name is a placeholder shell, not yet authored.
    pub fn is_named(&self) -> bool {
        !self.name.trim().is_empty()
    }
}
