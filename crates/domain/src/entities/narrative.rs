//! Narrative log entries - recent story beats kept on the game state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// Who produced a narrative entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NarrativeSource {
    Player(PlayerId),
    Agent(String),
    System,
}

/// One entry in the recent-narrative ring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeEntry {
    pub source: NarrativeSource,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl NarrativeEntry {
    pub fn new(source: NarrativeSource, text: impl Into<String>) -> Self {
        Self {
            source,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}
