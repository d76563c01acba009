//! Engine configuration loaded from the environment.
//!
//! Only operational knobs live here. Scoped model overrides are runtime
//! state and belong to [`crate::application::services::ModelOverrides`];
//! this module merely seeds its global default.

pub const DEFAULT_NARRATIVE_CAPACITY: usize = 64;
pub const DEFAULT_BROADCAST_CAPACITY: usize = 32;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Model applied when no scoped override exists.
    pub default_model: Option<String>,
    /// Narrative entries retained per campaign before the oldest are dropped.
    pub narrative_capacity: usize,
    /// Buffered state-change events per broadcast channel.
    pub broadcast_capacity: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_model: None,
            narrative_capacity: DEFAULT_NARRATIVE_CAPACITY,
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

impl EngineSettings {
    /// Read settings from `LOREWEAVER_*` environment variables, loading a
    /// `.env` file first if one is present. Unset or unparsable values fall
    /// back to the defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let default_model = std::env::var("LOREWEAVER_DEFAULT_MODEL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let narrative_capacity = parse_capacity(
            "LOREWEAVER_NARRATIVE_CAPACITY",
            DEFAULT_NARRATIVE_CAPACITY,
        );
        let broadcast_capacity = parse_capacity(
            "LOREWEAVER_BROADCAST_CAPACITY",
            DEFAULT_BROADCAST_CAPACITY,
        );

        Self {
            default_model,
            narrative_capacity,
            broadcast_capacity,
        }
    }
}

fn parse_capacity(var: &str, fallback: usize) -> usize {
    match std::env::var(var) {
        Ok(raw) => match raw.trim().parse::<usize>() {
            Ok(value) if value > 0 => value,
            _ => {
                tracing::warn!(var, value = %raw, "ignoring invalid capacity setting");
                fallback
            }
        },
        Err(_) => fallback,
    }
}
