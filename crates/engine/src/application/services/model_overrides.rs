//! Scoped model-override registry.
//!
//! One map, one lock: scope changes race with concurrent message
//! processing across many campaigns, so every read and write goes through
//! the same mutex. A campaign-scoped override beats the global one.

use std::collections::HashMap;

use loreweaver_domain::CampaignId;
use tokio::sync::Mutex;

/// Reserved scope applied when no campaign-specific override exists.
pub const GLOBAL_SCOPE: &str = "global";

#[derive(Default)]
pub struct ModelOverrides {
    by_scope: Mutex<HashMap<String, String>>,
}

impl ModelOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a global default model already applied.
    pub fn with_global(model: Option<String>) -> Self {
        let mut by_scope = HashMap::new();
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            by_scope.insert(GLOBAL_SCOPE.to_string(), model);
        }
        Self {
            by_scope: Mutex::new(by_scope),
        }
    }

    /// Set or clear an override. A blank scope targets the global entry;
    /// a blank model id clears the scope.
    pub async fn set(&self, scope_id: &str, model_id: &str) {
        let scope = if scope_id.trim().is_empty() {
            GLOBAL_SCOPE
        } else {
            scope_id
        };
        let mut by_scope = self.by_scope.lock().await;
        if model_id.trim().is_empty() {
            by_scope.remove(scope);
            tracing::info!(scope, "model override cleared");
        } else {
            by_scope.insert(scope.to_string(), model_id.to_string());
            tracing::info!(scope, model = model_id, "model override set");
        }
    }

    /// Effective model for a campaign: campaign scope first, then global.
    pub async fn resolve(&self, campaign_id: &CampaignId) -> Option<String> {
        let by_scope = self.by_scope.lock().await;
        by_scope
            .get(campaign_id.as_str())
            .or_else(|| by_scope.get(GLOBAL_SCOPE))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn campaign_override_beats_global() {
        let overrides = ModelOverrides::new();
        overrides.set("", "global-model").await;
        overrides.set("camp-1", "campaign-model").await;

        assert_eq!(
            overrides.resolve(&CampaignId::new("camp-1")).await.as_deref(),
            Some("campaign-model")
        );
        assert_eq!(
            overrides.resolve(&CampaignId::new("camp-2")).await.as_deref(),
            Some("global-model")
        );
    }

    #[tokio::test]
    async fn blank_model_clears_the_scope() {
        let overrides = ModelOverrides::new();
        overrides.set("camp-1", "campaign-model").await;
        overrides.set("camp-1", "  ").await;
        assert!(overrides.resolve(&CampaignId::new("camp-1")).await.is_none());
    }

    #[tokio::test]
    async fn seeded_global_default_applies_everywhere() {
        let overrides = ModelOverrides::with_global(Some("default-model".into()));
        assert_eq!(
            overrides.resolve(&CampaignId::new("anything")).await.as_deref(),
            Some("default-model")
        );
        assert!(ModelOverrides::with_global(Some("  ".into()))
            .resolve(&CampaignId::new("anything"))
            .await
            .is_none());
    }
}
