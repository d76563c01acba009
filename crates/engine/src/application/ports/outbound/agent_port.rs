//! Agent invocation port.
//!
//! The agent is an opaque collaborator: it consumes one message and
//! produces a reply, and as a side effect may rewrite the campaign's
//! active-agent field through the state service. Anything it wants the
//! next active agent to know comes back as an explicit note instead of
//! an out-of-band event, so the orchestrator can drain it after each
//! invocation.

use async_trait::async_trait;
use loreweaver_domain::{AgentKind, CampaignId, PlayerId};

use crate::application::dto::AgentResponse;

/// What one agent invocation produced.
#[derive(Debug, Clone)]
pub struct AgentOutcome {
    pub response: AgentResponse,
    /// Instructions the agent wants relayed to the next active agent.
    pub gm_note: Option<String>,
}

impl AgentOutcome {
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            response: AgentResponse::ok(text),
            gm_note: None,
        }
    }

    pub fn with_gm_note(mut self, note: impl Into<String>) -> Self {
        self.gm_note = Some(note.into());
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("agent backend unavailable: {0}")]
    Unavailable(String),

    #[error("agent invocation failed: {0}")]
    Invocation(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentPort: Send + Sync {
    async fn process_message(
        &self,
        agent: AgentKind,
        campaign_id: CampaignId,
        player_id: PlayerId,
        message: String,
        model: Option<String>,
    ) -> Result<AgentOutcome, AgentError>;
}
