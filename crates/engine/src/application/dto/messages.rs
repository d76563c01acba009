//! Message-pipeline data transfer types.
//!
//! `PlayerMessageRequest` is immutable once constructed; the queue and the
//! orchestrator only read it. Status callbacks are best-effort and must
//! never feed back into the request's own outcome.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use loreweaver_domain::{AgentKind, CampaignId, CharacterId, DomainError, PlayerId};
use serde::{Deserialize, Serialize};

/// Async callback invoked on every observable transition of a queued
/// request. Failures are logged and swallowed by the queue.
pub type StatusCallback =
    Arc<dyn Fn(MessageQueueUpdate) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Lifecycle states of a queued player message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageQueueStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

/// One observable transition of a queued request.
///
/// `position` is a snapshot taken when the transition is emitted; it is
/// never re-validated as the item moves up the queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageQueueUpdate {
    pub correlation_id: Option<String>,
    pub status: MessageQueueStatus,
    pub position: Option<usize>,
    pub note: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl MessageQueueUpdate {
    pub fn new(correlation_id: Option<String>, status: MessageQueueStatus) -> Self {
        Self {
            correlation_id,
            status,
            position: None,
            note: None,
            timestamp: Utc::now(),
        }
    }

    pub fn at_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// A player chat message submitted for routing.
#[derive(Clone)]
pub struct PlayerMessageRequest {
    pub campaign_id: CampaignId,
    pub player_id: PlayerId,
    pub character_id: Option<CharacterId>,
    pub message: String,
    /// Explicit routing target; `None` defers to the campaign's active agent.
    pub target_agent: Option<AgentKind>,
    pub correlation_id: Option<String>,
    pub status_callback: Option<StatusCallback>,
}

impl PlayerMessageRequest {
    pub fn new(
        campaign_id: CampaignId,
        player_id: PlayerId,
        message: impl Into<String>,
    ) -> Self {
        Self {
            campaign_id,
            player_id,
            character_id: None,
            message: message.into(),
            target_agent: None,
            correlation_id: None,
            status_callback: None,
        }
    }

    pub fn with_character(mut self, character_id: CharacterId) -> Self {
        self.character_id = Some(character_id);
        self
    }

    pub fn with_target_agent(mut self, target: AgentKind) -> Self {
        self.target_agent = Some(target);
        self
    }

    /// Parse a client-supplied target-agent name, rejecting unknown values.
    pub fn with_target_agent_name(self, target: &str) -> Result<Self, DomainError> {
        let parsed = target.parse::<AgentKind>()?;
        Ok(self.with_target_agent(parsed))
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn with_status_callback(mut self, callback: StatusCallback) -> Self {
        self.status_callback = Some(callback);
        self
    }
}

impl fmt::Debug for PlayerMessageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerMessageRequest")
            .field("campaign_id", &self.campaign_id)
            .field("player_id", &self.player_id)
            .field("character_id", &self.character_id)
            .field("message", &self.message)
            .field("target_agent", &self.target_agent)
            .field("correlation_id", &self.correlation_id)
            .field("status_callback", &self.status_callback.is_some())
            .finish()
    }
}

/// Structured narrative payload attached to a successful reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedResponse {
    pub narrative: String,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
}

/// Outcome of processing one player message. Returned to the caller of
/// enqueue/process; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResponse {
    pub success: bool,
    pub message: String,
    pub formatted: Option<FormattedResponse>,
    /// Diagnostic detail for logs; never shown to players.
    pub error: Option<String>,
}

impl AgentResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            formatted: None,
            error: None,
        }
    }

    pub fn with_formatted(mut self, formatted: FormattedResponse) -> Self {
        self.formatted = Some(formatted);
        self
    }

    pub fn failure(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            formatted: None,
            error: Some(detail.into()),
        }
    }
}
