//! Agent orchestration.
//!
//! `AgentOrchestrator` owns the per-campaign queue registry and the model
//! override registry; `MessageRouter` is the processing half, bound to each
//! queue as its worker callback. Routing resolves the acting agent, invokes
//! it, then observes the active-agent field for a handoff: agents drive
//! transitions by writing the field, the orchestrator only reacts after
//! the fact and performs at most `MAX_HANDOFF_HOPS` re-invocations within
//! the same worker turn.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use loreweaver_domain::{AgentKind, CampaignId, DomainError, GameState};

use crate::application::dto::{AgentResponse, PlayerMessageRequest};
use crate::application::ports::outbound::AgentPort;
use crate::application::services::game_state_service::GameStateService;
use crate::application::services::model_overrides::ModelOverrides;
use crate::application::services::priority::message_priority;
use crate::error::{OrchestratorError, QueueError};
use crate::infrastructure::queues::{CampaignMessageQueue, MessageProcessor, MessageResult};

/// A handoff re-routes the same logical turn to the newly active agent at
/// most this many times per processed message.
pub const MAX_HANDOFF_HOPS: usize = 1;

/// Player-facing reply when processing fails for any reason.
pub const FALLBACK_REPLY: &str =
    "Something went wrong while handling that message. Please try again in a moment.";

/// Resolves the acting agent for a message, invokes it, and follows a
/// detected handoff. Bound to every campaign queue as its processor.
pub struct MessageRouter {
    agents: Arc<dyn AgentPort>,
    state: Arc<GameStateService>,
    overrides: Arc<ModelOverrides>,
}

impl MessageRouter {
    pub fn new(
        agents: Arc<dyn AgentPort>,
        state: Arc<GameStateService>,
        overrides: Arc<ModelOverrides>,
    ) -> Self {
        Self {
            agents,
            state,
            overrides,
        }
    }

    /// Process one message end to end. Never lets an error escape: any
    /// failure becomes a failed response carrying a player-safe message,
    /// with the raw error kept for logs only.
    pub async fn process_message(&self, request: &PlayerMessageRequest) -> AgentResponse {
        match self.route(request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::error!(
                    campaign_id = %request.campaign_id,
                    player_id = %request.player_id,
                    %error,
                    "message processing failed"
                );
                AgentResponse::failure(FALLBACK_REPLY, error.to_string())
            }
        }
    }

    async fn route(
        &self,
        request: &PlayerMessageRequest,
    ) -> Result<AgentResponse, OrchestratorError> {
        let state = self.state.get_state(&request.campaign_id).await?;
        let acting = self.resolve_agent(request, &state).await?;
        let model = self.overrides.resolve(&request.campaign_id).await;

        let outcome = self
            .agents
            .process_message(
                acting,
                request.campaign_id.clone(),
                request.player_id.clone(),
                request.message.clone(),
                model.clone(),
            )
            .await?;
        self.record_gm_note(&request.campaign_id, outcome.gm_note.as_deref())
            .await;

        let mut current_agent = acting;
        let mut response = outcome.response;
        for _ in 0..MAX_HANDOFF_HOPS {
            let reloaded = self.state.get_state(&request.campaign_id).await?;
            if reloaded.active_agent == current_agent {
                break;
            }
            let next_agent = reloaded.active_agent;
            tracing::info!(
                campaign_id = %request.campaign_id,
                from = %current_agent,
                to = %next_agent,
                "agent handoff detected"
            );

            let forwarded = match reloaded.handoff_context() {
                Some(context) => {
                    let rewritten = format!(
                        "[Handoff from {current_agent} to {next_agent}]\nOriginal User Message: {}\n\n**Instructions:** {context}",
                        request.message
                    );
                    self.consume_handoff_context(reloaded).await;
                    rewritten
                }
                None => request.message.clone(),
            };

            let outcome = self
                .agents
                .process_message(
                    next_agent,
                    request.campaign_id.clone(),
                    request.player_id.clone(),
                    forwarded,
                    model.clone(),
                )
                .await?;
            self.record_gm_note(&request.campaign_id, outcome.gm_note.as_deref())
                .await;
            response = outcome.response;
            current_agent = next_agent;
        }
        Ok(response)
    }

    /// Explicit targets are sticky: the active-agent field is rewritten
    /// before the invocation so follow-up messages land on the same agent.
    async fn resolve_agent(
        &self,
        request: &PlayerMessageRequest,
        state: &GameState,
    ) -> Result<AgentKind, OrchestratorError> {
        match request.target_agent {
            Some(target) => {
                if target != state.active_agent {
                    let mut next = state.clone();
                    next.active_agent = target;
                    self.state
                        .update_state(next, format!("explicit route to {target}"))
                        .await?;
                }
                Ok(target)
            }
            None => Ok(state.active_agent),
        }
    }

    /// Store an agent's note for the next handoff. Fire-and-forget:
    /// failures are logged, never surfaced.
    async fn record_gm_note(&self, campaign_id: &CampaignId, note: Option<&str>) {
        let Some(note) = note.filter(|n| !n.trim().is_empty()) else {
            return;
        };
        match self.state.get_state(campaign_id).await {
            Ok(mut state) => {
                state.set_handoff_context(note);
                if let Err(error) = self
                    .state
                    .update_state(state, "handoff note recorded")
                    .await
                {
                    tracing::warn!(
                        campaign_id = %campaign_id,
                        %error,
                        "failed to record handoff note"
                    );
                }
            }
            Err(error) => {
                tracing::warn!(
                    campaign_id = %campaign_id,
                    %error,
                    "failed to load state for handoff note"
                );
            }
        }
    }

    /// Clear a consumed handoff note so a later handoff starts clean.
    async fn consume_handoff_context(&self, mut state: GameState) {
        state.clear_handoff_context();
        if let Err(error) = self
            .state
            .update_state(state, "handoff context consumed")
            .await
        {
            tracing::warn!(%error, "failed to clear handoff context");
        }
    }
}

#[async_trait]
impl MessageProcessor for MessageRouter {
    async fn process(&self, request: PlayerMessageRequest) -> MessageResult {
        Ok(self.process_message(&request).await)
    }
}

/// Front door of the message pipeline. Owns the per-campaign queues
/// (created lazily, never torn down) and the model-override registry.
pub struct AgentOrchestrator {
    router: Arc<MessageRouter>,
    state: Arc<GameStateService>,
    overrides: Arc<ModelOverrides>,
    queues: DashMap<CampaignId, Arc<CampaignMessageQueue>>,
}

impl AgentOrchestrator {
    pub fn new(
        agents: Arc<dyn AgentPort>,
        state: Arc<GameStateService>,
        overrides: Arc<ModelOverrides>,
    ) -> Self {
        let router = Arc::new(MessageRouter::new(
            agents,
            Arc::clone(&state),
            Arc::clone(&overrides),
        ));
        Self {
            router,
            state,
            overrides,
            queues: DashMap::new(),
        }
    }

    /// Queue a message on its campaign and wait for the final response,
    /// including any handoff re-invocation.
    pub async fn enqueue_campaign_message(
        &self,
        request: PlayerMessageRequest,
    ) -> Result<AgentResponse, OrchestratorError> {
        if request.campaign_id.is_empty() || request.player_id.is_empty() {
            return Err(
                DomainError::validation("campaign id and player id must not be empty").into(),
            );
        }
        let priority = self.compute_priority(&request).await;
        let queue = self.queue_for(&request.campaign_id);
        let handle = queue.enqueue(request, priority).await;
        let result = handle.await.map_err(QueueError::from)?;
        result
    }

    /// Process a message immediately, bypassing the campaign queue.
    pub async fn process_message(&self, request: &PlayerMessageRequest) -> AgentResponse {
        self.router.process_message(request).await
    }

    /// Set or clear a model override. A blank scope targets the global
    /// entry; a blank model id clears the scope.
    pub async fn change_model(&self, scope_id: &str, model_id: &str) {
        self.overrides.set(scope_id, model_id).await;
    }

    /// Messages waiting on a campaign's queue, excluding the one being
    /// processed.
    pub async fn queue_depth(&self, campaign_id: &CampaignId) -> usize {
        let queue = self
            .queues
            .get(campaign_id)
            .map(|entry| Arc::clone(entry.value()));
        match queue {
            Some(queue) => queue.depth().await,
            None => 0,
        }
    }

    fn queue_for(&self, campaign_id: &CampaignId) -> Arc<CampaignMessageQueue> {
        Arc::clone(
            self.queues
                .entry(campaign_id.clone())
                .or_insert_with(|| {
                    Arc::new(CampaignMessageQueue::new(
                        campaign_id.clone(),
                        Arc::clone(&self.router) as Arc<dyn MessageProcessor>,
                    ))
                })
                .value(),
        )
    }

    /// Any failure to load state here yields priority 0 so enqueue is
    /// never blocked by the store.
    async fn compute_priority(&self, request: &PlayerMessageRequest) -> i32 {
        match self.state.get_state(&request.campaign_id).await {
            Ok(state) => {
                message_priority(&state, request.character_id.as_ref(), &request.message)
            }
            Err(error) => {
                tracing::warn!(
                    campaign_id = %request.campaign_id,
                    %error,
                    "priority computation fell back to 0"
                );
                0
            }
        }
    }
}
