//! Engine-level error taxonomy.
//!
//! Collaborator failures are typed per port; `OrchestratorError` is the
//! aggregate that crosses service boundaries. The orchestrator converts it
//! into a failed `AgentResponse` at the outermost boundary, so callers of
//! the message pipeline never see a raw error.

use loreweaver_domain::DomainError;

use crate::application::ports::outbound::{AgentError, BroadcastError, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("message was abandoned before completion")]
    Abandoned(#[from] tokio::sync::oneshot::error::RecvError),
}

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Broadcast(#[from] BroadcastError),

    #[error(transparent)]
    Queue(#[from] QueueError),
}
