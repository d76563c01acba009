//! Loreweaver engine.
//!
//! Server-side orchestration core for multiplayer narrative campaigns:
//! per-campaign message queues, agent routing with handoff, cached game
//! state with live broadcast, and scoped model overrides.
//!
//! ## Structure
//!
//! - `application/` - DTOs, outbound ports, and the orchestration services
//! - `infrastructure/` - In-process adapters (queues, store, broadcaster)
//! - `error` - Pipeline error types

pub mod application;
pub mod error;
pub mod infrastructure;

/// Full-wiring integration tests over the in-process adapters.
#[cfg(test)]
mod integration_tests;

pub use application::dto::{
    AgentResponse, FormattedResponse, MessageQueueStatus, MessageQueueUpdate,
    PlayerMessageRequest, StatusCallback,
};
pub use application::ports::outbound::{
    AgentError, AgentOutcome, AgentPort, BroadcastError, BroadcastPort, StateStorePort, StoreError,
};
pub use application::services::{
    AgentOrchestrator, GameStateService, MessageRouter, ModelOverrides, StateChangedEvent,
};
pub use error::{OrchestratorError, QueueError};
pub use infrastructure::{ChannelBroadcaster, EngineSettings, InMemoryStateStore};
