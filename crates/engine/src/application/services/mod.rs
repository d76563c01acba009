//! Application services: orchestration, state, and routing policy.

pub mod game_state_service;
pub mod model_overrides;
pub mod orchestrator;
pub mod priority;

pub use game_state_service::{GameStateService, StateChangedEvent};
pub use model_overrides::ModelOverrides;
pub use orchestrator::{AgentOrchestrator, MessageRouter};
pub use priority::message_priority;
