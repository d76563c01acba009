//! Outbound ports - contracts the engine expects its collaborators to fill.

pub mod agent_port;
pub mod broadcast_port;
pub mod state_store_port;

pub use agent_port::{AgentError, AgentOutcome, AgentPort};
pub use broadcast_port::{BroadcastError, BroadcastPort};
pub use state_store_port::{StateStorePort, StoreError};

#[cfg(test)]
pub use agent_port::MockAgentPort;
#[cfg(test)]
pub use broadcast_port::MockBroadcastPort;
#[cfg(test)]
pub use state_store_port::MockStateStorePort;
