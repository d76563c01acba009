//! Data transfer types crossing the application boundary.

pub mod messages;

pub use messages::{
    AgentResponse, FormattedResponse, MessageQueueStatus, MessageQueueUpdate,
    PlayerMessageRequest, StatusCallback,
};
