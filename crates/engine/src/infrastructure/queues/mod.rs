//! In-process message queues.

pub mod campaign_queue;

pub use campaign_queue::{CampaignMessageQueue, MessageProcessor, MessageResult};
