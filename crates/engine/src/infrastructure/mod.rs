//! Infrastructure adapters: in-process implementations of the outbound
//! ports plus the per-campaign queue machinery.

pub mod broadcast;
pub mod memory_store;
pub mod queues;
pub mod settings;

pub use broadcast::ChannelBroadcaster;
pub use memory_store::InMemoryStateStore;
pub use settings::EngineSettings;
