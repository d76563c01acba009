//! In-process state broadcaster.
//!
//! One broadcast channel per campaign, created lazily. Sending with no
//! live receivers is a no-op, not an error; slow receivers that lag past
//! the channel capacity drop the oldest updates.

use async_trait::async_trait;
use dashmap::DashMap;
use loreweaver_domain::{CampaignId, GameState};
use tokio::sync::broadcast;

use crate::application::ports::outbound::{BroadcastError, BroadcastPort};

const CHANNEL_CAPACITY: usize = 32;

pub struct ChannelBroadcaster {
    channels: DashMap<CampaignId, broadcast::Sender<serde_json::Value>>,
    capacity: usize,
}

impl Default for ChannelBroadcaster {
    fn default() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }
}

impl ChannelBroadcaster {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to state snapshots for one campaign.
    pub fn subscribe(&self, campaign_id: &CampaignId) -> broadcast::Receiver<serde_json::Value> {
        self.sender(campaign_id).subscribe()
    }

    fn sender(&self, campaign_id: &CampaignId) -> broadcast::Sender<serde_json::Value> {
        self.channels
            .entry(campaign_id.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

#[async_trait]
impl BroadcastPort for ChannelBroadcaster {
    async fn broadcast_state(
        &self,
        campaign_id: CampaignId,
        state: &GameState,
    ) -> Result<(), BroadcastError> {
        let snapshot = serde_json::to_value(state)?;
        let receivers = self.sender(&campaign_id).send(snapshot).unwrap_or(0);
        tracing::debug!(campaign_id = %campaign_id, receivers, "state snapshot broadcast");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_state_snapshots() {
        let broadcaster = ChannelBroadcaster::default();
        let campaign_id = CampaignId::new("camp-1");
        let mut rx = broadcaster.subscribe(&campaign_id);

        let state = GameState::empty_shell(campaign_id.clone());
        broadcaster
            .broadcast_state(campaign_id, &state)
            .await
            .unwrap();

        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot["campaign"]["id"], "camp-1");
    }

    #[tokio::test]
    async fn broadcasting_without_subscribers_is_a_no_op() {
        let broadcaster = ChannelBroadcaster::default();
        let campaign_id = CampaignId::new("camp-1");
        let state = GameState::empty_shell(campaign_id.clone());

        assert!(broadcaster.broadcast_state(campaign_id, &state).await.is_ok());
    }

    #[tokio::test]
    async fn campaigns_have_isolated_channels() {
        let broadcaster = ChannelBroadcaster::default();
        let mut other = broadcaster.subscribe(&CampaignId::new("camp-2"));

        let campaign_id = CampaignId::new("camp-1");
        let state = GameState::empty_shell(campaign_id.clone());
        broadcaster
            .broadcast_state(campaign_id, &state)
            .await
            .unwrap();

        assert!(matches!(
            other.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }
}
