//! Full-wiring integration tests.
//!
//! Everything here runs against the real in-process adapters: the memory
//! store, the channel broadcaster, the state service, the campaign queues,
//! and the orchestrator, with only the agent scripted.

use std::sync::Arc;

use async_trait::async_trait;
use loreweaver_domain::{
    AgentKind, Campaign, CampaignId, Character, CharacterId, NarrativeEntry, NarrativeSource,
    PlayerId,
};
use tokio::sync::{mpsc, Mutex};

use crate::application::dto::{
    MessageQueueStatus, MessageQueueUpdate, PlayerMessageRequest, StatusCallback,
};
use crate::application::ports::outbound::{
    AgentError, AgentOutcome, AgentPort, BroadcastPort, StateStorePort,
};
use crate::application::services::{AgentOrchestrator, GameStateService, ModelOverrides};
use crate::infrastructure::{ChannelBroadcaster, EngineSettings, InMemoryStateStore};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("loreweaver_engine=debug")
        .with_test_writer()
        .try_init();
}

/// Narrates every message through the state service, so the whole
/// state pipeline is exercised per processed message.
struct NarratingAgent {
    state: Arc<GameStateService>,
    seen_models: Mutex<Vec<Option<String>>>,
}

#[async_trait]
impl AgentPort for NarratingAgent {
    async fn process_message(
        &self,
        _agent: AgentKind,
        campaign_id: CampaignId,
        player_id: PlayerId,
        message: String,
        model: Option<String>,
    ) -> Result<AgentOutcome, AgentError> {
        self.seen_models.lock().await.push(model);
        let mut state = self
            .state
            .get_state(&campaign_id)
            .await
            .map_err(|e| AgentError::Invocation(e.to_string()))?;
        state.push_narrative(NarrativeEntry::new(
            NarrativeSource::Player(player_id),
            format!("echo: {message}"),
        ));
        self.state
            .update_state(state, "narration appended")
            .await
            .map_err(|e| AgentError::Invocation(e.to_string()))?;
        Ok(AgentOutcome::reply(format!("echo: {message}")))
    }
}

struct Harness {
    store: Arc<InMemoryStateStore>,
    broadcaster: Arc<ChannelBroadcaster>,
    state: Arc<GameStateService>,
    agent: Arc<NarratingAgent>,
    orchestrator: AgentOrchestrator,
}

fn harness(settings: &EngineSettings) -> Harness {
    init_tracing();
    let store = Arc::new(InMemoryStateStore::default());
    let broadcaster = Arc::new(ChannelBroadcaster::default());
    let state = Arc::new(GameStateService::with_settings(
        Arc::clone(&store) as Arc<dyn StateStorePort>,
        Arc::clone(&broadcaster) as Arc<dyn BroadcastPort>,
        settings,
    ));
    let agent = Arc::new(NarratingAgent {
        state: Arc::clone(&state),
        seen_models: Mutex::new(Vec::new()),
    });
    let orchestrator = AgentOrchestrator::new(
        Arc::clone(&agent) as Arc<dyn AgentPort>,
        Arc::clone(&state),
        Arc::new(ModelOverrides::with_global(settings.default_model.clone())),
    );
    Harness {
        store,
        broadcaster,
        state,
        agent,
        orchestrator,
    }
}

fn request(message: &str) -> PlayerMessageRequest {
    PlayerMessageRequest::new(CampaignId::new("camp-1"), PlayerId::new("p1"), message)
}

#[tokio::test]
async fn queued_message_reports_its_full_lifecycle() {
    let h = harness(&EngineSettings::default());
    let (tx, mut rx) = mpsc::unbounded_channel::<MessageQueueUpdate>();
    let callback: StatusCallback = Arc::new(move |update| {
        let tx = tx.clone();
        Box::pin(async move {
            tx.send(update)?;
            Ok(())
        })
    });

    let response = h
        .orchestrator
        .enqueue_campaign_message(
            request("hello there")
                .with_correlation_id("corr-1")
                .with_status_callback(callback),
        )
        .await
        .expect("queued message resolves");
    assert!(response.success);
    assert_eq!(response.message, "echo: hello there");

    // The terminal update lands after the handle resolves, so pull all
    // three from the channel rather than draining a snapshot.
    let mut statuses = Vec::new();
    for _ in 0..3 {
        let update = rx.recv().await.expect("update stream open");
        assert_eq!(update.correlation_id.as_deref(), Some("corr-1"));
        statuses.push((update.status, update.position));
    }
    assert_eq!(
        statuses,
        vec![
            (MessageQueueStatus::Queued, Some(0)),
            (MessageQueueStatus::Processing, Some(0)),
            (MessageQueueStatus::Completed, None),
        ]
    );
}

#[tokio::test]
async fn state_updates_fan_out_to_broadcast_subscribers() {
    let h = harness(&EngineSettings::default());
    let campaign_id = CampaignId::new("camp-1");
    let mut snapshots = h.broadcaster.subscribe(&campaign_id);
    let mut events = h.state.subscribe();

    h.orchestrator
        .enqueue_campaign_message(request("a storm rolls in"))
        .await
        .expect("queued message resolves");

    let snapshot = snapshots.recv().await.expect("broadcast snapshot arrives");
    assert_eq!(snapshot["campaign"]["id"], "camp-1");

    let event = events.recv().await.expect("state event arrives");
    assert_eq!(event.campaign_id, campaign_id);
    assert_eq!(event.state.version, 1);
}

#[tokio::test]
async fn processed_messages_accumulate_narrative_and_persist() {
    let h = harness(&EngineSettings::default());
    let campaign_id = CampaignId::new("camp-1");

    for line in ["first", "second", "third"] {
        h.orchestrator
            .enqueue_campaign_message(request(line))
            .await
            .expect("queued message resolves");
    }

    let state = h.state.get_state(&campaign_id).await.expect("state loads");
    assert_eq!(state.version, 3);
    assert_eq!(state.recent_narrative.len(), 3);
    assert_eq!(state.recent_narrative[2].text, "echo: third");

    let stored = h
        .store
        .get_game_state(campaign_id)
        .await
        .expect("store read succeeds")
        .expect("state was persisted");
    assert_eq!(stored.version, 3);
}

#[tokio::test]
async fn settings_seed_the_global_model_and_narrative_capacity() {
    let settings = EngineSettings {
        default_model: Some("story-large".into()),
        narrative_capacity: 2,
        broadcast_capacity: 8,
    };
    let h = harness(&settings);

    for line in ["one", "two", "three"] {
        h.orchestrator
            .enqueue_campaign_message(request(line))
            .await
            .expect("queued message resolves");
    }

    let models = h.agent.seen_models.lock().await.clone();
    assert!(models.iter().all(|m| m.as_deref() == Some("story-large")));

    let state = h
        .state
        .get_state(&CampaignId::new("camp-1"))
        .await
        .expect("state loads");
    assert_eq!(state.recent_narrative.len(), 2);
    assert_eq!(state.recent_narrative[0].text, "echo: two");
}

#[tokio::test]
async fn seeded_campaign_data_reaches_the_priority_path() {
    let h = harness(&EngineSettings::default());
    let campaign_id = CampaignId::new("camp-1");

    let mut campaign = Campaign::new(campaign_id.clone(), "The Sunken Vale", PlayerId::new("p1"));
    campaign.add_character(CharacterId::new("ch-hero"));
    campaign.current_turn_character_id = Some(CharacterId::new("ch-hero"));
    h.store.seed_campaign(campaign).await;
    h.store
        .seed_character(Character::new(
            CharacterId::new("ch-hero"),
            campaign_id.clone(),
            "Brant",
        ))
        .await;

    let response = h
        .orchestrator
        .enqueue_campaign_message(
            request("I act").with_character(CharacterId::new("CH-HERO")),
        )
        .await
        .expect("queued message resolves");
    assert!(response.success);

    let state = h.state.get_state(&campaign_id).await.expect("state loads");
    assert_eq!(state.campaign.name, "The Sunken Vale");
    assert!(state.has_character(&CharacterId::new("ch-hero")));
}
