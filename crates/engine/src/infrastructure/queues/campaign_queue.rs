//! Per-campaign priority message queue.
//!
//! One instance exists per campaign id, created lazily on first enqueue and
//! never torn down. Items are drained by at most one worker task, which is
//! the mechanism behind the at-most-one-concurrent-processing guarantee;
//! unrelated campaigns run fully in parallel because each owns its own
//! queue and worker.
//!
//! Ordering is (priority descending, sequence ascending): higher priority
//! always goes first, and equal priorities drain in strict arrival order,
//! so nothing is starved while the queue drains.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use async_trait::async_trait;
use loreweaver_domain::CampaignId;
use tokio::sync::{oneshot, Mutex};

use crate::application::dto::{
    AgentResponse, MessageQueueStatus, MessageQueueUpdate, PlayerMessageRequest, StatusCallback,
};
use crate::error::OrchestratorError;

/// Resolution delivered through a message's completion handle.
pub type MessageResult = Result<AgentResponse, OrchestratorError>;

/// Processes one dequeued message at a time, on the campaign's worker task.
#[async_trait]
pub trait MessageProcessor: Send + Sync {
    async fn process(&self, request: PlayerMessageRequest) -> MessageResult;
}

struct QueuedMessage {
    request: PlayerMessageRequest,
    priority: i32,
    sequence: u64,
    done: oneshot::Sender<MessageResult>,
}

impl PartialEq for QueuedMessage {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl Eq for QueuedMessage {}

impl PartialOrd for QueuedMessage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedMessage {
    // Max-heap on priority; among equals the lower sequence wins.
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

struct QueueInner {
    heap: BinaryHeap<QueuedMessage>,
    next_sequence: u64,
    worker_active: bool,
}

pub struct CampaignMessageQueue {
    campaign_id: CampaignId,
    inner: Arc<Mutex<QueueInner>>,
    processor: Arc<dyn MessageProcessor>,
}

impl CampaignMessageQueue {
    pub fn new(campaign_id: CampaignId, processor: Arc<dyn MessageProcessor>) -> Self {
        Self {
            campaign_id,
            inner: Arc::new(Mutex::new(QueueInner {
                heap: BinaryHeap::new(),
                next_sequence: 0,
                worker_active: false,
            })),
            processor,
        }
    }

    /// Insert a message and return the handle its outcome resolves through.
    ///
    /// Emits a `Queued` update carrying a 0-based position snapshot: one
    /// slot for the worker if it is already busy, plus everything ahead in
    /// the heap. The snapshot is not re-validated as items drain.
    pub async fn enqueue(
        &self,
        request: PlayerMessageRequest,
        priority: i32,
    ) -> oneshot::Receiver<MessageResult> {
        let (done, handle) = oneshot::channel();
        let callback = request.status_callback.clone();
        let correlation_id = request.correlation_id.clone();

        let (position, spawn_worker) = {
            let mut inner = self.inner.lock().await;
            let sequence = inner.next_sequence;
            inner.next_sequence += 1;
            inner.heap.push(QueuedMessage {
                request,
                priority,
                sequence,
                done,
            });
            let position = usize::from(inner.worker_active) + inner.heap.len() - 1;
            let spawn_worker = !inner.worker_active;
            if spawn_worker {
                inner.worker_active = true;
            }
            (position, spawn_worker)
        };

        tracing::debug!(
            campaign_id = %self.campaign_id,
            priority,
            position,
            "message queued"
        );
        Self::notify(
            callback.as_ref(),
            MessageQueueUpdate::new(correlation_id, MessageQueueStatus::Queued)
                .at_position(position),
        )
        .await;

        if spawn_worker {
            let campaign_id = self.campaign_id.clone();
            let inner = Arc::clone(&self.inner);
            let processor = Arc::clone(&self.processor);
            tokio::spawn(async move {
                Self::drain(campaign_id, inner, processor).await;
            });
        }

        handle
    }

    /// Number of messages waiting, excluding the one being processed.
    pub async fn depth(&self) -> usize {
        self.inner.lock().await.heap.len()
    }

    /// Worker loop: runs until the heap is empty, then exits. A failing
    /// item resolves its own handle with the error and never stops the
    /// loop.
    async fn drain(
        campaign_id: CampaignId,
        inner: Arc<Mutex<QueueInner>>,
        processor: Arc<dyn MessageProcessor>,
    ) {
        loop {
            let item = {
                let mut guard = inner.lock().await;
                match guard.heap.pop() {
                    Some(item) => item,
                    None => {
                        guard.worker_active = false;
                        return;
                    }
                }
            };

            let callback = item.request.status_callback.clone();
            let correlation_id = item.request.correlation_id.clone();
            Self::notify(
                callback.as_ref(),
                MessageQueueUpdate::new(correlation_id.clone(), MessageQueueStatus::Processing)
                    .at_position(0),
            )
            .await;

            let result = processor.process(item.request).await;
            let terminal = match &result {
                Ok(_) => MessageQueueUpdate::new(
                    correlation_id.clone(),
                    MessageQueueStatus::Completed,
                ),
                Err(error) => {
                    tracing::warn!(campaign_id = %campaign_id, %error, "queued message failed");
                    MessageQueueUpdate::new(correlation_id.clone(), MessageQueueStatus::Failed)
                        .with_note(error.to_string())
                }
            };

            // Resolve the handle before announcing the terminal status, so a
            // caller woken by the callback always observes the result.
            if item.done.send(result).is_err() {
                tracing::debug!(
                    campaign_id = %campaign_id,
                    "completion handle dropped by caller"
                );
            }
            Self::notify(callback.as_ref(), terminal).await;
        }
    }

    async fn notify(callback: Option<&StatusCallback>, update: MessageQueueUpdate) {
        let Some(callback) = callback else {
            return;
        };
        let status = update.status;
        if let Err(error) = callback(update).await {
            tracing::warn!(?status, %error, "status callback failed");
        }
    }
}
