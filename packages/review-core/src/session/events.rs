//! Session change notifications.
//!
//! The controller publishes a [`SessionEvent`] after every command that
//! changes state. Renderers subscribe and re-read
//! [`SessionController::snapshot`](super::SessionController::snapshot)
//! instead of polling.
//!
//! # Guarantees
//!
//! - **At-most-once delivery**: Slow receivers may miss events
//!   (`RecvError::Lagged`); the next snapshot is always complete, so a lagged
//!   renderer just redraws.
//! - **In-memory only**: Events are not persisted

use review_api_client::{Decision, PairKey};
use tokio::sync::broadcast;

use crate::error::ReviewError;

/// Default channel capacity for session events.
const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Something observable changed; `revision` increases with every change
    StateChanged { revision: u64 },
    QueueLoaded { count: usize },
    SelectionChanged { selection: Option<PairKey> },
    DetailLoaded { key: PairKey },
    /// A detail payload arrived after its pair stopped being selected
    DetailDiscarded { key: PairKey },
    DecisionRecorded {
        key: PairKey,
        decision: Decision,
        reviewed_count: u64,
    },
    Skipped { key: PairKey },
    /// A boundary failure the operator should see
    Failed { error: ReviewError },
}

/// Broadcast channel for [`SessionEvent`]s.
#[derive(Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEvents {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Returns how many received it.
    pub fn emit(&self, event: SessionEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
