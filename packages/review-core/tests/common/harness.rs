//! Session harness for integration tests.
//!
//! Each test gets a fresh scripted API and a controller wired to it. Tests
//! seed the pending list, then drive the controller through its public API.

use std::sync::Arc;

use review_api_client::{CandidateMatch, PairKey, PendingQuery};
use review_core::testing::{candidate, MockReviewApi};
use review_core::{SessionController, SessionSnapshot};
use test_context::AsyncTestContext;

pub struct ReviewHarness {
    pub api: Arc<MockReviewApi>,
    pub session: Arc<SessionController>,
}

impl AsyncTestContext for ReviewHarness {
    async fn setup() -> Self {
        Self::new()
    }

    async fn teardown(self) {
        // Controller and mock are dropped with the harness
    }
}

impl ReviewHarness {
    pub fn new() -> Self {
        let api = Arc::new(MockReviewApi::new());
        let session = Arc::new(SessionController::new(
            api.clone(),
            PendingQuery::default(),
        ));
        Self { api, session }
    }

    /// Seed the pending list and load it into the session.
    pub async fn load(&self, pending: Vec<CandidateMatch>) {
        self.api.set_pending(pending);
        self.session
            .load_queue()
            .await
            .expect("Failed to load pending queue");
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot().await
    }
}

/// Queue entry `(A{n}, B{n})` with the given score.
pub fn pair(n: i64, score: f64) -> CandidateMatch {
    let mut m = candidate(n, 100 + n, score);
    m.name_a = format!("A{}", n);
    m.name_b = format!("B{}", n);
    m
}

pub fn key(n: i64) -> PairKey {
    PairKey::new(n, 100 + n)
}

pub fn queue_keys(snapshot: &SessionSnapshot) -> Vec<PairKey> {
    snapshot.queue.iter().map(|m| m.key()).collect()
}
