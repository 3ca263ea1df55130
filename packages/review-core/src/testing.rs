// Test doubles for the review API seam
//
// MockReviewApi scripts responses, records every call, and can hold calls in
// flight until the test releases them. Holding is what makes out-of-order
// completion and the single-flight decision lock testable.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use review_api_client::{
    AuthorProfile, CandidateMatch, DecisionAck, DecisionRequest, MatchDetail, MatchScores,
    PairKey, PendingQuery,
};
use tokio::sync::Semaphore;

use crate::api::BaseReviewApi;
use crate::error::{Result, ReviewError};

/// Build a queue entry with default names.
pub fn candidate(id_a: i64, id_b: i64, score: f64) -> CandidateMatch {
    CandidateMatch {
        author_id_a: id_a,
        author_id_b: id_b,
        score,
        name_a: format!("Author {}", id_a),
        name_b: format!("Author {}", id_b),
        shared_coauthor_count: None,
        has_path: false,
    }
}

/// Build a detail payload consistent with a queue entry.
pub fn detail_for(m: &CandidateMatch) -> MatchDetail {
    MatchDetail {
        author_a: profile(m.author_id_a, &m.name_a),
        author_b: profile(m.author_id_b, &m.name_b),
        scores: MatchScores {
            total: m.score,
            name_sim: 0.0,
            coauthor: 0.0,
        },
        evidence: Vec::new(),
    }
}

fn profile(id: i64, name: &str) -> AuthorProfile {
    AuthorProfile {
        id,
        name: name.to_string(),
        given_name: None,
        family_name: None,
        affiliation: None,
        orcid: None,
        master_id: None,
        publications: Vec::new(),
    }
}

// =============================================================================
// Mock Review API
// =============================================================================

#[derive(Default)]
struct MockState {
    pending: Vec<CandidateMatch>,
    details: HashMap<PairKey, MatchDetail>,
    list_failures: VecDeque<ReviewError>,
    detail_failures: VecDeque<ReviewError>,
    decision_failures: VecDeque<ReviewError>,
    detail_gates: HashMap<PairKey, Arc<Semaphore>>,
    decision_gate: Option<Arc<Semaphore>>,
    list_calls: usize,
    detail_calls: Vec<PairKey>,
    decision_calls: Vec<(PairKey, DecisionRequest)>,
}

pub struct MockReviewApi {
    state: Mutex<MockState>,
}

impl Default for MockReviewApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockReviewApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
        }
    }

    /// Pending list returned by every `list_pending` call
    pub fn with_pending(self, pending: Vec<CandidateMatch>) -> Self {
        self.set_pending(pending);
        self
    }

    /// Replace the pending list for subsequent calls
    pub fn set_pending(&self, pending: Vec<CandidateMatch>) {
        self.state.lock().unwrap().pending = pending;
    }

    /// Serve `detail` for its `(author_a.id, author_b.id)` pair
    pub fn with_detail(self, detail: MatchDetail) -> Self {
        self.set_detail(detail);
        self
    }

    pub fn set_detail(&self, detail: MatchDetail) {
        let key = PairKey::new(detail.author_a.id, detail.author_b.id);
        self.state.lock().unwrap().details.insert(key, detail);
    }

    pub fn fail_next_list(&self, error: ReviewError) {
        self.state.lock().unwrap().list_failures.push_back(error);
    }

    pub fn fail_next_detail(&self, error: ReviewError) {
        self.state.lock().unwrap().detail_failures.push_back(error);
    }

    pub fn fail_next_decision(&self, error: ReviewError) {
        self.state.lock().unwrap().decision_failures.push_back(error);
    }

    /// Block detail fetches for `key` until [`release_detail`](Self::release_detail)
    pub fn hold_detail(&self, key: PairKey) {
        self.state
            .lock()
            .unwrap()
            .detail_gates
            .insert(key, Arc::new(Semaphore::new(0)));
    }

    pub fn release_detail(&self, key: PairKey) {
        if let Some(gate) = self.state.lock().unwrap().detail_gates.get(&key) {
            gate.add_permits(1);
        }
    }

    /// Stop holding new fetches for `key`. Fetches already waiting stay held
    /// on the returned gate.
    pub fn detach_detail_gate(&self, key: PairKey) -> Option<Arc<Semaphore>> {
        self.state.lock().unwrap().detail_gates.remove(&key)
    }

    /// Block decision submissions until [`release_decision`](Self::release_decision)
    pub fn hold_decisions(&self) {
        self.state.lock().unwrap().decision_gate = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_decision(&self) {
        if let Some(gate) = &self.state.lock().unwrap().decision_gate {
            gate.add_permits(1);
        }
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn detail_calls(&self) -> Vec<PairKey> {
        self.state.lock().unwrap().detail_calls.clone()
    }

    pub fn decision_calls(&self) -> Vec<(PairKey, DecisionRequest)> {
        self.state.lock().unwrap().decision_calls.clone()
    }

    /// Calls of any kind reaching the backend
    pub fn total_calls(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.list_calls + state.detail_calls.len() + state.decision_calls.len()
    }

    /// Yield until at least `n` detail fetches have started
    pub async fn wait_for_detail_calls(&self, n: usize) {
        while self.state.lock().unwrap().detail_calls.len() < n {
            tokio::task::yield_now().await;
        }
    }

    /// Yield until at least `n` decision submissions have started
    pub async fn wait_for_decision_calls(&self, n: usize) {
        while self.state.lock().unwrap().decision_calls.len() < n {
            tokio::task::yield_now().await;
        }
    }
}

async fn pass(gate: Option<Arc<Semaphore>>) {
    if let Some(gate) = gate {
        if let Ok(permit) = gate.acquire().await {
            permit.forget();
        }
    }
}

#[async_trait]
impl BaseReviewApi for MockReviewApi {
    async fn list_pending(&self, _query: PendingQuery) -> Result<Vec<CandidateMatch>> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        match state.list_failures.pop_front() {
            Some(e) => Err(e),
            None => Ok(state.pending.clone()),
        }
    }

    async fn match_detail(&self, key: PairKey) -> Result<MatchDetail> {
        let gate = {
            let mut state = self.state.lock().unwrap();
            state.detail_calls.push(key);
            state.detail_gates.get(&key).cloned()
        };
        pass(gate).await;

        let mut state = self.state.lock().unwrap();
        if let Some(e) = state.detail_failures.pop_front() {
            return Err(e);
        }
        if let Some(detail) = state.details.get(&key) {
            return Ok(detail.clone());
        }
        let listed = state.pending.iter().find(|m| m.key() == key).cloned();
        Ok(detail_for(
            &listed.unwrap_or_else(|| candidate(key.id_a, key.id_b, 0.0)),
        ))
    }

    async fn submit_decision(
        &self,
        key: PairKey,
        request: &DecisionRequest,
    ) -> Result<DecisionAck> {
        let gate = {
            let mut state = self.state.lock().unwrap();
            state.decision_calls.push((key, request.clone()));
            state.decision_gate.clone()
        };
        pass(gate).await;

        let mut state = self.state.lock().unwrap();
        if let Some(e) = state.decision_failures.pop_front() {
            return Err(e);
        }
        let status = match request.decision {
            review_api_client::Decision::Approve => "approved",
            review_api_client::Decision::Reject => "rejected",
        };
        Ok(DecisionAck {
            success: true,
            status: Some(status.to_string()),
        })
    }
}
