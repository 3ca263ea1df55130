// Review API collaborator seam
//
// The controller only talks to the backend through BaseReviewApi so that tests
// can inject a scripted implementation (see crate::testing).

use std::sync::Arc;

use async_trait::async_trait;
use review_api_client::{
    CandidateMatch, DecisionAck, DecisionRequest, MatchDetail, PairKey, PendingQuery,
    ReviewApiClient,
};

use crate::error::Result;

#[async_trait]
pub trait BaseReviewApi: Send + Sync {
    /// Fetch the pending queue snapshot in canonical order
    async fn list_pending(&self, query: PendingQuery) -> Result<Vec<CandidateMatch>>;

    /// Fetch full detail for one candidate pair
    async fn match_detail(&self, key: PairKey) -> Result<MatchDetail>;

    /// Record a decision (single attempt)
    async fn submit_decision(&self, key: PairKey, request: &DecisionRequest)
        -> Result<DecisionAck>;
}

// =============================================================================
// ReviewApiClient Adapter (implements BaseReviewApi trait)
// =============================================================================

/// Wrapper around ReviewApiClient that implements BaseReviewApi
pub struct ReviewApiAdapter(pub Arc<ReviewApiClient>);

impl ReviewApiAdapter {
    pub fn new(client: Arc<ReviewApiClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseReviewApi for ReviewApiAdapter {
    async fn list_pending(&self, query: PendingQuery) -> Result<Vec<CandidateMatch>> {
        Ok(self.0.list_pending(query).await?)
    }

    async fn match_detail(&self, key: PairKey) -> Result<MatchDetail> {
        Ok(self.0.match_detail(key).await?)
    }

    async fn submit_decision(
        &self,
        key: PairKey,
        request: &DecisionRequest,
    ) -> Result<DecisionAck> {
        Ok(self.0.decide(key, request).await?)
    }
}
