//! Decision submission boundary.
//!
//! One remote write per call, no retries and no session state. Retry and
//! locking policy belong to the session controller.

use std::sync::Arc;

use review_api_client::{Decision, DecisionAck, DecisionRequest, PairKey};
use tracing::{info, warn};

use crate::api::BaseReviewApi;
use crate::error::Result;

#[derive(Clone)]
pub struct DecisionSubmitter {
    api: Arc<dyn BaseReviewApi>,
}

impl DecisionSubmitter {
    pub fn new(api: Arc<dyn BaseReviewApi>) -> Self {
        Self { api }
    }

    /// Record `decision` for `key`.
    ///
    /// The golden-record name is only sent with approvals.
    pub async fn submit(
        &self,
        key: PairKey,
        decision: Decision,
        custom_name: Option<String>,
    ) -> Result<DecisionAck> {
        let request = DecisionRequest {
            decision,
            custom_name: match decision {
                Decision::Approve => custom_name,
                Decision::Reject => None,
            },
        };

        match self.api.submit_decision(key, &request).await {
            Ok(ack) => {
                info!(pair = %key, decision = %decision, status = ?ack.status, "Decision submitted");
                Ok(ack)
            }
            Err(e) => {
                warn!(pair = %key, decision = %decision, error = %e, "Decision submission failed");
                Err(e)
            }
        }
    }
}

/// Resolve the merged name sent with an approval.
///
/// A blank or missing operator edit falls back to `default_name` instead of
/// blocking the submission; anything else is trimmed.
pub fn golden_record_name(custom_name: Option<&str>, default_name: &str) -> String {
    match custom_name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => default_name.trim().to_string(),
    }
}
