//! Pure REST client for the duplicate-author review API.
//!
//! A minimal client for the three endpoints a review session needs: listing
//! pending candidate matches, fetching one match in detail, and recording a
//! decision. No session logic lives here.
//!
//! # Example
//!
//! ```rust,ignore
//! use review_api_client::{ReviewApiClient, PendingQuery, Decision, DecisionRequest};
//!
//! let client = ReviewApiClient::from_env()?;
//!
//! let pending = client.list_pending(PendingQuery::default()).await?;
//! if let Some(first) = pending.first() {
//!     let detail = client.match_detail(first.key()).await?;
//!     println!("{} vs {}", detail.author_a.name, detail.author_b.name);
//!
//!     client
//!         .decide(first.key(), &DecisionRequest { decision: Decision::Reject, custom_name: None })
//!         .await?;
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{Result, ReviewApiError};
pub use types::*;

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`ReviewApiClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    /// Per-request timeout. Expiry is reported as [`ReviewApiError::Network`].
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Review API client.
#[derive(Clone)]
pub struct ReviewApiClient {
    http_client: Client,
    base_url: String,
}

impl ReviewApiClient {
    /// Create a client with the given options.
    pub fn new(options: ClientOptions) -> Result<Self> {
        let base_url = options.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ReviewApiError::Config("base URL is empty".into()));
        }
        let http_client = Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| ReviewApiError::Config(e.to_string()))?;
        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Create from environment variable `REVIEW_API_URL`, falling back to the
    /// local development server.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("REVIEW_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(ClientOptions {
            base_url,
            ..Default::default()
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of pending candidate matches, in server order.
    pub async fn list_pending(&self, query: PendingQuery) -> Result<Vec<CandidateMatch>> {
        let url = format!("{}/matches/pending", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(network_error)?;

        let matches: Vec<CandidateMatch> = parse_json(response).await?;
        debug!(count = matches.len(), limit = query.limit, offset = query.offset, "Fetched pending matches");
        Ok(matches)
    }

    /// Fetch the full detail of one candidate match.
    pub async fn match_detail(&self, key: PairKey) -> Result<MatchDetail> {
        let url = format!("{}/match/{}/{}", self.base_url, key.id_a, key.id_b);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(network_error)?;

        let detail: MatchDetail = parse_json(response).await?;
        debug!(pair = %key, evidence = detail.evidence.len(), "Fetched match detail");
        Ok(detail)
    }

    /// Record an approve/reject decision. Single attempt, never retried.
    pub async fn decide(&self, key: PairKey, request: &DecisionRequest) -> Result<DecisionAck> {
        let url = format!("{}/match/{}/{}/decide", self.base_url, key.id_a, key.id_b);
        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(network_error)?;

        let ack: DecisionAck = parse_json(response).await?;
        debug!(pair = %key, decision = %request.decision, status = ?ack.status, "Decision recorded");
        Ok(ack)
    }
}

fn network_error(e: reqwest::Error) -> ReviewApiError {
    warn!(error = %e, timeout = e.is_timeout(), "Review API request failed");
    ReviewApiError::Network(e.to_string())
}

/// Turn a response into `T`, mapping non-2xx statuses to [`ReviewApiError::Api`].
async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body);
        warn!(status = %status, error = %message, "Review API error");
        return Err(ReviewApiError::Api {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|e| ReviewApiError::Parse(e.to_string()))
}

/// Prefer the `{"error": "..."}` message when the server sends one.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string())
}
