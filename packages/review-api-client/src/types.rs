//! Review API request and response types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Author record identifier as issued by the review API.
pub type AuthorId = i64;

/// Identity of a candidate match: the `(author_id_a, author_id_b)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    pub id_a: AuthorId,
    pub id_b: AuthorId,
}

impl PairKey {
    pub fn new(id_a: AuthorId, id_b: AuthorId) -> Self {
        Self { id_a, id_b }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.id_a, self.id_b)
    }
}

// =============================================================================
// Pending list
// =============================================================================

/// Paging parameters for `GET /matches/pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PendingQuery {
    pub limit: u32,
    pub offset: u32,
}

impl Default for PendingQuery {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

/// A candidate duplicate pair as listed in the pending queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub author_id_a: AuthorId,
    pub author_id_b: AuthorId,
    /// Match score, 0 to 100
    pub score: f64,
    pub name_a: String,
    pub name_b: String,
    /// Number of distinct collaborators shared by both authors (absent on older servers)
    #[serde(default)]
    pub shared_coauthor_count: Option<u32>,
    /// Whether any collaboration path connects the two authors
    #[serde(default)]
    pub has_path: bool,
}

impl CandidateMatch {
    pub fn key(&self) -> PairKey {
        PairKey::new(self.author_id_a, self.author_id_b)
    }

    pub fn shared_coauthors(&self) -> u32 {
        self.shared_coauthor_count.unwrap_or(0)
    }
}

// =============================================================================
// Match detail
// =============================================================================

/// One publication listed on an author profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub year: Option<i32>,
    pub title: Option<String>,
    pub venue: Option<String>,
}

/// Full author record shown on the review card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub id: AuthorId,
    pub name: String,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub affiliation: Option<String>,
    #[serde(default)]
    pub orcid: Option<String>,
    #[serde(default)]
    pub master_id: Option<i64>,
    #[serde(default)]
    pub publications: Vec<Publication>,
}

/// Score breakdown produced by the upstream matcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchScores {
    pub total: f64,
    pub name_sim: f64,
    pub coauthor: f64,
}

/// A collaborator shared by both candidate authors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedCoauthor {
    pub name: String,
    /// Total number of joint publications across both candidates
    #[serde(default)]
    pub total_overlap: Option<u32>,
    #[serde(default)]
    pub count_a: u32,
    #[serde(default)]
    pub count_b: u32,
}

/// Response of `GET /match/{id_a}/{id_b}`.
///
/// Evidence is always the raw shared-collaborator list. A server-built
/// `graph_data` field, if present, is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub author_a: AuthorProfile,
    pub author_b: AuthorProfile,
    pub scores: MatchScores,
    #[serde(default, alias = "shared_coauthors")]
    pub evidence: Vec<SharedCoauthor>,
}

// =============================================================================
// Decisions
// =============================================================================

/// Operator verdict on a candidate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /match/{id_a}/{id_b}/decide`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionRequest {
    pub decision: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
}

/// Acknowledgement returned after a decision is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionAck {
    #[serde(default)]
    pub success: bool,
    /// New match status (`approved` or `rejected`)
    #[serde(default)]
    pub status: Option<String>,
}

/// Error body returned by the API on rejection.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
