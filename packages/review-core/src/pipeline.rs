//! Sort/search/filter projection of the review queue.
//!
//! The projection is read-only: it never reorders or mutates the canonical
//! queue that skip and decide operate on.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use review_api_client::CandidateMatch;
use serde::Serialize;

use crate::error::ReviewError;

/// Ordering applied to the displayed sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SortKey {
    #[default]
    ScoreDesc,
    ScoreAsc,
    NameAsc,
    CoauthorDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScoreDesc => "score-desc",
            Self::ScoreAsc => "score-asc",
            Self::NameAsc => "name-asc",
            Self::CoauthorDesc => "coauthor-desc",
        }
    }

    /// All keys in menu order
    pub fn all() -> &'static [SortKey] {
        &[
            Self::ScoreDesc,
            Self::ScoreAsc,
            Self::NameAsc,
            Self::CoauthorDesc,
        ]
    }

    /// The key after this one, wrapping around
    pub fn next(&self) -> SortKey {
        let all = Self::all();
        let idx = all.iter().position(|k| k == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    fn compare(&self, a: &CandidateMatch, b: &CandidateMatch) -> Ordering {
        match self {
            Self::ScoreDesc => b.score.total_cmp(&a.score),
            Self::ScoreAsc => a.score.total_cmp(&b.score),
            Self::NameAsc => a.name_a.to_lowercase().cmp(&b.name_a.to_lowercase()),
            Self::CoauthorDesc => b.shared_coauthors().cmp(&a.shared_coauthors()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ReviewError::Validation(format!("unknown sort key '{}'", s)))
    }
}

/// Parameters of the displayed projection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewOptions {
    pub sort: SortKey,
    pub search: String,
    pub connected_only: bool,
}

impl ViewOptions {
    pub fn apply(&self, queue: &[CandidateMatch]) -> Vec<CandidateMatch> {
        apply(queue, self.sort, &self.search, self.connected_only)
    }
}

/// Filter then stably sort `queue`.
///
/// An entry is kept when either candidate name contains `search`
/// (case-insensitive) and, if `connected_only`, it has a collaboration path.
/// Entries that compare equal keep their queue order.
pub fn apply(
    queue: &[CandidateMatch],
    sort: SortKey,
    search: &str,
    connected_only: bool,
) -> Vec<CandidateMatch> {
    let needle = search.to_lowercase();

    let mut displayed: Vec<CandidateMatch> = queue
        .iter()
        .filter(|m| matches_search(m, &needle))
        .filter(|m| !connected_only || m.has_path)
        .cloned()
        .collect();

    // Vec::sort_by is stable
    displayed.sort_by(|a, b| sort.compare(a, b));
    displayed
}

fn matches_search(m: &CandidateMatch, needle: &str) -> bool {
    needle.is_empty()
        || m.name_a.to_lowercase().contains(needle)
        || m.name_b.to_lowercase().contains(needle)
}
