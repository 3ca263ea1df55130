//! Session state and its read-only snapshot.

use std::collections::HashSet;

use review_api_client::{CandidateMatch, MatchDetail, PairKey};
use tracing::warn;

use crate::error::ReviewError;
use crate::pipeline::ViewOptions;

/// Detail of the selected pair, as far as the session knows it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailState {
    /// Nothing requested for the current selection
    #[default]
    Idle,
    Loading(PairKey),
    Ready(Box<MatchDetail>),
    Failed { key: PairKey, error: ReviewError },
}

impl DetailState {
    pub fn detail(&self) -> Option<&MatchDetail> {
        match self {
            Self::Ready(detail) => Some(detail.as_ref()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }
}

/// Consistent copy of everything a renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub revision: u64,
    /// Canonical order
    pub queue: Vec<CandidateMatch>,
    /// Display order after sort/search/filter
    pub displayed: Vec<CandidateMatch>,
    pub selection: Option<PairKey>,
    pub reviewed_count: u64,
    pub decision_in_flight: bool,
    pub detail: DetailState,
    pub view: ViewOptions,
    /// Last surfaced failure, cleared by the next successful command
    pub last_error: Option<ReviewError>,
}

impl SessionSnapshot {
    pub fn selected(&self) -> Option<&CandidateMatch> {
        let key = self.selection?;
        self.queue.iter().find(|m| m.key() == key)
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Golden-record name offered for the selected pair; empty when nothing
    /// is selected.
    pub fn default_merged_name(&self) -> String {
        self.selection
            .map(|key| merged_name_for(&self.detail, &self.queue, key))
            .unwrap_or_default()
    }
}

/// Name used for the golden record when the operator leaves it blank: the
/// first candidate's full name, preferring the loaded detail.
fn merged_name_for(detail: &DetailState, queue: &[CandidateMatch], key: PairKey) -> String {
    if let Some(detail) = detail.detail() {
        if detail.author_a.id == key.id_a {
            return detail.author_a.name.clone();
        }
    }
    queue
        .iter()
        .find(|m| m.key() == key)
        .map(|m| m.name_a.clone())
        .unwrap_or_default()
}

#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub revision: u64,
    pub queue: Vec<CandidateMatch>,
    pub selection: Option<PairKey>,
    pub reviewed_count: u64,
    pub detail: DetailState,
    /// Number of the latest detail fetch; older fetches are discarded
    pub detail_request: u64,
    pub view: ViewOptions,
    pub last_error: Option<ReviewError>,
}

impl SessionState {
    pub fn snapshot(&self, decision_in_flight: bool) -> SessionSnapshot {
        SessionSnapshot {
            revision: self.revision,
            queue: self.queue.clone(),
            displayed: self.view.apply(&self.queue),
            selection: self.selection,
            reviewed_count: self.reviewed_count,
            decision_in_flight,
            detail: self.detail.clone(),
            view: self.view.clone(),
            last_error: self.last_error.clone(),
        }
    }

    /// Bump and return the revision.
    pub fn touch(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }

    pub fn contains(&self, key: PairKey) -> bool {
        self.queue.iter().any(|m| m.key() == key)
    }

    pub fn find(&self, key: PairKey) -> Option<&CandidateMatch> {
        self.queue.iter().find(|m| m.key() == key)
    }

    /// Mark `key`'s detail as loading. Returns the request number a fetched
    /// payload must carry to be applied.
    pub fn begin_detail(&mut self, key: PairKey) -> u64 {
        self.detail_request += 1;
        self.detail = DetailState::Loading(key);
        self.detail_request
    }

    /// Whether a fetch started as `request` for `key` is still the one wanted.
    pub fn wants_detail(&self, key: PairKey, request: u64) -> bool {
        self.selection == Some(key) && self.detail_request == request
    }

    pub fn default_merged_name(&self, key: PairKey) -> String {
        merged_name_for(&self.detail, &self.queue, key)
    }

    /// Replace the queue wholesale, dropping repeated identities.
    ///
    /// Keeps the selection if it survived, otherwise selects the new head.
    /// Returns true when the selection changed.
    pub fn replace_queue(&mut self, fresh: Vec<CandidateMatch>) -> bool {
        let mut seen = HashSet::with_capacity(fresh.len());
        let mut queue = Vec::with_capacity(fresh.len());
        for m in fresh {
            if seen.insert(m.key()) {
                queue.push(m);
            } else {
                warn!(pair = %m.key(), "Dropping duplicate candidate match from pending list");
            }
        }
        self.queue = queue;

        match self.selection {
            Some(key) if self.contains(key) => false,
            _ => self.select_head(),
        }
    }

    /// Point the selection at the queue head (or nothing) and forget the detail.
    /// Returns true when the selection changed.
    pub fn select_head(&mut self) -> bool {
        let head = self.queue.first().map(CandidateMatch::key);
        self.set_selection(head)
    }

    /// Returns true when the selection changed.
    pub fn set_selection(&mut self, selection: Option<PairKey>) -> bool {
        let changed = self.selection != selection;
        self.selection = selection;
        if changed {
            self.detail = DetailState::Idle;
        }
        changed
    }

    /// Remove `key` from the queue. Returns whether it was present.
    pub fn remove(&mut self, key: PairKey) -> bool {
        let before = self.queue.len();
        self.queue.retain(|m| m.key() != key);
        self.queue.len() != before
    }

    /// Move `key` to the tail keeping everything else in order.
    pub fn move_to_tail(&mut self, key: PairKey) -> bool {
        match self.queue.iter().position(|m| m.key() == key) {
            Some(idx) => {
                let entry = self.queue.remove(idx);
                self.queue.push(entry);
                true
            }
            None => false,
        }
    }
}
