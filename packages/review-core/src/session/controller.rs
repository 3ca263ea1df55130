//! Review session controller.
//!
//! Owns the canonical queue, the selection, the reviewed count and the
//! single-flight decision lock. Every command takes `&self`, so one
//! controller can be shared (`Arc`) between an input loop and background
//! tasks while the API calls it makes complete in any order.
//!
//! # Key Invariants
//!
//! 1. **Selection is valid** - it names a queue entry or is `None`
//! 2. **Ack before mutation** - a decision changes the queue only after the
//!    server acknowledged it; failures leave queue and selection untouched
//! 3. **Single flight** - at most one decision submission is outstanding
//! 4. **No stale detail** - a detail payload is applied only if its pair is
//!    still selected when it arrives and no newer fetch has been started
//! 5. **Atomic reload** - a fetched queue replaces the old one in a single
//!    critical section
//!
//! The state mutex is never held across an API call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use review_api_client::{CandidateMatch, Decision, DecisionAck, PairKey, PendingQuery};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use super::command::{Direction, SessionCommand};
use super::events::{SessionEvent, SessionEvents};
use super::state::{DetailState, SessionSnapshot, SessionState};
use crate::api::BaseReviewApi;
use crate::error::{Result, ReviewError};
use crate::pipeline::{SortKey, ViewOptions};
use crate::submitter::{golden_record_name, DecisionSubmitter};

pub struct SessionController {
    api: Arc<dyn BaseReviewApi>,
    submitter: DecisionSubmitter,
    query: PendingQuery,
    state: Mutex<SessionState>,
    decision_in_flight: AtomicBool,
    events: SessionEvents,
}

/// Holds the single-flight lock; releases it when dropped, including when the
/// owning `decide` future is cancelled.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SessionController {
    pub fn new(api: Arc<dyn BaseReviewApi>, query: PendingQuery) -> Self {
        Self {
            submitter: DecisionSubmitter::new(api.clone()),
            api,
            query,
            state: Mutex::new(SessionState::default()),
            decision_in_flight: AtomicBool::new(false),
            events: SessionEvents::new(),
        }
    }

    /// Start with the given sort/search/filter options.
    pub fn with_view(mut self, view: ViewOptions) -> Self {
        self.state.get_mut().view = view;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        state.snapshot(self.decision_in_flight.load(Ordering::Acquire))
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Replace the queue with a fresh snapshot from the API.
    ///
    /// The selection survives if its pair is still pending, otherwise the new
    /// head is selected. On failure the previous queue is kept.
    pub async fn load_queue(&self) -> Result<()> {
        info!(limit = self.query.limit, offset = self.query.offset, "Loading pending queue");
        let fetched = self.api.list_pending(self.query).await;

        let mut state = self.state.lock().await;
        match fetched {
            Ok(fresh) => {
                let selection_changed = state.replace_queue(fresh);
                state.last_error = None;
                info!(count = state.queue.len(), selection = ?state.selection, "Pending queue loaded");

                let mut events = vec![SessionEvent::QueueLoaded {
                    count: state.queue.len(),
                }];
                if selection_changed {
                    events.push(SessionEvent::SelectionChanged {
                        selection: state.selection,
                    });
                }
                self.publish(&mut state, events);
                Ok(())
            }
            Err(error) => Err(self.fail(&mut state, error)),
        }
    }

    /// Select a queued pair and fetch its detail.
    pub async fn select(&self, id_a: i64, id_b: i64) -> Result<()> {
        let key = PairKey::new(id_a, id_b);
        let request = {
            let mut state = self.state.lock().await;
            if !state.contains(key) {
                debug!(pair = %key, "Select target not in queue");
                return Err(ReviewError::NotFound { key });
            }
            state.set_selection(Some(key));
            let request = state.begin_detail(key);
            self.publish(
                &mut state,
                vec![SessionEvent::SelectionChanged { selection: Some(key) }],
            );
            request
        };
        self.fetch_detail(key, request).await
    }

    /// Fetch detail for whatever is currently selected.
    ///
    /// Selections made by reload, decide and skip do not fetch on their own.
    pub async fn refresh_detail(&self) -> Result<()> {
        let (key, request) = {
            let mut state = self.state.lock().await;
            let Some(key) = state.selection else {
                return Ok(());
            };
            let request = state.begin_detail(key);
            self.publish(&mut state, Vec::new());
            (key, request)
        };
        self.fetch_detail(key, request).await
    }

    /// Approve or reject the selected pair.
    ///
    /// Returns `Ok(None)` without contacting the server when nothing is
    /// selected or another decision is still in flight. On failure the queue
    /// and selection are unchanged, so the call can simply be repeated.
    pub async fn decide(
        &self,
        decision: Decision,
        custom_name: Option<String>,
    ) -> Result<Option<DecisionAck>> {
        let (key, custom_name, flight) = match self.begin_decision(decision, custom_name).await {
            Ok(Some(started)) => started,
            Ok(None) => return Ok(None),
            Err(ReviewError::ConcurrentSubmission) => return Ok(None),
            Err(e) => return Err(e),
        };

        let outcome = self.submitter.submit(key, decision, custom_name).await;

        let mut state = self.state.lock().await;
        drop(flight);
        match outcome {
            Ok(ack) => {
                state.remove(key);
                state.reviewed_count += 1;
                let selection_changed = state.select_head();
                state.last_error = None;
                info!(
                    pair = %key,
                    decision = %decision,
                    reviewed = state.reviewed_count,
                    remaining = state.queue.len(),
                    "Decision recorded"
                );

                let mut events = vec![SessionEvent::DecisionRecorded {
                    key,
                    decision,
                    reviewed_count: state.reviewed_count,
                }];
                if selection_changed {
                    events.push(SessionEvent::SelectionChanged {
                        selection: state.selection,
                    });
                }
                self.publish(&mut state, events);
                Ok(Some(ack))
            }
            Err(error) => Err(self.fail(&mut state, error)),
        }
    }

    /// Send the selected pair to the back of the queue and select the head.
    ///
    /// Does nothing when one or no entries are pending. Never calls the API.
    /// Returns whether anything moved.
    pub async fn skip(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.queue.len() <= 1 {
            debug!(pending = state.queue.len(), "Nothing to skip to");
            return false;
        }
        let Some(key) = state.selection else {
            return false;
        };
        if !state.move_to_tail(key) {
            return false;
        }
        let selection_changed = state.select_head();
        info!(pair = %key, next = ?state.selection, "Skipped candidate match");

        let mut events = vec![SessionEvent::Skipped { key }];
        if selection_changed {
            events.push(SessionEvent::SelectionChanged {
                selection: state.selection,
            });
        }
        self.publish(&mut state, events);
        true
    }

    /// Move the selection one step through the displayed sequence.
    pub async fn navigate(&self, direction: Direction) -> Result<()> {
        let target = {
            let state = self.state.lock().await;
            let displayed = state.view.apply(&state.queue);
            if displayed.is_empty() {
                return Ok(());
            }
            let last = displayed.len() - 1;
            let current = state
                .selection
                .and_then(|key| displayed.iter().position(|m| m.key() == key));
            let idx = match (current, direction) {
                (Some(i), Direction::Up) => i.saturating_sub(1),
                (Some(i), Direction::Down) => (i + 1).min(last),
                (None, Direction::Up) => last,
                (None, Direction::Down) => 0,
            };
            if current == Some(idx) {
                return Ok(());
            }
            displayed[idx].key()
        };
        self.select(target.id_a, target.id_b).await
    }

    pub async fn set_sort(&self, sort: SortKey) {
        let mut state = self.state.lock().await;
        state.view.sort = sort;
        self.publish(&mut state, Vec::new());
    }

    pub async fn set_search(&self, search: impl Into<String>) {
        let mut state = self.state.lock().await;
        state.view.search = search.into();
        self.publish(&mut state, Vec::new());
    }

    pub async fn set_connected_only(&self, connected_only: bool) {
        let mut state = self.state.lock().await;
        state.view.connected_only = connected_only;
        self.publish(&mut state, Vec::new());
    }

    /// Displayed projection of the current queue.
    pub async fn displayed(&self) -> Vec<CandidateMatch> {
        let state = self.state.lock().await;
        state.view.apply(&state.queue)
    }

    /// Run one operator command.
    pub async fn dispatch(&self, command: SessionCommand) -> Result<()> {
        debug!(command = ?command, "Dispatching session command");
        match command {
            SessionCommand::Approve { custom_name } => {
                self.decide(Decision::Approve, custom_name).await.map(|_| ())
            }
            SessionCommand::Reject => self.decide(Decision::Reject, None).await.map(|_| ()),
            SessionCommand::Skip => {
                self.skip().await;
                Ok(())
            }
            SessionCommand::Navigate(direction) => self.navigate(direction).await,
            SessionCommand::Select(key) => self.select(key.id_a, key.id_b).await,
            SessionCommand::Reload => self.load_queue().await,
            SessionCommand::RefreshDetail => self.refresh_detail().await,
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Take the single-flight lock and resolve what will be sent.
    async fn begin_decision(
        &self,
        decision: Decision,
        custom_name: Option<String>,
    ) -> Result<Option<(PairKey, Option<String>, InFlight<'_>)>> {
        let mut state = self.state.lock().await;
        let Some(key) = state.selection else {
            debug!(decision = %decision, "No selection, ignoring decision");
            return Ok(None);
        };

        if self
            .decision_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(pair = %key, "Decision already in flight, ignoring");
            return Err(ReviewError::ConcurrentSubmission);
        }
        let flight = InFlight(&self.decision_in_flight);

        let custom_name = match decision {
            Decision::Approve => {
                let default_name = state.default_merged_name(key);
                Some(golden_record_name(custom_name.as_deref(), &default_name))
            }
            Decision::Reject => None,
        };
        info!(pair = %key, decision = %decision, "Submitting decision");
        self.publish(&mut state, Vec::new());
        Ok(Some((key, custom_name, flight)))
    }

    async fn fetch_detail(&self, key: PairKey, request: u64) -> Result<()> {
        let fetched = self.api.match_detail(key).await;

        let mut state = self.state.lock().await;
        if !state.wants_detail(key, request) {
            debug!(
                pair = %key,
                request,
                latest = state.detail_request,
                selection = ?state.selection,
                "Discarding superseded detail"
            );
            self.events.emit(SessionEvent::DetailDiscarded { key });
            return Ok(());
        }

        match fetched {
            Ok(detail) => {
                state.detail = DetailState::Ready(Box::new(detail));
                state.last_error = None;
                self.publish(&mut state, vec![SessionEvent::DetailLoaded { key }]);
                Ok(())
            }
            Err(error) => {
                state.detail = DetailState::Failed {
                    key,
                    error: error.clone(),
                };
                Err(self.fail(&mut state, error))
            }
        }
    }

    /// Bump the revision and notify subscribers.
    fn publish(&self, state: &mut SessionState, events: Vec<SessionEvent>) {
        let revision = state.touch();
        for event in events {
            self.events.emit(event);
        }
        self.events.emit(SessionEvent::StateChanged { revision });
    }

    fn fail(&self, state: &mut SessionState, error: ReviewError) -> ReviewError {
        warn!(error = %error, retryable = error.is_retryable(), "Review session command failed");
        state.last_error = Some(error.clone());
        self.publish(state, vec![SessionEvent::Failed { error: error.clone() }]);
        error
    }
}
