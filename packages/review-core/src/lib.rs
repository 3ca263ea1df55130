//! # Review Core
//!
//! Controller for adjudicating duplicate-author candidate pairs.
//!
//! ## Core Concepts
//!
//! - [`SessionController`] owns the queue, the selection, the reviewed count
//!   and the single-flight decision lock
//! - [`DecisionSubmitter`] performs exactly one remote write per decision
//! - [`diff`] and [`graph`] turn a match detail into comparable tokens and an
//!   evidence graph; [`MatchView`] bundles both for rendering
//! - [`pipeline`] projects the queue into its displayed order without
//!   touching the canonical order
//!
//! ## Architecture
//!
//! ```text
//! Front end (keys) ──► KeyMap ──► SessionCommand
//!                                     │
//!                                     ▼ dispatch()
//!                              SessionController ──► SessionEvent (broadcast)
//!                                     │
//!              ┌──────────────────────┼──────────────────────┐
//!              ▼                      ▼                      ▼
//!      list_pending()         match_detail()        DecisionSubmitter
//!              └──────────────── BaseReviewApi ──────────────┘
//!                                     │
//!                              ReviewApiAdapter ──► review_api_client
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use review_api_client::{Decision, PendingQuery, ReviewApiClient};
//! use review_core::{ReviewApiAdapter, SessionController};
//!
//! let client = Arc::new(ReviewApiClient::from_env()?);
//! let session = SessionController::new(
//!     Arc::new(ReviewApiAdapter::new(client)),
//!     PendingQuery::default(),
//! );
//!
//! session.load_queue().await?;
//! session.refresh_detail().await?;
//! session.decide(Decision::Approve, Some("Jane Smith".into())).await?;
//! ```

pub mod api;
pub mod diff;
pub mod error;
pub mod graph;
pub mod keymap;
pub mod pipeline;
pub mod session;
pub mod submitter;
pub mod view;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api::{BaseReviewApi, ReviewApiAdapter};
pub use diff::{compute_diff, DiffKind, DiffToken};
pub use error::{Result, ReviewError};
pub use graph::{build_graph, EvidenceGraph, GraphLink, GraphNode, NodeGroup};
pub use keymap::{InputAction, Key, KeyMap};
pub use pipeline::{SortKey, ViewOptions};
pub use session::{
    DetailState, Direction, SessionCommand, SessionController, SessionEvent, SessionSnapshot,
};
pub use submitter::{golden_record_name, DecisionSubmitter};
pub use view::{AttributeDiff, ConfidenceBand, MatchView};
