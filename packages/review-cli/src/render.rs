//! Text rendering of the session: status bar, queue, match card and help

use console::style;

use review_api_client::{CandidateMatch, Publication};
use review_core::graph::{ANCHOR_A, ANCHOR_B};
use review_core::{
    ConfidenceBand, DetailState, DiffKind, DiffToken, Direction, InputAction, KeyMap, MatchView,
    SessionCommand, SessionSnapshot,
};

/// Rows of the queue shown around the selection
pub const QUEUE_WINDOW: usize = 10;

/// One-line summary of the session (e.g., "12 pending · 3 reviewed · score-desc")
pub fn format_status_bar(snapshot: &SessionSnapshot) -> String {
    let mut parts = vec![
        format!("{} pending", snapshot.pending_count()),
        format!("{} reviewed", snapshot.reviewed_count),
        format!("sort: {}", snapshot.view.sort),
    ];
    if !snapshot.view.search.is_empty() {
        parts.push(format!("search: '{}'", snapshot.view.search));
    }
    if snapshot.view.connected_only {
        parts.push("connected only".to_string());
    }
    if snapshot.displayed.len() != snapshot.queue.len() {
        parts.push(format!("{} shown", snapshot.displayed.len()));
    }
    if snapshot.decision_in_flight {
        parts.push(style("submitting…").yellow().to_string());
    }
    parts.join(" · ")
}

/// Displayed queue rows, windowed around the selection.
pub fn format_queue(snapshot: &SessionSnapshot, window: usize) -> Vec<String> {
    let displayed = &snapshot.displayed;
    if displayed.is_empty() {
        return vec![style("  (no matches)").dim().to_string()];
    }

    let selected = snapshot
        .selection
        .and_then(|key| displayed.iter().position(|m| m.key() == key));
    let start = selected
        .map(|i| i.saturating_sub(window / 2))
        .unwrap_or(0)
        .min(displayed.len().saturating_sub(window));

    displayed
        .iter()
        .enumerate()
        .skip(start)
        .take(window)
        .map(|(i, m)| format_queue_row(m, Some(i) == selected))
        .collect()
}

fn format_queue_row(m: &CandidateMatch, selected: bool) -> String {
    let marker = if selected { "▸" } else { " " };
    let path = if m.has_path { "⇄" } else { " " };
    let row = format!(
        "{} {:>5.1}  {} {} / {}  ({} shared)",
        marker,
        m.score,
        path,
        m.name_a,
        m.name_b,
        m.shared_coauthors()
    );
    if selected {
        style(row).bold().to_string()
    } else {
        row
    }
}

/// Paint diff tokens: changed in yellow, one-sided in green.
pub fn format_tokens(tokens: &[DiffToken]) -> String {
    tokens
        .iter()
        .map(|t| match t.kind {
            DiffKind::Equal => t.text.clone(),
            DiffKind::Added => style(&t.text).green().to_string(),
            DiffKind::Changed => style(&t.text).yellow().underlined().to_string(),
        })
        .collect()
}

/// Detail section for the selected pair.
pub fn format_detail(snapshot: &SessionSnapshot) -> Vec<String> {
    match &snapshot.detail {
        DetailState::Idle => match snapshot.selected() {
            Some(m) => vec![format!("{} / {}", m.name_a, m.name_b)],
            None => Vec::new(),
        },
        DetailState::Loading(key) => vec![style(format!("Loading {}…", key)).dim().to_string()],
        DetailState::Ready(detail) => format_card(&MatchView::build(detail)),
        DetailState::Failed { key, error } => {
            vec![style(format!("Could not load {}: {}", key, error)).red().to_string()]
        }
    }
}

/// Full comparison card: scores, attribute diffs, evidence and publications.
pub fn format_card(view: &MatchView) -> Vec<String> {
    let mut lines = Vec::new();

    let band = match view.confidence {
        ConfidenceBand::High => style(view.confidence.label()).green(),
        ConfidenceBand::Review => style(view.confidence.label()).yellow(),
    };
    lines.push(format!(
        "#{} vs #{}   {}   total {:.1} · name {:.2} · coauthor {:.2}",
        view.id_a, view.id_b, band, view.scores.total, view.scores.name_sim, view.scores.coauthor
    ));
    lines.push(String::new());

    for attr in &view.attributes {
        let flag = if attr.has_disagreement {
            style("≠").red().to_string()
        } else {
            style("=").dim().to_string()
        };
        lines.push(format!("{} {}", flag, style(attr.label).bold()));
        lines.push(format!("    A  {}", format_tokens(&attr.tokens_a)));
        lines.push(format!("    B  {}", format_tokens(&attr.tokens_b)));
    }

    lines.push(String::new());
    lines.extend(format_evidence(view));

    if !view.publications_a.is_empty() || !view.publications_b.is_empty() {
        lines.push(String::new());
        lines.push(style("Recent publications").bold().to_string());
        lines.extend(format_publications("A", &view.publications_a));
        lines.extend(format_publications("B", &view.publications_b));
    }

    lines
}

/// Shared-collaborator summary read off the evidence graph.
pub fn format_evidence(view: &MatchView) -> Vec<String> {
    let graph = &view.graph;
    if !graph.has_evidence() {
        return vec![style("No shared collaborators").dim().to_string()];
    }

    let shared: Vec<_> = graph.shared_nodes().collect();
    let mut lines = vec![style(format!("Shared collaborators ({})", shared.len()))
        .bold()
        .to_string()];
    for node in shared {
        let with_a = graph.weight_between(ANCHOR_A, &node.id).unwrap_or(0);
        let with_b = graph.weight_between(ANCHOR_B, &node.id).unwrap_or(0);
        lines.push(format!("    {}  A×{}  B×{}", node.name, with_a, with_b));
    }
    lines
}

fn format_publications(side: &str, publications: &[Publication]) -> Vec<String> {
    publications
        .iter()
        .map(|p| {
            let year = p.year.map(|y| y.to_string()).unwrap_or_else(|| "----".into());
            let title = p.title.as_deref().unwrap_or("Untitled");
            match &p.venue {
                Some(venue) => format!("    {}  {}  {} ({})", side, year, title, venue),
                None => format!("    {}  {}  {}", side, year, title),
            }
        })
        .collect()
}

/// Key hints built from the active bindings.
pub fn format_help(keys: &KeyMap) -> String {
    let entries = [
        (
            InputAction::Session(SessionCommand::Approve { custom_name: None }),
            "approve",
        ),
        (InputAction::Session(SessionCommand::Reject), "reject"),
        (InputAction::Session(SessionCommand::Skip), "skip"),
        (
            InputAction::Session(SessionCommand::Navigate(Direction::Down)),
            "down",
        ),
        (
            InputAction::Session(SessionCommand::Navigate(Direction::Up)),
            "up",
        ),
        (InputAction::EditSearch, "search"),
        (InputAction::CycleSort, "sort"),
        (InputAction::ToggleConnected, "connected"),
        (InputAction::Quit, "quit"),
    ];

    entries
        .iter()
        .filter_map(|(action, label)| {
            let bound = keys.keys_for(action);
            if bound.is_empty() {
                return None;
            }
            let names: Vec<String> = bound.iter().map(|k| k.to_string()).collect();
            Some(format!("{} {}", style(names.join("/")).cyan(), label))
        })
        .collect::<Vec<_>>()
        .join(" · ")
}

/// Closing line shown when the operator quits.
pub fn format_summary(snapshot: &SessionSnapshot) -> String {
    format!(
        "Reviewed {} match{} this session, {} still pending",
        snapshot.reviewed_count,
        if snapshot.reviewed_count == 1 { "" } else { "es" },
        snapshot.pending_count()
    )
}
