//! Interactive review loop

use anyhow::{Context, Result};
use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::debug;

use review_api_client::Decision;
use review_core::{DetailState, InputAction, Key, SessionCommand, SessionEvent, SessionSnapshot};

use crate::context::AppContext;
use crate::render::{
    format_detail, format_help, format_queue, format_status_bar, format_summary, QUEUE_WINDOW,
};

/// Run the review loop until the operator quits
pub async fn run_review(ctx: &AppContext) -> Result<()> {
    let mut events = ctx.session.subscribe();
    let mut notices: Vec<String> = Vec::new();

    ctx.print_info(&format!("Connecting to {}", ctx.config.api_url));
    report(&mut notices, ctx.session.load_queue().await);

    loop {
        let snapshot = ctx.session.snapshot().await;
        if matches!(snapshot.detail, DetailState::Idle) && snapshot.selection.is_some() {
            report(&mut notices, ctx.session.refresh_detail().await);
        }
        notices.extend(drain_notices(&mut events));

        let snapshot = ctx.session.snapshot().await;
        draw(ctx, &snapshot, &notices)?;
        notices.clear();

        let Some(key) = read_key(ctx).await? else {
            continue;
        };
        let Some(action) = ctx.keys.resolve(key).cloned() else {
            debug!(key = %key, "Unbound key");
            continue;
        };

        match action {
            InputAction::Quit => break,
            InputAction::Session(SessionCommand::Approve { .. }) => {
                if snapshot.selection.is_none() {
                    continue;
                }
                let custom_name = prompt_merged_name(ctx, &snapshot).await?;
                let result = ctx.session.decide(Decision::Approve, custom_name).await;
                report(&mut notices, result.map(|_| ()));
            }
            InputAction::Session(command) => {
                report(&mut notices, ctx.session.dispatch(command).await);
            }
            InputAction::EditSearch => {
                let search = prompt_search(ctx, &snapshot.view.search).await?;
                ctx.session.set_search(search).await;
            }
            InputAction::CycleSort => {
                ctx.session.set_sort(snapshot.view.sort.next()).await;
            }
            InputAction::ToggleConnected => {
                ctx.session
                    .set_connected_only(!snapshot.view.connected_only)
                    .await;
            }
        }
    }

    let snapshot = ctx.session.snapshot().await;
    ctx.print_header("Session complete");
    ctx.print_success(&format_summary(&snapshot));
    Ok(())
}

fn draw(ctx: &AppContext, snapshot: &SessionSnapshot, notices: &[String]) -> Result<()> {
    ctx.clear()?;
    ctx.print_header("Duplicate Author Review");
    println!("{}", format_status_bar(snapshot));
    println!();
    for row in format_queue(snapshot, QUEUE_WINDOW) {
        println!("{}", row);
    }
    println!();
    for line in format_detail(snapshot) {
        println!("{}", line);
    }
    println!();
    for notice in notices {
        println!("{}", notice);
    }
    println!("{}", format_help(&ctx.keys));
    Ok(())
}

/// Surface a command failure as a notice. Silent no-ops are not failures.
fn report(notices: &mut Vec<String>, result: review_core::Result<()>) {
    if let Err(error) = result {
        if !error.is_surfaced() {
            return;
        }
        let hint = if error.is_retryable() {
            " (press the key again to retry)"
        } else {
            ""
        };
        notices.push(style(format!("✗ {}{}", error, hint)).red().to_string());
    }
}

fn drain_notices(events: &mut broadcast::Receiver<SessionEvent>) -> Vec<String> {
    let mut notices = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => notices.extend(describe(&event)),
            Err(TryRecvError::Lagged(missed)) => {
                debug!(missed, "Session event receiver lagged");
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
    notices
}

/// Operator-facing line for an event, if it deserves one.
fn describe(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::QueueLoaded { count } => Some(format!("Loaded {} pending matches", count)),
        SessionEvent::DecisionRecorded { key, decision, .. } => {
            let verb = match decision {
                Decision::Approve => style("Approved").green(),
                Decision::Reject => style("Rejected").red(),
            };
            Some(format!("✓ {} {}", verb, key))
        }
        SessionEvent::Skipped { key } => Some(format!("Skipped {}", key)),
        _ => None,
    }
}

async fn read_key(ctx: &AppContext) -> Result<Option<Key>> {
    let term = ctx.term().clone();
    let key = tokio::task::spawn_blocking(move || term.read_key())
        .await
        .context("Key reader task failed")?
        .context("Failed to read key")?;
    Ok(map_key(key))
}

/// Translate a terminal key into a session key.
pub fn map_key(key: console::Key) -> Option<Key> {
    match key {
        console::Key::Char(c) => Some(Key::Char(c)),
        console::Key::ArrowUp => Some(Key::Up),
        console::Key::ArrowDown => Some(Key::Down),
        console::Key::Enter => Some(Key::Enter),
        console::Key::Escape => Some(Key::Esc),
        _ => None,
    }
}

/// Ask for the merged (golden record) name, pre-filled with the default.
///
/// Returns `None` in quiet mode so the session picks the default itself.
async fn prompt_merged_name(ctx: &AppContext, snapshot: &SessionSnapshot) -> Result<Option<String>> {
    if ctx.quiet {
        return Ok(None);
    }
    let initial = snapshot.default_merged_name();
    let name: String = tokio::task::spawn_blocking(move || {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("Merged name")
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()
    })
    .await
    .context("Prompt task failed")??;
    Ok(Some(name))
}

async fn prompt_search(ctx: &AppContext, current: &str) -> Result<String> {
    if ctx.quiet {
        return Ok(current.to_string());
    }
    let initial = current.to_string();
    let search = tokio::task::spawn_blocking(move || {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("Search names")
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()
    })
    .await
    .context("Prompt task failed")??;
    Ok(search)
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_api_client::PairKey;
    use review_core::ReviewError;

    #[test]
    fn test_map_key() {
        assert_eq!(map_key(console::Key::Char('a')), Some(Key::Char('a')));
        assert_eq!(map_key(console::Key::ArrowUp), Some(Key::Up));
        assert_eq!(map_key(console::Key::ArrowDown), Some(Key::Down));
        assert_eq!(map_key(console::Key::Escape), Some(Key::Esc));
        assert_eq!(map_key(console::Key::Tab), None);
    }

    #[test]
    fn test_report_skips_silent_errors() {
        console::set_colors_enabled(false);
        let mut notices = Vec::new();

        report(&mut notices, Err(ReviewError::ConcurrentSubmission));
        assert!(notices.is_empty());

        report(&mut notices, Err(ReviewError::Network("timed out".into())));
        assert_eq!(
            notices,
            vec!["✗ Network error: timed out (press the key again to retry)".to_string()]
        );
    }

    #[test]
    fn test_describe_events() {
        console::set_colors_enabled(false);
        let key = PairKey::new(1, 2);
        assert_eq!(
            describe(&SessionEvent::DecisionRecorded {
                key,
                decision: Decision::Approve,
                reviewed_count: 1
            }),
            Some("✓ Approved 1-2".to_string())
        );
        assert_eq!(
            describe(&SessionEvent::Skipped { key }),
            Some("Skipped 1-2".to_string())
        );
        assert_eq!(describe(&SessionEvent::StateChanged { revision: 4 }), None);
    }
}
