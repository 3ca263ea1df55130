//! Application context with shared state and utilities

use anyhow::Result;
use console::{style, Term};
use std::sync::Arc;

use review_core::{KeyMap, SessionController};

use crate::config::Config;

/// Application context passed to the review loop
pub struct AppContext {
    pub session: Arc<SessionController>,
    pub keys: KeyMap,
    pub config: Config,
    pub quiet: bool,
    term: Term,
}

impl AppContext {
    pub fn new(session: Arc<SessionController>, config: Config, quiet: bool) -> Self {
        Self {
            session,
            keys: KeyMap::default(),
            config,
            quiet,
            term: Term::stdout(),
        }
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn clear(&self) -> Result<()> {
        if !self.quiet && self.term.is_term() {
            self.term.clear_screen()?;
        }
        Ok(())
    }

    pub fn print_header(&self, msg: &str) {
        if !self.quiet {
            println!();
            println!("{}", style(msg).bold());
        }
    }

    pub fn print_success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).green());
        }
    }

    pub fn print_info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).cyan());
        }
    }
}
