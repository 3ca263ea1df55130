//! Terminal front end for reviewing duplicate-author candidate pairs.

mod config;
mod context;
mod render;
mod runner;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use review_api_client::ReviewApiClient;
use review_core::{ReviewApiAdapter, SessionController, SortKey, ViewOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::context::AppContext;

#[derive(Parser)]
#[command(name = "review")]
#[command(about = "Approve, reject or skip duplicate-author candidate matches")]
struct Cli {
    /// Review API base URL (overrides REVIEW_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Request timeout in seconds (overrides REVIEW_API_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Page size for the pending list (overrides REVIEW_PAGE_SIZE)
    #[arg(long)]
    limit: Option<u32>,

    /// Offset into the pending list (overrides REVIEW_PAGE_OFFSET)
    #[arg(long)]
    offset: Option<u32>,

    /// Initial sort: score-desc, score-asc, name-asc or coauthor-desc
    #[arg(long, default_value = "score-desc")]
    sort: String,

    /// Initial name search
    #[arg(long, default_value = "")]
    search: String,

    /// Only show pairs connected by a collaboration path
    #[arg(long)]
    connected_only: bool,

    /// Skip prompts and decorative output
    #[arg(long, short)]
    quiet: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            config.timeout_secs = timeout;
        }
        if let Some(limit) = self.limit {
            config.page_size = limit;
        }
        if let Some(offset) = self.offset {
            config.page_offset = offset;
        }
    }

    fn view_options(&self) -> Result<ViewOptions> {
        Ok(ViewOptions {
            sort: self.sort.parse::<SortKey>()?,
            search: self.search.clone(),
            connected_only: self.connected_only,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the review screen
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,review_core=info,review_api_client=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    cli.apply(&mut config);
    tracing::info!(api_url = %config.api_url, "Configuration loaded");

    let client = ReviewApiClient::new(config.client_options())
        .context("Failed to create review API client")?;
    let session = SessionController::new(
        Arc::new(ReviewApiAdapter::new(Arc::new(client))),
        config.pending_query(),
    )
    .with_view(cli.view_options().context("Invalid --sort")?);

    let ctx = AppContext::new(Arc::new(session), config, cli.quiet);
    runner::run_review(&ctx).await
}
