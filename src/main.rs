//! # Database News Digest
//!
//! Collects database and cloud news from HTML sites and RSS/Atom feeds,
//! sorts it into topical categories, and pushes a daily digest to a group
//! chat webhook. One invocation is one run; scheduling is left to cron or a
//! similar scheduler.
//!
//! ## Usage
//!
//! ```sh
//! WECHAT_WEBHOOK_URL=https://... db_news_digest --config config/config.yaml
//! ```
//!
//! ## Architecture
//!
//! 1. **Collection**: every source is fetched and parsed concurrently; a
//!    failing source contributes nothing and never stops the others
//! 2. **Filtering**: only items dated today or yesterday are kept
//! 3. **Categorization**: keyword matching against a static taxonomy
//! 4. **Rendering**: text and HTML reports, plus chat markdown downgraded
//!    from the HTML
//! 5. **Delivery**: one webhook push; its outcome is the run's outcome

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregator;
mod categorizer;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod pusher;
mod scrapers;
mod utils;

use categorizer::DATABASE_TAXONOMY;
use cli::Cli;
use config::AppConfig;
use pipeline::{RunOptions, RunOutcome, generate_and_send};
use pusher::{DryRunPusher, MessageVariant, WebhookPusher};
use scrapers::HttpFetcher;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("db_news_digest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Configuration ----
    let config = AppConfig::load(&args.config).await?;
    let sources = config.source_descriptors()?;
    if sources.is_empty() {
        warn!("No sources configured; nothing to collect");
    }

    let fetch_timeout = Duration::from_secs(args.fetch_timeout_secs);
    let fetcher = HttpFetcher::new(fetch_timeout)?;
    let options = RunOptions {
        fetch_timeout,
        output_dir: args.output_dir.clone(),
        variant: if args.plain_text {
            MessageVariant::Text
        } else {
            MessageVariant::Markdown
        },
    };
    let today = Local::now().date_naive();
    let run_timeout = Duration::from_secs(args.run_timeout_secs);

    // ---- Run ----
    let outcome = if args.dry_run {
        let run = generate_and_send(
            &fetcher,
            &DryRunPusher,
            &sources,
            &DATABASE_TAXONOMY,
            &options,
            today,
        );
        tokio::time::timeout(run_timeout, run).await
    } else {
        let webhook_url = config.webhook_url(args.webhook_url.as_deref())?;
        let pusher = WebhookPusher::new(&webhook_url, fetch_timeout)?;
        let run = generate_and_send(
            &fetcher,
            &pusher,
            &sources,
            &DATABASE_TAXONOMY,
            &options,
            today,
        );
        tokio::time::timeout(run_timeout, run).await
    };

    let elapsed = start_time.elapsed();
    match outcome {
        Ok(Ok(RunOutcome::Delivered { items })) => {
            info!(items, secs = elapsed.as_secs(), "Execution complete");
            Ok(())
        }
        Ok(Ok(RunOutcome::NoNews)) => {
            info!(secs = elapsed.as_secs(), "Execution complete; no news to send");
            Ok(())
        }
        Ok(Err(e)) => {
            error!(error = %e, "Failed to send daily report");
            Err(e.into())
        }
        Err(_) => {
            error!(?run_timeout, "Run timed out");
            Err(format!("run exceeded {run_timeout:?}").into())
        }
    }
}
