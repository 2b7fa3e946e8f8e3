//! # Job Radar
//!
//! A periodic career-page monitor. Each invocation fetches a curated list of
//! job boards, looks for cloud/DevOps openings in Halifax, and posts newly
//! found matches to a Slack channel. A JSON history file keeps the same
//! finding from being alerted again for 72 hours.
//!
//! ## Usage
//!
//! ```sh
//! SLACK_BOT_TOKEN=xoxb-... SLACK_CHANNEL_ID=C0123 job_radar
//! ```
//!
//! Scheduling is left to cron; the binary does one pass and exits.
//!
//! ## Architecture
//!
//! 1. **Config**: CLI flags / environment, required Slack credentials
//! 2. **History**: load `history.json` (missing or broken file = empty)
//! 3. **Dispatch**: one concurrent worker per site (fetch → extract → dedup → notify)
//! 4. **Summary**: post "No new openings found" when nothing was alerted

use clap::Parser;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod fetch;
mod history;
mod matcher;
mod models;
mod notify;
mod pipeline;
mod scrapers;
mod sites;
#[cfg(test)]
mod test_support;
mod utils;

use cli::Cli;
use fetch::HttpFetcher;
use history::DedupStore;
use notify::SlackNotifier;
use pipeline::{Monitor, RunContext, RunSummary};
use sites::SITES;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    // Missing SLACK_BOT_TOKEN / SLACK_CHANNEL_ID exits here with a usage error
    let args = Cli::parse();
    debug!(history_file = %args.history_file, window_hours = args.window_hours, concurrency = ?args.concurrency, "Parsed CLI arguments");

    run(&args).await;
    println!("✅ All scrapers finished.");
}

/// Build the HTTP clients and run every site once.
///
/// Past configuration, nothing fails the process: if a client cannot be
/// built the error is logged and `None` is returned.
async fn run(args: &Cli) -> Option<RunSummary> {
    let start_time = std::time::Instant::now();
    info!(sites = SITES.len(), "job_radar starting up");

    let window = Duration::from_secs(args.window_hours.saturating_mul(3600));
    let timeout = Duration::from_secs(args.timeout_secs);

    let store = DedupStore::load(&args.history_file, window);
    let fetcher = match HttpFetcher::new(&args.user_agent, timeout) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!(error = %e, "Failed to build page fetcher; nothing scraped");
            return None;
        }
    };
    let slack = match SlackNotifier::new(
        args.slack_api_url.as_str(),
        args.slack_bot_token.as_str(),
        args.slack_channel_id.as_str(),
        timeout,
    ) {
        Ok(slack) => slack,
        Err(e) => {
            error!(error = %e, "Failed to build Slack client; nothing scraped");
            return None;
        }
    };

    let monitor = Monitor::new(fetcher, slack, RunContext::new(store))
        .with_matches_log(args.matches_log.as_str())
        .with_concurrency(args.concurrency);

    let summary = monitor.run(SITES).await;

    let elapsed = start_time.elapsed();
    info!(
        sites = summary.sites,
        alerts = summary.alerts,
        summary_sent = summary.summary_sent,
        history_entries = monitor.context().store().len(),
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Some(summary)
}
