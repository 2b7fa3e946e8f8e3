//! Command-line interface definitions for Job Radar.
//!
//! This module defines the runtime configuration using the `clap` crate.
//! Every option can be provided as a command-line flag or through an
//! environment variable, so the binary can be driven entirely from a cron
//! entry plus a `.env` file.

use clap::Parser;

/// Default Slack endpoint used to post messages.
pub const SLACK_POST_URL: &str = "https://slack.com/api/chat.postMessage";

/// Command-line arguments for the Job Radar application.
///
/// The Slack token and channel are required. When either one is missing
/// clap exits with a usage error naming the variable, which is the only
/// non-zero exit path of a run.
///
/// # Examples
///
/// ```sh
/// # Typical cron invocation, credentials from the environment
/// SLACK_BOT_TOKEN=xoxb-... SLACK_CHANNEL_ID=C0123 job_radar
///
/// # Shorter suppression window and a custom snapshot location
/// job_radar --window-hours 24 --history-file /var/lib/job_radar/history.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Slack bot token (xoxb-...)
    #[arg(long, env = "SLACK_BOT_TOKEN", hide_env_values = true, value_parser = non_empty)]
    pub slack_bot_token: String,

    /// Slack channel identifier (Cxxxxxxxx)
    #[arg(long, env = "SLACK_CHANNEL_ID", value_parser = non_empty)]
    pub slack_channel_id: String,

    /// Slack chat.postMessage endpoint
    #[arg(long, env = "SLACK_API_URL", default_value = SLACK_POST_URL)]
    pub slack_api_url: String,

    /// File remembering alerts that were already sent
    #[arg(long, env = "HISTORY_FILE", default_value = "history.json")]
    pub history_file: String,

    /// Append-only log of every match line that was emitted
    #[arg(long, env = "MATCHES_LOG", default_value = "matches.log")]
    pub matches_log: String,

    /// Hours during which the same alert is not sent again
    #[arg(long, env = "DEDUP_WINDOW_HOURS", default_value_t = 72)]
    pub window_hours: u64,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// User agent sent with every career page request
    #[arg(long, env = "SCRAPER_USER_AGENT", default_value = "Mozilla/5.0")]
    pub user_agent: String,

    /// Upper bound on sites scraped at the same time (default: all at once)
    #[arg(long, env = "MAX_CONCURRENCY")]
    pub concurrency: Option<usize>,
}

fn non_empty(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("value must not be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}
