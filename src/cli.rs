//! Command-line interface definitions.
//!
//! Every option has a default or an environment variable, so a scheduler can
//! invoke the binary with no arguments.

use clap::Parser;

/// Command-line arguments for the database news digest.
///
/// # Examples
///
/// ```sh
/// # Collect, render and push using config/config.yaml
/// db_news_digest
///
/// # Print the message instead of pushing, and keep copies of the reports
/// db_news_digest --dry-run --output-dir ./reports
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: String,

    /// Webhook URL; overrides `wechat.webhook_url` from the config file
    #[arg(long, env = "WECHAT_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Timeout for each source fetch, in seconds
    #[arg(long, default_value_t = 15)]
    pub fetch_timeout_secs: u64,

    /// Timeout for the whole run, in seconds
    #[arg(long, default_value_t = 300)]
    pub run_timeout_secs: u64,

    /// Directory to write the text, HTML, markdown and JSON reports into
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Print the message to stdout instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Send the plain-text report instead of markdown
    #[arg(long)]
    pub plain_text: bool,
}
