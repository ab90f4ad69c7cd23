use std::path::PathBuf;

use clap::Parser;
use verdict_client::{API_BASE_ENV, DEFAULT_API_BASE};

/// Check a news article's credibility with the analysis service.
///
/// Without --text or --url, starts an interactive session on stdin.
#[derive(Debug, Parser)]
#[command(name = "verdict", version)]
pub struct Cli {
    /// Base URL of the analysis service.
    #[arg(long, env = API_BASE_ENV, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Analyze this article text and exit.
    #[arg(long, conflicts_with = "url")]
    pub text: Option<String>,

    /// Analyze the article at this URL and exit.
    #[arg(long)]
    pub url: Option<String>,

    /// With --text: only fetch sentiment and red flags, skip classification.
    #[arg(long, requires = "text")]
    pub insights_only: bool,

    /// Ping the service and exit.
    #[arg(long, conflicts_with_all = ["text", "url"])]
    pub check: bool,

    /// Show the full article text instead of a preview.
    #[arg(long)]
    pub full: bool,

    /// Give up on a request after this many seconds. No limit by default.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Also write logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
