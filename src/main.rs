mod config;
mod preview;
mod youtube;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use config::Config;
use youtube::{ChannelTab, list_tab_titles, resolve_tab_url, url_path};
use yt_tab_filter::constants::constants;
use yt_tab_filter::logging;
use yt_tab_filter::matcher::matches;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Log at debug level (RUST_LOG overrides)
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Write logs to a daily-rolling file in this directory instead of stderr
  #[arg(long, global = true)]
  log_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show which titles of a channel tab the in-page filter would keep
  Preview {
    /// Channel @handle, channel URL, or bare channel name
    channel: String,

    /// Channel tab to list (default: prefs.toml, then 'videos')
    #[arg(short, long)]
    tab: Option<ChannelTab>,

    /// Filter tokens; every token must appear in the title
    #[arg(short, long, default_value = "")]
    query: String,

    /// Number of titles to fetch (default: prefs.toml, then constants)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Print only titles that stay visible
    #[arg(long)]
    only_matching: bool,
  },
  /// Check a single title against a query; exits 1 when it does not match
  Match { title: String, query: String },
}

// --- Commands ---

async fn run_preview(
  channel: &str,
  tab: Option<ChannelTab>,
  query: &str,
  limit: Option<usize>,
  only_matching: bool,
) -> Result<ExitCode> {
  let config = Config::load();
  let tab = tab.or_else(|| config.tab.as_deref().and_then(ChannelTab::from_config)).unwrap_or(ChannelTab::Videos);
  let limit = limit.or(config.limit).unwrap_or(constants().preview_limit);

  let url = resolve_tab_url(channel, tab).ok_or_else(|| anyhow!("Not a channel: '{}'", channel))?;
  info!(url = %url, limit, "preview: fetching channel tab");
  let entries = list_tab_titles(&url, limit).await.with_context(|| format!("Failed to list {}", url))?;
  if entries.is_empty() {
    println!("No videos found on {}", url);
    return Ok(ExitCode::SUCCESS);
  }

  let result = preview::run(&entries, url_path(&url), query);
  for row in &result.rows {
    if only_matching && !row.shown {
      continue;
    }
    let mark = if row.shown { "+" } else { "-" };
    println!("{} {}  [{}]", mark, row.title, row.video_id);
  }
  println!("{} shown, {} hidden of {} on {}", result.summary.shown, result.summary.hidden, result.summary.total(), url);
  Ok(ExitCode::SUCCESS)
}

fn run_match(title: &str, query: &str) -> ExitCode {
  if matches(title, query) {
    println!("match");
    ExitCode::SUCCESS
  } else {
    println!("no match");
    ExitCode::FAILURE
  }
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<ExitCode> {
  let args = Args::parse();
  let _log_guard = logging::init_cli(args.verbose, args.log_dir.as_deref())?;

  match args.command {
    Command::Preview { channel, tab, query, limit, only_matching } => {
      run_preview(&channel, tab, &query, limit, only_matching).await
    }
    Command::Match { title, query } => Ok(run_match(&title, &query)),
  }
}
