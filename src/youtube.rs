use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use yt_tab_filter::constants::constants;

/// The channel tabs that list videos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChannelTab {
  Videos,
  Streams,
  Shorts,
  Podcasts,
}

impl ChannelTab {
  pub const ALL: [ChannelTab; 4] = [ChannelTab::Videos, ChannelTab::Streams, ChannelTab::Shorts, ChannelTab::Podcasts];

  pub fn segment(self) -> &'static str {
    match self {
      ChannelTab::Videos => "videos",
      ChannelTab::Streams => "streams",
      ChannelTab::Shorts => "shorts",
      ChannelTab::Podcasts => "podcasts",
    }
  }

  pub fn from_config(s: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|t| t.segment().eq_ignore_ascii_case(s.trim()))
  }
}

/// A single entry from a channel tab listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEntry {
  pub title: String,
  pub video_id: String,
}

/// Resolve user input to the URL of a channel tab.
///
/// Accepts an `@handle`, any URL on a channel (its tab, query and fragment are
/// dropped), or a bare channel name. Returns None for input that cannot name a
/// channel.
pub fn resolve_tab_url(input: &str, tab: ChannelTab) -> Option<String> {
  let candidate = input.trim();
  if candidate.is_empty() || candidate.contains(char::is_whitespace) {
    return None;
  }

  if candidate.starts_with('@') {
    if candidate.len() == 1 {
      return None;
    }
    return Some(format!("https://www.youtube.com/{}/{}", candidate, tab.segment()));
  }

  if candidate.starts_with("http://") || candidate.starts_with("https://") {
    return channel_root(candidate).map(|root| format!("{}/{}", root, tab.segment()));
  }

  if candidate.contains('/') || candidate.contains(':') {
    return None;
  }
  Some(format!("https://www.youtube.com/@{}/{}", candidate, tab.segment()))
}

/// Cut a channel URL back to `.../@handle` or `.../channel/<id>`, dropping any
/// tab segment, query or fragment.
fn channel_root(url: &str) -> Option<String> {
  let url = url.split(['?', '#']).next().unwrap_or(url);
  let (origin, path) = url.split_once("youtube.com/")?;
  let subdomain = origin.split_once("://").map_or(origin, |(_, host)| host);
  if !(subdomain.is_empty() || subdomain.ends_with('.')) {
    return None;
  }
  let mut segments = path.split('/').filter(|s| !s.is_empty());
  let root = match segments.next()? {
    handle if handle.starts_with('@') && handle.len() > 1 => handle.to_string(),
    "channel" => format!("channel/{}", segments.next()?),
    _ => return None,
  };
  Some(format!("{}youtube.com/{}", origin, root))
}

/// The path portion of a YouTube URL, used as the page's location key.
pub fn url_path(url: &str) -> &str {
  let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
  without_scheme.find('/').map_or("/", |i| &without_scheme[i..])
}

/// Parse a single tab-separated yt-dlp output line.
/// Expected format: `title\tid`
fn parse_listing_line(line: &str) -> Option<ChannelEntry> {
  let (title, id) = line.split_once('\t')?;
  let video_id = id.trim();
  if video_id.is_empty() || video_id == "NA" {
    return None;
  }
  Some(ChannelEntry { title: title.trim().to_string(), video_id: video_id.to_string() })
}

fn parse_listing_output(stdout: &str) -> Vec<ChannelEntry> {
  stdout.lines().map(str::trim).filter(|l| !l.is_empty()).filter_map(parse_listing_line).collect()
}

/// Fetch the first `count` titles of a channel tab using `--flat-playlist` for speed.
pub async fn list_tab_titles(tab_url: &str, count: usize) -> Result<Vec<ChannelEntry>> {
  let playlist_range = format!("1:{}", count.max(1));
  debug!(tab_url, count, "youtube: listing channel tab");

  let output = Command::new("yt-dlp")
    .args([
      "--flat-playlist",
      "--print",
      "%(title)s\t%(id)s",
      "--playlist-items",
      &playlist_range,
      "--no-warnings",
      "--ignore-errors",
      "--",
      tab_url,
    ])
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .output()
    .await
    .map_err(|e| {
      if e.kind() == std::io::ErrorKind::NotFound {
        anyhow!("{}", constants().yt_dlp_install_hint)
      } else {
        anyhow!(e).context("Failed to execute yt-dlp channel listing")
      }
    })?;

  if !output.status.success() {
    return Err(anyhow!("yt-dlp channel listing failed: {}", String::from_utf8_lossy(&output.stderr)));
  }

  let stdout_str = String::from_utf8(output.stdout).context("yt-dlp output non-UTF8")?;
  Ok(parse_listing_output(&stdout_str))
}

#[cfg(test)]
mod tests {
  use super::*;

  // --- resolve_tab_url ---

  #[test]
  fn handle_resolves_to_tab() {
    assert_eq!(
      resolve_tab_url("@TwoSetViolin", ChannelTab::Streams).as_deref(),
      Some("https://www.youtube.com/@TwoSetViolin/streams")
    );
  }

  #[test]
  fn url_tab_segment_is_replaced() {
    assert_eq!(
      resolve_tab_url("https://www.youtube.com/@x/videos/", ChannelTab::Shorts).as_deref(),
      Some("https://www.youtube.com/@x/shorts")
    );
    assert_eq!(
      resolve_tab_url("https://www.youtube.com/channel/UC123", ChannelTab::Videos).as_deref(),
      Some("https://www.youtube.com/channel/UC123/videos")
    );
  }

  #[test]
  fn url_is_cut_back_to_channel_root() {
    assert_eq!(
      resolve_tab_url("https://www.youtube.com/@x/featured", ChannelTab::Videos).as_deref(),
      Some("https://www.youtube.com/@x/videos")
    );
    assert_eq!(
      resolve_tab_url("https://www.youtube.com/@x/videos?view=0", ChannelTab::Streams).as_deref(),
      Some("https://www.youtube.com/@x/streams")
    );
    assert_eq!(
      resolve_tab_url("https://youtube.com/channel/UC123/playlists#top", ChannelTab::Shorts).as_deref(),
      Some("https://youtube.com/channel/UC123/shorts")
    );
  }

  #[test]
  fn non_channel_youtube_urls_are_rejected() {
    assert_eq!(resolve_tab_url("https://www.youtube.com/watch?v=abc123", ChannelTab::Videos), None);
    assert_eq!(resolve_tab_url("https://www.youtube.com/channel/", ChannelTab::Videos), None);
    assert_eq!(resolve_tab_url("https://www.youtube.com/@", ChannelTab::Videos), None);
    assert_eq!(resolve_tab_url("https://notyoutube.com/@x", ChannelTab::Videos), None);
  }

  #[test]
  fn bare_name_becomes_handle() {
    assert_eq!(
      resolve_tab_url("lofigirl", ChannelTab::Videos).as_deref(),
      Some("https://www.youtube.com/@lofigirl/videos")
    );
  }

  #[test]
  fn unusable_input_is_rejected() {
    assert_eq!(resolve_tab_url("", ChannelTab::Videos), None);
    assert_eq!(resolve_tab_url("@", ChannelTab::Videos), None);
    assert_eq!(resolve_tab_url("two words", ChannelTab::Videos), None);
    assert_eq!(resolve_tab_url("https://example.com/x", ChannelTab::Videos), None);
  }

  // --- url_path ---

  #[test]
  fn url_path_strips_origin() {
    assert_eq!(url_path("https://www.youtube.com/@x/videos"), "/@x/videos");
    assert_eq!(url_path("https://www.youtube.com"), "/");
  }

  // --- listing parse ---

  #[test]
  fn parses_listing_lines() {
    let out = "Funny Cat Videos\tabc123\n\nDog park fun\tdef456\nbroken line\n\tNA\n";
    let entries = parse_listing_output(out);
    assert_eq!(
      entries,
      vec![
        ChannelEntry { title: "Funny Cat Videos".to_string(), video_id: "abc123".to_string() },
        ChannelEntry { title: "Dog park fun".to_string(), video_id: "def456".to_string() },
      ]
    );
  }

  #[test]
  fn tab_from_config_is_case_insensitive() {
    assert_eq!(ChannelTab::from_config("Streams"), Some(ChannelTab::Streams));
    assert_eq!(ChannelTab::from_config(" shorts "), Some(ChannelTab::Shorts));
    assert_eq!(ChannelTab::from_config("community"), None);
  }
}
