//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so the in-page script and the
//! CLI share one set of selectors without any runtime file I/O. Parsed once on
//! first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  /// Fixed id of the injected control; the singleton key.
  pub ui_id: String,

  // Host page
  pub anchor_selector: String,
  pub item_selectors: String,
  pub title_selectors: String,
  pub navigate_finish_event: String,

  // Control
  pub placeholder: String,
  pub filter_label: String,
  pub clear_label: String,
  pub container_style: Vec<(String, String)>,
  pub input_style: Vec<(String, String)>,
  pub button_style: Vec<(String, String)>,

  // Delayed one-shot reconciles
  pub boot_retry_ms: u64,
  pub navigation_reattach_ms: u64,

  // Preview CLI
  pub preview_limit: usize,
  pub yt_dlp_install_hint: String,
}

impl Constants {
  pub fn boot_retry(&self) -> Duration {
    Duration::from_millis(self.boot_retry_ms)
  }

  pub fn navigation_reattach(&self) -> Duration {
    Duration::from_millis(self.navigation_reattach_ms)
  }
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is a build-time error.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
