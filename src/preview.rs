//! Dry-run of the in-page filter against a fetched channel tab listing.

use yt_tab_filter::controller::FilterController;
use yt_tab_filter::dom::{ControlAction, HostDocument};
use yt_tab_filter::filter::FilterSummary;
use yt_tab_filter::memory::{ItemShape, MemoryDocument, NodeId};

use crate::youtube::ChannelEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRow {
  pub title: String,
  pub video_id: String,
  pub shown: bool,
}

#[derive(Debug, Clone)]
pub struct Preview {
  pub rows: Vec<PreviewRow>,
  pub summary: FilterSummary,
}

/// Render `entries` as a channel tab page and submit `query` through the
/// same controller the browser uses, then read back each item's visibility.
pub fn run(entries: &[ChannelEntry], location_key: &str, query: &str) -> Preview {
  let mut doc = MemoryDocument::new();
  doc.add_tab_strip(&["Home", "Videos", "Shorts", "Live", "Playlists"]);
  let grid = doc.add_item_grid();
  let items: Vec<NodeId> = entries.iter().map(|e| doc.add_video(grid, ItemShape::RichItem, &e.title)).collect();

  let mut controller = FilterController::new(doc, location_key);
  // Timers never fire in a dry run; the page is complete before boot.
  let _ = controller.boot();
  let summary = controller.handle(ControlAction::Submit(query.to_string()));

  let doc = controller.document();
  let rows = entries
    .iter()
    .zip(&items)
    .map(|(entry, item)| PreviewRow {
      title: entry.title.clone(),
      video_id: entry.video_id.clone(),
      shown: !doc.is_hidden(item),
    })
    .collect();
  Preview { rows, summary }
}
