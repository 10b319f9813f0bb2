use tracing::debug;

use crate::constants::constants;
use crate::dom::HostDocument;
use crate::matcher::matches;
use crate::title::title_text;

/// Visibility counts after a filter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
  pub shown: usize,
  pub hidden: usize,
}

impl FilterSummary {
  pub fn total(&self) -> usize {
    self.shown + self.hidden
  }
}

/// Show or hide every video item currently in the document according to `query`.
///
/// Only elements matching the item container selectors are touched. The pass
/// is idempotent: running it again with the same query leaves the same set of
/// items hidden, whatever their visibility was before.
pub fn apply_filter<D: HostDocument>(doc: &mut D, query: &str) -> FilterSummary {
  let mut summary = FilterSummary::default();
  for item in doc.query_all(&constants().item_selectors) {
    let keep = matches(&title_text(doc, &item), query);
    doc.set_hidden(&item, !keep);
    if keep {
      summary.shown += 1;
    } else {
      summary.hidden += 1;
    }
  }
  debug!(query, shown = summary.shown, hidden = summary.hidden, "filter: applied");
  summary
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::memory::{ItemShape, MemoryDocument, NodeId};

  fn page(titles: &[(&str, ItemShape)]) -> (MemoryDocument, Vec<NodeId>) {
    let mut doc = MemoryDocument::new();
    let grid = doc.add_item_grid();
    let items = titles.iter().map(|(t, shape)| doc.add_video(grid, *shape, t)).collect();
    (doc, items)
  }

  fn hidden_set(doc: &MemoryDocument, items: &[NodeId]) -> Vec<bool> {
    items.iter().map(|i| doc.is_hidden(i)).collect()
  }

  #[test]
  fn hides_non_matching_items() {
    let (mut doc, items) =
      page(&[("Dog park fun", ItemShape::RichItem), ("Funny Cat Videos Compilation", ItemShape::RichItem)]);
    let summary = apply_filter(&mut doc, "cat video");
    assert_eq!(hidden_set(&doc, &items), vec![true, false]);
    assert_eq!(summary, FilterSummary { shown: 1, hidden: 1 });
  }

  #[test]
  fn covers_all_three_shapes() {
    let (mut doc, items) = page(&[
      ("keep rich", ItemShape::RichItem),
      ("drop grid", ItemShape::GridVideo),
      ("keep list", ItemShape::ListVideo),
      ("drop rich", ItemShape::RichItem),
    ]);
    apply_filter(&mut doc, "keep");
    assert_eq!(hidden_set(&doc, &items), vec![false, true, false, true]);
  }

  #[test]
  fn idempotent_from_any_starting_state() {
    let (mut doc, items) = page(&[("alpha", ItemShape::RichItem), ("beta", ItemShape::GridVideo)]);
    doc.set_hidden(&items[0], true);
    let first = apply_filter(&mut doc, "alpha");
    let once = hidden_set(&doc, &items);
    let second = apply_filter(&mut doc, "alpha");
    assert_eq!(once, hidden_set(&doc, &items));
    assert_eq!(once, vec![false, true]);
    assert_eq!(first, second);
  }

  #[test]
  fn empty_query_unhides_everything() {
    let (mut doc, items) = page(&[("alpha", ItemShape::RichItem), ("beta", ItemShape::ListVideo)]);
    apply_filter(&mut doc, "zzz");
    assert_eq!(hidden_set(&doc, &items), vec![true, true]);
    apply_filter(&mut doc, "");
    assert_eq!(hidden_set(&doc, &items), vec![false, false]);
  }

  #[test]
  fn leaves_other_elements_alone() {
    let (mut doc, _) = page(&[("alpha", ItemShape::RichItem)]);
    let shelf = doc.append_element(doc.root(), "ytd-shelf-renderer", &[]);
    let link = doc.append_element(shelf, "a", &[("id", "video-title")]);
    doc.append_text(link, "unrelated");
    let summary = apply_filter(&mut doc, "alpha");
    assert!(!doc.is_hidden(&shelf));
    assert!(!doc.is_hidden(&link));
    assert_eq!(summary.total(), 1);
  }

  #[test]
  fn untitled_items_hide_under_active_filter() {
    let mut doc = MemoryDocument::new();
    let item = doc.append_element(doc.root(), "ytd-rich-item-renderer", &[]);
    apply_filter(&mut doc, "anything");
    assert!(doc.is_hidden(&item));
    apply_filter(&mut doc, "   ");
    assert!(!doc.is_hidden(&item));
  }
}
