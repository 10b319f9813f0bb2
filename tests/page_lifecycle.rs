use yt_tab_filter::ui::control_input;
use yt_tab_filter::{
  AttachOutcome, ControlAction, DeferredReason, FilterController, HostDocument, ItemShape, MemoryDocument,
};

fn channel(location: &str) -> FilterController<MemoryDocument> {
  let mut doc = MemoryDocument::new();
  doc.add_tab_strip(&["Home", "Videos", "Shorts", "Live", "Playlists"]);
  doc.add_item_grid();
  FilterController::new(doc, location)
}

fn grid(c: &FilterController<MemoryDocument>) -> yt_tab_filter::memory::NodeId {
  c.document().query_first("ytd-rich-grid-renderer").unwrap()
}

fn type_and_submit(c: &mut FilterController<MemoryDocument>, text: &str) {
  let input = control_input(c.document()).unwrap();
  c.document_mut().set_input_value(&input, text);
  let value = c.document().input_value(&input);
  c.handle(ControlAction::Submit(value));
}

fn visible_titles(c: &FilterController<MemoryDocument>) -> Vec<String> {
  let doc = c.document();
  doc
    .query_all("ytd-rich-item-renderer,ytd-grid-video-renderer,ytd-video-renderer")
    .iter()
    .filter(|item| !doc.is_hidden(item))
    .map(|item| yt_tab_filter::title::title_text(doc, item))
    .collect()
}

#[test]
fn filter_survives_infinite_scroll_and_resets_on_tab_switch() {
  let mut c = channel("/@cats/videos");
  let g = grid(&c);
  c.document_mut().add_video(g, ItemShape::RichItem, "Dog park fun");
  c.document_mut().add_video(g, ItemShape::RichItem, "Funny Cat Videos Compilation");
  c.boot();

  type_and_submit(&mut c, "cat video");
  assert_eq!(visible_titles(&c), vec!["Funny Cat Videos Compilation"]);

  // Infinite scroll appends more items; the mutation batch reconciles.
  c.document_mut().add_video(g, ItemShape::RichItem, "Cat video reactions");
  c.document_mut().add_video(g, ItemShape::RichItem, "Birds at dawn");
  c.reconcile();
  assert_eq!(visible_titles(&c), vec!["Funny Cat Videos Compilation", "Cat video reactions"]);

  // The host also fires its navigation-finished signal for the same location.
  assert_eq!(c.on_location_changed("/@cats/videos"), None);
  assert_eq!(c.query(), "cat video");

  // Switching tabs resets the filter and asks for a delayed reattach.
  let deferred = c.on_location_changed("/@cats/streams").unwrap();
  assert_eq!(deferred.reason, DeferredReason::NavigationReattach);
  assert_eq!(c.query(), "");
  assert_eq!(visible_titles(&c).len(), 4);
  let input = control_input(c.document()).unwrap();
  assert_eq!(c.document().input_value(&input), "");
}

#[test]
fn host_rerender_recreates_single_control() {
  let mut c = channel("/@cats/videos");
  let g = grid(&c);
  c.document_mut().add_video(g, ItemShape::GridVideo, "Cat nap");
  c.document_mut().add_video(g, ItemShape::ListVideo, "Dog nap");
  c.boot();
  type_and_submit(&mut c, "cat");

  let strip = c.document().query_first("yt-tab-group-shape").unwrap();
  c.document_mut().remove(strip);
  assert_eq!(c.reconcile(), AttachOutcome::AnchorMissing);
  assert_eq!(c.document().control_count(), 0);

  c.document_mut().add_tab_strip(&["Home", "Videos"]);
  assert_eq!(c.reconcile(), AttachOutcome::Attached);
  assert_eq!(c.reconcile(), AttachOutcome::AlreadyPresent);
  assert_eq!(c.document().control_count(), 1);

  let input = control_input(c.document()).unwrap();
  assert_eq!(c.document().input_value(&input), "cat");
  assert_eq!(visible_titles(&c), vec!["Cat nap"]);
}

#[test]
fn clear_button_unhides_everything() {
  let mut c = channel("/@cats/videos");
  let g = grid(&c);
  for title in ["alpha one", "beta two", "gamma three"] {
    c.document_mut().add_video(g, ItemShape::RichItem, title);
  }
  c.boot();
  type_and_submit(&mut c, "beta");
  assert_eq!(visible_titles(&c), vec!["beta two"]);

  c.handle(ControlAction::Clear);
  let input = control_input(c.document()).unwrap();
  assert_eq!(c.document().input_value(&input), "");
  assert_eq!(c.query(), "");
  assert_eq!(visible_titles(&c).len(), 3);
}

#[test]
fn stale_deferred_reconcile_is_harmless() {
  let mut c = channel("/@cats/videos");
  let g = grid(&c);
  c.document_mut().add_video(g, ItemShape::RichItem, "cat");
  c.document_mut().add_video(g, ItemShape::RichItem, "dog");
  let boot_retry = c.boot();
  type_and_submit(&mut c, "dog");

  // The boot retry fires long after the user filtered.
  assert_eq!(c.run_deferred(boot_retry), AttachOutcome::AlreadyPresent);
  assert_eq!(visible_titles(&c), vec!["dog"]);
  assert_eq!(c.document().control_count(), 1);
}
