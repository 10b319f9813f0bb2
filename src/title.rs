use crate::constants::constants;
use crate::dom::HostDocument;

/// Read the displayed title of a video item.
///
/// Takes the first title element inside the item and returns its trimmed text,
/// falling back to its `title` attribute. Items without a title element yield
/// an empty string, which fails every non-empty query.
pub fn title_text<D: HostDocument>(doc: &D, item: &D::Node) -> String {
  let Some(el) = doc.query_within(item, &constants().title_selectors) else {
    return String::new();
  };
  let text = doc.text_content(&el);
  let text = text.trim();
  if !text.is_empty() {
    return text.to_string();
  }
  doc.attribute(&el, "title").unwrap_or_default()
}
