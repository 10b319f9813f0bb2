//! In-memory host document.
//!
//! A small arena DOM implementing [`HostDocument`], with just enough selector
//! support for the selectors in `constants.ron`: comma-separated lists of
//! compound selectors built from an optional tag, `#id` and `.class` parts.
//! Combinators are not supported. Used by the preview CLI and by tests.

use std::collections::BTreeMap;

use tracing::debug;

use crate::constants::constants;
use crate::dom::{ControlSpec, HostDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
  Root,
  Element(Element),
  Text(String),
}

#[derive(Debug, Clone)]
struct Node {
  parent: Option<NodeId>,
  children: Vec<NodeId>,
  kind: NodeKind,
}

#[derive(Debug, Clone, Default)]
struct Element {
  tag: String,
  attrs: BTreeMap<String, String>,
  /// Inline style properties, in insertion order.
  style: Vec<(String, String)>,
  /// Live value of form controls (diverges from the `value` attribute once edited).
  value: String,
}

impl Element {
  fn id(&self) -> Option<&str> {
    self.attrs.get("id").map(String::as_str)
  }

  fn has_class(&self, class: &str) -> bool {
    self.attrs.get("class").is_some_and(|c| c.split_whitespace().any(|c| c == class))
  }
}

// --- Selectors ---

/// One compound selector: `tag#id.class.class`, every part optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
  tag: Option<String>,
  id: Option<String>,
  classes: Vec<String>,
}

impl Compound {
  fn parse(raw: &str) -> Option<Self> {
    let raw = raw.trim();
    if raw.is_empty() || raw.contains(|c: char| c.is_whitespace() || matches!(c, '>' | '+' | '~' | '[' | ':')) {
      return None;
    }

    let mut compound = Compound::default();
    let mut rest = raw;
    let tag_end = rest.find(['#', '.']).unwrap_or(rest.len());
    if tag_end > 0 {
      compound.tag = Some(rest[..tag_end].to_ascii_lowercase());
    }
    rest = &rest[tag_end..];

    while let Some(marker) = rest.chars().next() {
      let body = &rest[1..];
      let end = body.find(['#', '.']).unwrap_or(body.len());
      let name = &body[..end];
      if name.is_empty() {
        return None;
      }
      match marker {
        '#' => compound.id = Some(name.to_string()),
        _ => compound.classes.push(name.to_string()),
      }
      rest = &body[end..];
    }
    Some(compound)
  }

  fn matches(&self, el: &Element) -> bool {
    self.tag.as_deref().is_none_or(|t| el.tag == t)
      && self.id.as_deref().is_none_or(|id| el.id() == Some(id))
      && self.classes.iter().all(|c| el.has_class(c))
  }
}

fn parse_selector_list(selectors: &str) -> Vec<Compound> {
  selectors
    .split(',')
    .filter_map(|raw| {
      let parsed = Compound::parse(raw);
      if parsed.is_none() {
        debug!(selector = raw.trim(), "memory document: unsupported selector skipped");
      }
      parsed
    })
    .collect()
}

// --- Document ---

#[derive(Debug, Clone)]
pub struct MemoryDocument {
  nodes: Vec<Node>,
  root: NodeId,
}

impl Default for MemoryDocument {
  fn default() -> Self {
    Self::new()
  }
}

impl MemoryDocument {
  /// An empty document whose root plays the role of `document.body`.
  pub fn new() -> Self {
    Self { nodes: vec![Node { parent: None, children: Vec::new(), kind: NodeKind::Root }], root: NodeId(0) }
  }

  pub fn root(&self) -> NodeId {
    self.root
  }

  fn element(&self, id: NodeId) -> Option<&Element> {
    match &self.nodes[id.0].kind {
      NodeKind::Element(el) => Some(el),
      _ => None,
    }
  }

  fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
    match &mut self.nodes[id.0].kind {
      NodeKind::Element(el) => Some(el),
      _ => None,
    }
  }

  fn create(&mut self, kind: NodeKind) -> NodeId {
    let id = NodeId(self.nodes.len());
    self.nodes.push(Node { parent: None, children: Vec::new(), kind });
    id
  }

  fn create_element(&mut self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let el = Element {
      tag: tag.to_ascii_lowercase(),
      attrs: attrs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
      ..Element::default()
    };
    self.create(NodeKind::Element(el))
  }

  fn append_child(&mut self, parent: NodeId, child: NodeId) {
    self.nodes[child.0].parent = Some(parent);
    self.nodes[parent.0].children.push(child);
  }

  fn insert_after(&mut self, target: NodeId, child: NodeId) -> bool {
    let Some(parent) = self.nodes[target.0].parent else {
      return false;
    };
    let siblings = &mut self.nodes[parent.0].children;
    let Some(pos) = siblings.iter().position(|id| *id == target) else {
      return false;
    };
    siblings.insert(pos + 1, child);
    self.nodes[child.0].parent = Some(parent);
    true
  }

  /// Append a new element under `parent`.
  pub fn append_element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let id = self.create_element(tag, attrs);
    self.append_child(parent, id);
    id
  }

  pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
    let id = self.create(NodeKind::Text(text.to_string()));
    self.append_child(parent, id);
    id
  }

  /// Detach `node` (and its subtree) from the document, as a host re-render would.
  pub fn remove(&mut self, node: NodeId) {
    if let Some(parent) = self.nodes[node.0].parent.take() {
      self.nodes[parent.0].children.retain(|c| *c != node);
    }
  }

  pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
    if let Some(el) = self.element_mut(node) {
      match el.style.iter_mut().find(|(k, _)| k == property) {
        Some(entry) => entry.1 = value.to_string(),
        None => el.style.push((property.to_string(), value.to_string())),
      }
    }
  }

  fn remove_style(&mut self, node: NodeId, property: &str) {
    if let Some(el) = self.element_mut(node) {
      el.style.retain(|(k, _)| k != property);
    }
  }

  /// Inline style property of an element, if set.
  pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
    self.element(node)?.style.iter().find(|(k, _)| k == property).map(|(_, v)| v.as_str())
  }

  pub fn tag(&self, node: NodeId) -> Option<&str> {
    self.element(node).map(|el| el.tag.as_str())
  }

  /// Attached element children of `node`, in order.
  pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
    self.nodes[node.0].children.iter().copied().filter(|c| self.element(*c).is_some()).collect()
  }

  /// Pre-order walk of the elements strictly below `scope`.
  fn descendants(&self, scope: NodeId, out: &mut Vec<NodeId>) {
    for child in &self.nodes[scope.0].children {
      if self.element(*child).is_some() {
        out.push(*child);
      }
      self.descendants(*child, out);
    }
  }

  fn select_below(&self, scope: NodeId, selectors: &str) -> Vec<NodeId> {
    let list = parse_selector_list(selectors);
    if list.is_empty() {
      return Vec::new();
    }
    let mut candidates = Vec::new();
    self.descendants(scope, &mut candidates);
    candidates
      .into_iter()
      .filter(|id| self.element(*id).is_some_and(|el| list.iter().any(|c| c.matches(el))))
      .collect()
  }
}

impl HostDocument for MemoryDocument {
  type Node = NodeId;

  fn query_all(&self, selectors: &str) -> Vec<NodeId> {
    self.select_below(self.root, selectors)
  }

  fn query_first(&self, selectors: &str) -> Option<NodeId> {
    self.select_below(self.root, selectors).into_iter().next()
  }

  fn query_within(&self, scope: &NodeId, selectors: &str) -> Option<NodeId> {
    self.select_below(*scope, selectors).into_iter().next()
  }

  fn element_by_id(&self, id: &str) -> Option<NodeId> {
    let mut all = Vec::new();
    self.descendants(self.root, &mut all);
    all.into_iter().find(|n| self.element(*n).is_some_and(|el| el.id() == Some(id)))
  }

  fn text_content(&self, node: &NodeId) -> String {
    match &self.nodes[node.0].kind {
      NodeKind::Text(text) => text.clone(),
      NodeKind::Root | NodeKind::Element(_) => {
        self.nodes[node.0].children.iter().map(|c| self.text_content(c)).collect()
      }
    }
  }

  fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
    self.element(*node)?.attrs.get(name).cloned()
  }

  fn set_hidden(&mut self, node: &NodeId, hidden: bool) {
    if hidden {
      self.set_style(*node, "display", "none");
    } else {
      self.remove_style(*node, "display");
    }
  }

  fn is_hidden(&self, node: &NodeId) -> bool {
    self.style(*node, "display") == Some("none")
  }

  fn mount_control(&mut self, anchor: &NodeId, spec: &ControlSpec) -> Option<NodeId> {
    let container = self.create_element("div", &[("id", spec.id.as_str())]);
    if !self.insert_after(*anchor, container) {
      return None;
    }
    for (k, v) in &spec.container_style {
      self.set_style(container, k, v);
    }

    let input_attrs = [("type", "text"), ("placeholder", spec.placeholder.as_str())];
    let input = self.append_element(container, "input", &input_attrs);
    for (k, v) in &spec.input_style {
      self.set_style(input, k, v);
    }
    self.set_input_value(&input, &spec.value);

    for label in [&spec.filter_label, &spec.clear_label] {
      let button = self.append_element(container, "button", &[]);
      self.append_text(button, label);
      for (k, v) in &spec.button_style {
        self.set_style(button, k, v);
      }
    }
    Some(container)
  }

  fn input_value(&self, input: &NodeId) -> String {
    self.element(*input).map(|el| el.value.clone()).unwrap_or_default()
  }

  fn set_input_value(&mut self, input: &NodeId, value: &str) {
    if let Some(el) = self.element_mut(*input) {
      el.value = value.to_string();
    }
  }
}

// --- Channel page fixtures ---

/// The three item containers a channel tab renders videos with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemShape {
  /// `ytd-rich-item-renderer` (current grid layout).
  RichItem,
  /// `ytd-grid-video-renderer` (legacy grid).
  GridVideo,
  /// `ytd-video-renderer` (list / search layout).
  ListVideo,
}

impl ItemShape {
  pub fn tag(self) -> &'static str {
    match self {
      ItemShape::RichItem => "ytd-rich-item-renderer",
      ItemShape::GridVideo => "ytd-grid-video-renderer",
      ItemShape::ListVideo => "ytd-video-renderer",
    }
  }
}

impl MemoryDocument {
  /// Add a channel tab strip whose last tab is the control's anchor.
  /// Returns the strip element.
  pub fn add_tab_strip(&mut self, tabs: &[&str]) -> NodeId {
    let strip = self.append_element(self.root, "yt-tab-group-shape", &[]);
    for (i, label) in tabs.iter().enumerate() {
      let class = if i + 1 == tabs.len() {
        "yt-tab-shape-wiz__tab yt-tab-shape-wiz__tab--last-tab"
      } else {
        "yt-tab-shape-wiz__tab"
      };
      let tab = self.append_element(strip, "yt-tab-shape", &[("class", class)]);
      self.append_text(tab, label);
    }
    strip
  }

  /// Add an empty item grid under the root.
  pub fn add_item_grid(&mut self) -> NodeId {
    self.append_element(self.root, "ytd-rich-grid-renderer", &[("id", "contents")])
  }

  /// Add one video item rendered in `shape` with the given title.
  pub fn add_video(&mut self, parent: NodeId, shape: ItemShape, title: &str) -> NodeId {
    let item = self.append_element(parent, shape.tag(), &[]);
    let details = self.append_element(item, "div", &[("id", "details")]);
    match shape {
      ItemShape::RichItem => {
        let link = self.append_element(details, "a", &[("id", "video-title-link"), ("title", title)]);
        let text = self.append_element(link, "yt-formatted-string", &[("id", "video-title")]);
        self.append_text(text, title);
      }
      ItemShape::GridVideo | ItemShape::ListVideo => {
        let link = self.append_element(details, "a", &[("id", "video-title"), ("title", title)]);
        self.append_text(link, title);
      }
    }
    item
  }

  /// Number of mounted filter controls.
  pub fn control_count(&self) -> usize {
    self.query_all(&format!("#{}", constants().ui_id)).len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn compound_parses_tag_id_and_classes() {
    let c = Compound::parse("yt-tab-shape.yt-tab-shape-wiz__tab--last-tab").unwrap();
    assert_eq!(c.tag.as_deref(), Some("yt-tab-shape"));
    assert_eq!(c.classes, vec!["yt-tab-shape-wiz__tab--last-tab"]);

    let c = Compound::parse("a#video-title-link").unwrap();
    assert_eq!(c.tag.as_deref(), Some("a"));
    assert_eq!(c.id.as_deref(), Some("video-title-link"));

    let c = Compound::parse("#video-title").unwrap();
    assert_eq!(c.tag, None);
    assert_eq!(c.id.as_deref(), Some("video-title"));
  }

  #[test]
  fn combinators_are_rejected() {
    assert!(Compound::parse("div > a").is_none());
    assert!(Compound::parse("div a").is_none());
    assert!(Compound::parse("a.").is_none());
    assert!(parse_selector_list("div a, span").len() == 1);
  }

  #[test]
  fn query_all_is_document_order_across_selector_list() {
    let mut doc = MemoryDocument::new();
    let grid = doc.add_item_grid();
    let a = doc.add_video(grid, ItemShape::ListVideo, "a");
    let b = doc.add_video(grid, ItemShape::RichItem, "b");
    let c = doc.add_video(grid, ItemShape::GridVideo, "c");
    let found = doc.query_all("ytd-rich-item-renderer,ytd-grid-video-renderer,ytd-video-renderer");
    assert_eq!(found, vec![a, b, c]);
  }

  #[test]
  fn removed_subtree_is_not_queried() {
    let mut doc = MemoryDocument::new();
    let strip = doc.add_tab_strip(&["Home", "Videos"]);
    assert!(doc.query_first("yt-tab-shape.yt-tab-shape-wiz__tab--last-tab").is_some());
    doc.remove(strip);
    assert!(doc.query_first("yt-tab-shape.yt-tab-shape-wiz__tab--last-tab").is_none());
  }

  #[test]
  fn text_content_concatenates_descendants() {
    let mut doc = MemoryDocument::new();
    let p = doc.append_element(doc.root(), "p", &[]);
    doc.append_text(p, "Hello ");
    let b = doc.append_element(p, "b", &[]);
    doc.append_text(b, "world");
    assert_eq!(doc.text_content(&p), "Hello world");
  }

  #[test]
  fn hidden_toggles_inline_display() {
    let mut doc = MemoryDocument::new();
    let p = doc.append_element(doc.root(), "p", &[]);
    doc.set_style(p, "color", "red");
    doc.set_hidden(&p, true);
    assert!(doc.is_hidden(&p));
    doc.set_hidden(&p, false);
    assert!(!doc.is_hidden(&p));
    assert_eq!(doc.style(p, "display"), None);
    assert_eq!(doc.style(p, "color"), Some("red"));
  }

  #[test]
  fn last_tab_is_the_only_anchor() {
    let mut doc = MemoryDocument::new();
    doc.add_tab_strip(&["Home", "Videos", "Shorts"]);
    let anchors = doc.query_all("yt-tab-shape.yt-tab-shape-wiz__tab--last-tab");
    assert_eq!(anchors.len(), 1);
    assert_eq!(doc.text_content(&anchors[0]), "Shorts");
  }
}
