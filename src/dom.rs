//! Host document abstraction.
//!
//! The filter never owns the page it runs on. Everything it needs from the
//! host (selector queries, text, inline styles, one injected control) goes
//! through [`HostDocument`], implemented by the browser backend and by the
//! in-memory document used for tests and the preview CLI.

/// What the user asked the injected control to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlAction {
  /// Filter button click or Enter in the input, carrying the raw input value.
  Submit(String),
  /// Clear button click.
  Clear,
}

/// Everything a backend needs to build the filter control.
#[derive(Debug, Clone)]
pub struct ControlSpec {
  pub id: String,
  pub placeholder: String,
  /// Initial input value (the held query, if any).
  pub value: String,
  pub filter_label: String,
  pub clear_label: String,
  pub container_style: Vec<(String, String)>,
  pub input_style: Vec<(String, String)>,
  pub button_style: Vec<(String, String)>,
}

pub trait HostDocument {
  /// Handle to an element owned by the host.
  type Node: Clone;

  /// All elements matching any of the comma-separated `selectors`, in document order.
  fn query_all(&self, selectors: &str) -> Vec<Self::Node>;

  /// First element matching `selectors`, in document order.
  fn query_first(&self, selectors: &str) -> Option<Self::Node>;

  /// First descendant of `scope` matching `selectors`.
  fn query_within(&self, scope: &Self::Node, selectors: &str) -> Option<Self::Node>;

  fn element_by_id(&self, id: &str) -> Option<Self::Node>;

  /// Concatenated text of the element and its descendants.
  fn text_content(&self, node: &Self::Node) -> String;

  fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

  /// Hide with inline `display: none`, or drop the inline `display` property.
  fn set_hidden(&mut self, node: &Self::Node, hidden: bool);

  fn is_hidden(&self, node: &Self::Node) -> bool;

  /// Build the control described by `spec` and insert it right after `anchor`.
  /// Returns the control's container element.
  fn mount_control(&mut self, anchor: &Self::Node, spec: &ControlSpec) -> Option<Self::Node>;

  /// Current value of a text input.
  fn input_value(&self, input: &Self::Node) -> String;

  fn set_input_value(&mut self, input: &Self::Node, value: &str);
}
