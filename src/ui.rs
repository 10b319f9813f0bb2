use tracing::{debug, info};

use crate::constants::constants;
use crate::dom::{ControlSpec, HostDocument};

/// Result of an attach attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
  /// The control already exists; nothing was done.
  AlreadyPresent,
  /// The last channel tab is not rendered yet; a later trigger will retry.
  AnchorMissing,
  /// A new control was inserted after the last tab.
  Attached,
}

/// Describe the control, pre-populated with the held query.
pub fn control_spec(held_query: &str) -> ControlSpec {
  let c = constants();
  ControlSpec {
    id: c.ui_id.clone(),
    placeholder: c.placeholder.clone(),
    value: held_query.to_string(),
    filter_label: c.filter_label.clone(),
    clear_label: c.clear_label.clone(),
    container_style: c.container_style.clone(),
    input_style: c.input_style.clone(),
    button_style: c.button_style.clone(),
  }
}

/// Insert the filter control after the last channel tab, at most once.
///
/// Never applies the filter itself: when the control is recreated after the
/// host re-rendered the tab strip, the caller decides whether to reapply.
pub fn attach_ui<D: HostDocument>(doc: &mut D, held_query: &str) -> AttachOutcome {
  let c = constants();
  if doc.element_by_id(&c.ui_id).is_some() {
    return AttachOutcome::AlreadyPresent;
  }
  let Some(anchor) = doc.query_first(&c.anchor_selector) else {
    debug!("ui: last tab not rendered yet");
    return AttachOutcome::AnchorMissing;
  };
  match doc.mount_control(&anchor, &control_spec(held_query)) {
    Some(_) => {
      info!(prefilled = !held_query.is_empty(), "ui: filter control attached");
      AttachOutcome::Attached
    }
    None => AttachOutcome::AnchorMissing,
  }
}

/// The control's text input, if the control is mounted.
pub fn control_input<D: HostDocument>(doc: &D) -> Option<D::Node> {
  let control = doc.element_by_id(&constants().ui_id)?;
  doc.query_within(&control, "input")
}
