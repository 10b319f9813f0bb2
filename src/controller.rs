use std::time::Duration;

use tracing::{debug, info};

use crate::constants::constants;
use crate::dom::{ControlAction, HostDocument};
use crate::filter::{FilterSummary, apply_filter};
use crate::navigation::{NavigationChange, NavigationTracker};
use crate::ui::{AttachOutcome, attach_ui, control_input};

/// Why a reconcile was deferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredReason {
  /// Start-up retry for tab strips that render after the script runs.
  BootRetry,
  /// The host re-renders its tabs asynchronously after navigating.
  NavigationReattach,
}

/// A one-shot reconcile the backend should run after `delay`.
///
/// Deferred work cannot be cancelled; a stale fire is harmless because
/// [`FilterController::reconcile`] is idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferred {
  pub delay: Duration,
  pub reason: DeferredReason,
}

/// The held query and the last observed location.
#[derive(Debug, Clone)]
pub struct FilterState {
  pub query: String,
  pub tracker: NavigationTracker,
}

impl FilterState {
  pub fn new(location_key: impl Into<String>) -> Self {
    Self { query: String::new(), tracker: NavigationTracker::new(location_key) }
  }

  pub fn has_query(&self) -> bool {
    !self.query.is_empty()
  }
}

/// Keeps the filter control and item visibility in sync with the host page.
///
/// One controller exists per page attach. Every trigger (mutation batch,
/// navigation signal, timer, user action) funnels through its methods, and
/// the last write to the query wins.
pub struct FilterController<D: HostDocument> {
  doc: D,
  state: FilterState,
}

impl<D: HostDocument> FilterController<D> {
  pub fn new(doc: D, location_key: impl Into<String>) -> Self {
    Self { doc, state: FilterState::new(location_key) }
  }

  pub fn query(&self) -> &str {
    &self.state.query
  }

  pub fn document(&self) -> &D {
    &self.doc
  }

  pub fn document_mut(&mut self) -> &mut D {
    &mut self.doc
  }

  /// First reconcile after the script starts, plus the one-shot boot retry.
  pub fn boot(&mut self) -> Deferred {
    let outcome = self.reconcile();
    info!(?outcome, location = self.state.tracker.last_key(), "controller: booted");
    Deferred { delay: constants().boot_retry(), reason: DeferredReason::BootRetry }
  }

  /// Attach the control if needed and reapply a held query.
  ///
  /// Safe to call from any trigger, any number of times.
  pub fn reconcile(&mut self) -> AttachOutcome {
    let outcome = attach_ui(&mut self.doc, &self.state.query);
    if self.state.has_query() {
      apply_filter(&mut self.doc, &self.state.query);
    }
    outcome
  }

  /// Handle a navigation signal for the location `key`.
  ///
  /// A repeated key is in-page content growth and only re-syncs. A new key
  /// resets the query, clears the input, unhides every item and asks for a
  /// delayed reattach.
  pub fn on_location_changed(&mut self, key: &str) -> Option<Deferred> {
    match self.state.tracker.observe(key) {
      NavigationChange::SamePage => {
        debug!(key, "controller: same location, re-syncing");
        self.reconcile();
        None
      }
      NavigationChange::Navigated => {
        info!(key, had_query = self.state.has_query(), "controller: navigated, resetting filter");
        self.state.query.clear();
        self.set_input("");
        apply_filter(&mut self.doc, "");
        Some(Deferred { delay: constants().navigation_reattach(), reason: DeferredReason::NavigationReattach })
      }
    }
  }

  /// Run a deferred reconcile once its delay has elapsed.
  pub fn run_deferred(&mut self, deferred: Deferred) -> AttachOutcome {
    let outcome = self.reconcile();
    debug!(reason = ?deferred.reason, ?outcome, "controller: deferred reconcile");
    outcome
  }

  /// Route a user action from the control.
  pub fn handle(&mut self, action: ControlAction) -> FilterSummary {
    match action {
      ControlAction::Submit(raw) => self.submit(&raw),
      ControlAction::Clear => self.clear(),
    }
  }

  /// Commit the trimmed input value as the query and apply it.
  pub fn submit(&mut self, raw: &str) -> FilterSummary {
    self.state.query = raw.trim().to_string();
    let summary = apply_filter(&mut self.doc, &self.state.query);
    info!(query = %self.state.query, shown = summary.shown, hidden = summary.hidden, "controller: filter submitted");
    summary
  }

  /// Drop the query, empty the input and unhide everything.
  pub fn clear(&mut self) -> FilterSummary {
    self.state.query.clear();
    self.set_input("");
    let summary = apply_filter(&mut self.doc, "");
    info!(shown = summary.shown, "controller: filter cleared");
    summary
  }

  fn set_input(&mut self, value: &str) {
    if let Some(input) = control_input(&self.doc) {
      self.doc.set_input_value(&input, value);
    }
  }
}
