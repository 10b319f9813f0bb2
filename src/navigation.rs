//! Navigation tracking for the single-page channel layout.
//!
//! The host keeps one document across channel tabs and fires navigation
//! signals for both real tab switches and its own bookkeeping. Only a change
//! of the location key counts as navigation; anything else is in-page content
//! growth such as infinite scroll.

/// Comparison key for a location: path, query string and fragment.
pub fn location_key(pathname: &str, search: &str, hash: &str) -> String {
  format!("{pathname}{search}{hash}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationChange {
  /// Same key as last time: content changed in place, keep the query.
  SamePage,
  /// Key changed: the user moved to another tab or page.
  Navigated,
}

#[derive(Debug, Clone)]
pub struct NavigationTracker {
  last_key: String,
}

impl NavigationTracker {
  /// Start tracking from the location the script booted on.
  pub fn new(initial_key: impl Into<String>) -> Self {
    Self { last_key: initial_key.into() }
  }

  pub fn last_key(&self) -> &str {
    &self.last_key
  }

  /// Classify a navigation signal and remember the new key.
  pub fn observe(&mut self, key: &str) -> NavigationChange {
    if key == self.last_key {
      return NavigationChange::SamePage;
    }
    self.last_key = key.to_string();
    NavigationChange::Navigated
  }
}
