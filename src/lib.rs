//! Title filter for YouTube channel tabs.
//!
//! Injects a small filter box after the last channel tab and hides video
//! items whose titles do not contain every typed token. The same controller
//! drives the live page (the `web` backend, built for `wasm32`) and the
//! in-memory document used by the preview CLI and tests.

pub mod constants;
pub mod controller;
pub mod dom;
pub mod filter;
pub mod logging;
pub mod matcher;
pub mod memory;
pub mod navigation;
pub mod title;
pub mod ui;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use controller::{Deferred, DeferredReason, FilterController, FilterState};
pub use dom::{ControlAction, ControlSpec, HostDocument};
pub use filter::{FilterSummary, apply_filter};
pub use matcher::matches;
pub use memory::{ItemShape, MemoryDocument};
pub use ui::{AttachOutcome, attach_ui};
