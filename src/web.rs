//! Browser backend: the live YouTube page as a [`HostDocument`], plus the
//! `wasm-bindgen` entry point that wires page signals to the controller.
//!
//! Only compiled on `wasm32` targets.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use anyhow::{Context, Result, anyhow};
use js_sys::{Function, Reflect};
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
  Document, Element, Event, HtmlElement, HtmlInputElement, KeyboardEvent, MutationObserver, MutationObserverInit,
  Window,
};

use crate::constants::constants;
use crate::controller::{Deferred, FilterController};
use crate::dom::{ControlAction, ControlSpec, HostDocument};
use crate::logging;
use crate::navigation::location_key;

/// The page's controller, shared by every callback the backend installs.
pub type SharedController = Rc<RefCell<FilterController<WebDocument>>>;
type Dispatch = Rc<dyn Fn(ControlAction)>;
type Listener = Closure<dyn FnMut(Event)>;

fn js_err(value: JsValue) -> anyhow::Error {
  anyhow!("{value:?}")
}

// --- Host document ---

pub struct WebDocument {
  document: Document,
  dispatch: Option<Dispatch>,
  /// Listeners of the currently mounted control. Replaced on remount; the
  /// previous control has been removed by the host by then.
  listeners: Vec<Listener>,
}

impl WebDocument {
  pub fn new(document: Document) -> Self {
    Self { document, dispatch: None, listeners: Vec::new() }
  }

  /// Where the control sends user actions.
  pub fn set_dispatch(&mut self, dispatch: Dispatch) {
    self.dispatch = Some(dispatch);
  }

  fn create(&self, tag: &str, style: &[(String, String)]) -> Result<HtmlElement> {
    let el = self
      .document
      .create_element(tag)
      .map_err(js_err)?
      .dyn_into::<HtmlElement>()
      .map_err(|_| anyhow!("<{tag}> is not an HtmlElement"))?;
    let css = el.style();
    for (k, v) in style {
      css.set_property(k, v).map_err(js_err)?;
    }
    Ok(el)
  }

  fn listen(target: &HtmlElement, event: &str, handler: impl FnMut(Event) + 'static) -> Result<Listener> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()).map_err(js_err)?;
    Ok(closure)
  }

  fn bind_control(
    dispatch: Dispatch,
    input: &HtmlInputElement,
    filter_btn: &HtmlElement,
    clear_btn: &HtmlElement,
  ) -> Result<Vec<Listener>> {
    let (d, i) = (dispatch.clone(), input.clone());
    let submit = Self::listen(filter_btn, "click", move |_| d(ControlAction::Submit(i.value())))?;

    let (d, i) = (dispatch.clone(), input.clone());
    let enter = Self::listen(input, "keydown", move |event| {
      if event.dyn_ref::<KeyboardEvent>().is_some_and(|k| k.key() == "Enter") {
        d(ControlAction::Submit(i.value()));
      }
    })?;

    let clear = Self::listen(clear_btn, "click", move |_| dispatch(ControlAction::Clear))?;
    Ok(vec![submit, enter, clear])
  }

  /// Build the control detached, bind its listeners, then insert it after `anchor`.
  ///
  /// Nothing reaches the page unless every step succeeds.
  fn build_control(&mut self, anchor: &Element, spec: &ControlSpec) -> Result<Element> {
    let container = self.create("div", &spec.container_style)?;
    container.set_id(&spec.id);

    let input = self
      .create("input", &spec.input_style)?
      .dyn_into::<HtmlInputElement>()
      .map_err(|_| anyhow!("<input> is not an HtmlInputElement"))?;
    input.set_type("text");
    input.set_placeholder(&spec.placeholder);
    input.set_value(&spec.value);

    let filter_btn = self.create("button", &spec.button_style)?;
    filter_btn.set_text_content(Some(&spec.filter_label));
    let clear_btn = self.create("button", &spec.button_style)?;
    clear_btn.set_text_content(Some(&spec.clear_label));

    container.append_child(&input).map_err(js_err)?;
    container.append_child(&filter_btn).map_err(js_err)?;
    container.append_child(&clear_btn).map_err(js_err)?;

    let listeners = match self.dispatch.clone() {
      Some(dispatch) => Self::bind_control(dispatch, &input, &filter_btn, &clear_btn)?,
      None => {
        warn!("web: control mounted without a dispatcher");
        Vec::new()
      }
    };

    anchor
      .insert_adjacent_element("afterend", &container)
      .map_err(js_err)?
      .ok_or_else(|| anyhow!("tab anchor is detached"))?;
    self.listeners = listeners;
    Ok(container.into())
  }
}

impl HostDocument for WebDocument {
  type Node = Element;

  fn query_all(&self, selectors: &str) -> Vec<Element> {
    let list = match self.document.query_selector_all(selectors) {
      Ok(list) => list,
      Err(e) => {
        warn!(selectors, err = ?e, "web: selector query failed");
        return Vec::new();
      }
    };
    (0..list.length()).filter_map(|i| list.get(i)).filter_map(|n| n.dyn_into::<Element>().ok()).collect()
  }

  fn query_first(&self, selectors: &str) -> Option<Element> {
    self.document.query_selector(selectors).ok().flatten()
  }

  fn query_within(&self, scope: &Element, selectors: &str) -> Option<Element> {
    scope.query_selector(selectors).ok().flatten()
  }

  fn element_by_id(&self, id: &str) -> Option<Element> {
    self.document.get_element_by_id(id)
  }

  fn text_content(&self, node: &Element) -> String {
    node.text_content().unwrap_or_default()
  }

  fn attribute(&self, node: &Element, name: &str) -> Option<String> {
    node.get_attribute(name)
  }

  fn set_hidden(&mut self, node: &Element, hidden: bool) {
    let Some(el) = node.dyn_ref::<HtmlElement>() else { return };
    let style = el.style();
    let result =
      if hidden { style.set_property("display", "none") } else { style.remove_property("display").map(|_| ()) };
    if let Err(e) = result {
      debug!(err = ?e, "web: failed to toggle item display");
    }
  }

  fn is_hidden(&self, node: &Element) -> bool {
    node
      .dyn_ref::<HtmlElement>()
      .and_then(|el| el.style().get_property_value("display").ok())
      .is_some_and(|d| d == "none")
  }

  fn mount_control(&mut self, anchor: &Element, spec: &ControlSpec) -> Option<Element> {
    match self.build_control(anchor, spec) {
      Ok(container) => Some(container),
      Err(e) => {
        warn!(err = %format!("{e:#}"), "web: failed to mount filter control");
        None
      }
    }
  }

  fn input_value(&self, input: &Element) -> String {
    input.dyn_ref::<HtmlInputElement>().map(HtmlInputElement::value).unwrap_or_default()
  }

  fn set_input_value(&mut self, input: &Element, value: &str) {
    if let Some(input) = input.dyn_ref::<HtmlInputElement>() {
      input.set_value(value);
    }
  }
}

// --- Driving the controller ---

/// Run `f` on the controller unless it is already borrowed by an outer callback.
fn with_controller(
  weak: &Weak<RefCell<FilterController<WebDocument>>>,
  f: impl FnOnce(&mut FilterController<WebDocument>),
) {
  let Some(shared) = weak.upgrade() else { return };
  match shared.try_borrow_mut() {
    Ok(mut controller) => f(&mut controller),
    Err(_) => debug!("web: controller busy, skipping pass"),
  };
}

fn current_location_key(window: &Window) -> String {
  let location = window.location();
  location_key(
    &location.pathname().unwrap_or_default(),
    &location.search().unwrap_or_default(),
    &location.hash().unwrap_or_default(),
  )
}

fn schedule(window: &Window, shared: &SharedController, deferred: Deferred) -> Result<()> {
  let weak = Rc::downgrade(shared);
  let callback = Closure::once_into_js(move || with_controller(&weak, |c| {
    c.run_deferred(deferred);
  }));
  let millis = i32::try_from(deferred.delay.as_millis()).unwrap_or(i32::MAX);
  window
    .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
    .map_err(js_err)
    .context("Failed to schedule deferred reconcile")?;
  Ok(())
}

/// Re-run the controller on every child-list mutation batch under `body`.
fn watch_mutations(body: &HtmlElement, shared: &SharedController) -> Result<()> {
  let weak = Rc::downgrade(shared);
  let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(move |_records, _observer| {
    with_controller(&weak, |c| {
      c.reconcile();
    });
  });
  let observer = MutationObserver::new(callback.as_ref().unchecked_ref()).map_err(js_err)?;
  let init = MutationObserverInit::new();
  init.set_child_list(true);
  init.set_subtree(true);
  observer.observe_with_options(body, &init).map_err(js_err).context("Failed to observe document body")?;
  callback.forget();
  Ok(())
}

/// Every source of "the location may have changed", coalesced into one callback.
///
/// Covers the host's navigation-finished event, back/forward, and programmatic
/// `history.pushState` / `history.replaceState`, which are wrapped so that they
/// notify after delegating to the original method.
struct NavigationSignals;

impl NavigationSignals {
  fn install(window: &Window, on_change: Rc<dyn Fn()>) -> Result<()> {
    let document = window.document().context("window has no document")?;

    let notify = on_change.clone();
    let finished = Closure::<dyn FnMut(Event)>::new(move |_| notify());
    document
      .add_event_listener_with_callback(&constants().navigate_finish_event, finished.as_ref().unchecked_ref())
      .map_err(js_err)?;
    finished.forget();

    let notify = on_change.clone();
    let popstate = Closure::<dyn FnMut(Event)>::new(move |_| notify());
    window.add_event_listener_with_callback("popstate", popstate.as_ref().unchecked_ref()).map_err(js_err)?;
    popstate.forget();

    let history: JsValue = window.history().map_err(js_err)?.into();
    for method in ["pushState", "replaceState"] {
      Self::wrap_history_method(&history, method, on_change.clone())
        .with_context(|| format!("Failed to wrap history.{method}"))?;
    }
    Ok(())
  }

  fn wrap_history_method(history: &JsValue, method: &str, notify: Rc<dyn Fn()>) -> Result<()> {
    let original = Reflect::get(history, &JsValue::from_str(method))
      .map_err(js_err)?
      .dyn_into::<Function>()
      .map_err(|_| anyhow!("history.{method} is not a function"))?;
    let target = history.clone();
    let wrapper = Closure::<dyn FnMut(JsValue, JsValue, JsValue) -> Result<JsValue, JsValue>>::new(
      move |state: JsValue, title: JsValue, url: JsValue| {
        let result = original.call3(&target, &state, &title, &url);
        notify();
        result
      },
    );
    Reflect::set(history, &JsValue::from_str(method), wrapper.as_ref()).map_err(js_err)?;
    wrapper.forget();
    Ok(())
  }
}

/// Attach the filter to `window`'s page and wire every page signal to it.
///
/// Callbacks hold weak references; the page stays filtered for as long as the
/// returned controller is alive.
pub fn install(window: &Window) -> Result<SharedController> {
  let document = window.document().context("window has no document")?;
  let body = document.body().context("document has no body")?;

  let key = current_location_key(window);
  let shared: SharedController = Rc::new(RefCell::new(FilterController::new(WebDocument::new(document), key)));

  let weak = Rc::downgrade(&shared);
  let dispatch: Dispatch = Rc::new(move |action| {
    with_controller(&weak, |c| {
      c.handle(action);
    });
  });
  shared.borrow_mut().document_mut().set_dispatch(dispatch);

  let first = shared.borrow_mut().boot();
  schedule(window, &shared, first)?;
  watch_mutations(&body, &shared)?;

  let weak = Rc::downgrade(&shared);
  let nav_window = window.clone();
  let on_change: Rc<dyn Fn()> = Rc::new(move || {
    let key = current_location_key(&nav_window);
    let Some(shared) = weak.upgrade() else { return };
    let deferred = match shared.try_borrow_mut() {
      Ok(mut controller) => controller.on_location_changed(&key),
      Err(_) => {
        debug!(key = %key, "web: controller busy, navigation signal skipped");
        return;
      }
    };
    if let Some(deferred) = deferred
      && let Err(e) = schedule(&nav_window, &shared, deferred)
    {
      warn!(err = %format!("{e:#}"), "web: navigation reattach not scheduled");
    }
  });
  NavigationSignals::install(window, on_change)?;

  info!("web: channel tab filter running");
  Ok(shared)
}

fn boot() -> Result<()> {
  let window = web_sys::window().context("no global window")?;
  let host = window.location().hostname().map_err(js_err)?;
  if !host.ends_with("youtube.com") {
    info!(host = %host, "web: not a YouTube page, staying idle");
    return Ok(());
  }
  let shared = install(&window)?;
  // Lives for the lifetime of the page.
  std::mem::forget(shared);
  Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
  console_error_panic_hook::set_once();
  logging::init_console();
  if let Err(e) = boot() {
    warn!(err = %format!("{e:#}"), "web: boot failed");
  }
  Ok(())
}
