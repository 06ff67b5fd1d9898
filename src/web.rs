//! Browser adapter
//!
//! Wires the tracker to the page: injects the back button, listens for
//! `hashchange`, anchor clicks and `popstate`, and applies the hash returned
//! by [`HashNavigationTracker::go_back`] to the location and scroll position.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{
    Element, Event, EventTarget, HashChangeEvent, HtmlAnchorElement,
    HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollToOptions,
};

use crate::nav::{Hash, HashNavigationTracker, Observation, extract_hash};
use crate::settings::{LocationUpdate, ScrollMode, Settings};

/// Selector for links pointing inside the page
const IN_PAGE_LINK_SELECTOR: &str = "a[href^=\"#\"]";

const BUTTON_CSS: &str = "position: fixed; top: 20px; right: 20px; z-index: 1000; \
     padding: 8px 16px; background: #007cba; color: white; border: none; \
     border-radius: 4px; cursor: pointer; font-size: 14px; display: none; \
     box-shadow: 0 2px 4px rgba(0,0,0,0.2);";

thread_local! {
    /// Instance mounted by [`install`]
    static INSTALLED: RefCell<Option<AnchorBackNavigation>> = const { RefCell::new(None) };
}

/// An attached DOM listener, detached again when dropped
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        // The closure dies with us, so the page must stop calling it
        let callback: &js_sys::Function = self.closure.as_ref().unchecked_ref();
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, callback);
    }
}

/// Back navigation for in-page anchor links
#[wasm_bindgen]
pub struct AnchorBackNavigation {
    settings: Settings,
    tracker: Rc<RefCell<HashNavigationTracker>>,
    button: Option<HtmlElement>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl AnchorBackNavigation {
    /// Create an instance using the page's settings
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_settings(Settings::load())
    }

    /// Inject the button, start listening, and seed from the current hash
    pub fn init(&mut self) -> Result<(), JsValue> {
        if !self.listeners.is_empty() {
            log::warn!("Back navigation already initialized, restarting");
            self.destroy();
        }

        let result = self.attach_to_page();
        if result.is_err() {
            // Don't leave a half-wired button behind
            self.destroy();
        }
        result
    }

    /// Remove the button and listeners and forget all history
    pub fn destroy(&mut self) {
        self.listeners.clear();
        if let Some(button) = self.button.take() {
            button.remove();
        }
        self.tracker.borrow_mut().teardown();
    }

    /// Go back one anchor navigation, returning the restored hash
    #[wasm_bindgen(js_name = goBack)]
    pub fn go_back(&self) -> Option<String> {
        restore_previous(&self.tracker, &self.settings).map(String::from)
    }

    #[wasm_bindgen(js_name = canGoBack)]
    pub fn can_go_back(&self) -> bool {
        self.tracker.borrow().can_go_back()
    }
}

impl Drop for AnchorBackNavigation {
    fn drop(&mut self) {
        // Covers JS `.free()` without `destroy()`
        if let Some(button) = self.button.take() {
            button.remove();
        }
    }
}

impl Default for AnchorBackNavigation {
    fn default() -> Self {
        Self::new()
    }
}

impl AnchorBackNavigation {
    pub fn with_settings(settings: Settings) -> Self {
        let tracker = HashNavigationTracker::new(settings.max_entries);
        Self {
            settings,
            tracker: Rc::new(RefCell::new(tracker)),
            button: None,
            listeners: Vec::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn attach_to_page(&mut self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let button = self.create_button(&document)?;
        {
            let button = button.clone();
            self.tracker
                .borrow_mut()
                .set_listener(move |visible: bool| set_button_visible(&button, visible));
        }
        self.button = Some(button);

        self.setup_listeners(&window, &document)?;

        let initial = Hash::new(window.location().hash()?);
        self.tracker.borrow_mut().initialize(&initial);
        Ok(())
    }

    fn create_button(&self, document: &web_sys::Document) -> Result<HtmlElement, JsValue> {
        let button: HtmlElement = document.create_element("button")?.dyn_into()?;
        button.set_id(&self.settings.button_id);
        button.set_text_content(Some(&self.settings.button_label));
        button.set_attribute("type", "button")?;
        button.style().set_css_text(BUTTON_CSS);

        let body = document.body().ok_or_else(|| JsValue::from_str("no body"))?;
        body.append_child(&button)?;
        Ok(button)
    }

    fn setup_listeners(
        &mut self,
        window: &web_sys::Window,
        document: &web_sys::Document,
    ) -> Result<(), JsValue> {
        // Back button
        if let Some(button) = &self.button {
            let tracker = self.tracker.clone();
            let settings = self.settings.clone();
            self.listeners.push(Listener::attach(button, "click", move |_event| {
                restore_previous(&tracker, &settings);
            })?);
        }

        // Hash changes (address bar edits, link activation, our own set_hash)
        {
            let tracker = self.tracker.clone();
            self.listeners
                .push(Listener::attach(window, "hashchange", move |event| {
                    let Some(event) = event.dyn_ref::<HashChangeEvent>() else {
                        return;
                    };
                    let from = extract_hash(&event.old_url());
                    let to = extract_hash(&event.new_url());
                    if from != to {
                        tracker.borrow_mut().record_navigation(&from, &to);
                    }
                })?);
        }

        // Anchor clicks, delegated from the document so late-added links count
        {
            let tracker = self.tracker.clone();
            self.listeners.push(Listener::attach(document, "click", move |event| {
                if event.default_prevented() {
                    return;
                }
                let Some(anchor) = clicked_in_page_link(&event) else {
                    return;
                };
                let to = Hash::new(anchor.hash());
                if to.is_top() {
                    return;
                }
                let from = current_hash();
                let outcome = tracker.borrow_mut().record_navigation(&from, &to);
                if outcome == Observation::Recorded {
                    log::debug!("Anchor click recorded: {}", to);
                }
            })?);
        }

        // Browser back/forward is left to the browser
        self.listeners
            .push(Listener::attach(window, "popstate", move |_event| {
                log::debug!("popstate: browser history navigation to {}", current_hash());
            })?);

        Ok(())
    }
}

/// Install a page-wide instance once the DOM is ready
pub fn install(settings: Settings) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() == "loading" {
        let closure = Closure::once(move || {
            if let Err(e) = mount(settings) {
                log::error!("Failed to start back navigation: {:?}", e);
            }
        });
        document.add_event_listener_with_callback(
            "DOMContentLoaded",
            closure.as_ref().unchecked_ref(),
        )?;
        closure.forget();
        Ok(())
    } else {
        mount(settings)
    }
}

/// Tear down the instance created by [`install`]
#[wasm_bindgen]
pub fn uninstall() {
    if let Some(mut nav) = INSTALLED.with(|slot| slot.borrow_mut().take()) {
        nav.destroy();
    }
}

fn mount(settings: Settings) -> Result<(), JsValue> {
    uninstall();
    let mut nav = AnchorBackNavigation::with_settings(settings);
    nav.init()?;
    log::info!(
        "Back navigation installed (restore via {}, keep {} entries)",
        nav.settings().location_update.as_str(),
        nav.settings().max_entries
    );
    INSTALLED.with(|slot| *slot.borrow_mut() = Some(nav));
    Ok(())
}

/// Step the tracker back and apply the result to the page
fn restore_previous(tracker: &RefCell<HashNavigationTracker>, settings: &Settings) -> Option<Hash> {
    let target = {
        let mut tracker = tracker.borrow_mut();
        let target = tracker.go_back()?;
        if settings.location_update.fires_hashchange() {
            tracker.expect_programmatic(target.clone());
        }
        target
    };

    if let Err(e) = update_location(&target, settings.location_update) {
        log::warn!("Failed to update location to {}: {:?}", target, e);
    }
    scroll_to(&target, settings.scroll);
    Some(target)
}

fn update_location(target: &Hash, mode: LocationUpdate) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let location = window.location();
    match mode {
        LocationUpdate::ReplaceState => {
            let url = if target.is_top() {
                format!("{}{}", location.pathname()?, location.search()?)
            } else {
                target.as_str().to_string()
            };
            window
                .history()?
                .replace_state_with_url(&JsValue::NULL, "", Some(&url))
        }
        LocationUpdate::SetHash => location.set_hash(target.as_str()),
    }
}

fn scroll_to(target: &Hash, mode: ScrollMode) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let behavior = match mode {
        ScrollMode::Smooth => ScrollBehavior::Smooth,
        ScrollMode::Instant => ScrollBehavior::Instant,
    };

    if target.is_top() {
        let opts = ScrollToOptions::new();
        opts.set_top(0.0);
        opts.set_behavior(behavior);
        window.scroll_to_with_scroll_to_options(&opts);
        return;
    }

    let element = window.document().and_then(|d| {
        d.get_element_by_id(&element_id(target))
            .or_else(|| d.get_element_by_id(target.fragment()))
    });
    match element {
        Some(el) => {
            let opts = ScrollIntoViewOptions::new();
            opts.set_behavior(behavior);
            el.scroll_into_view_with_scroll_into_view_options(&opts);
        }
        None => log::warn!("No element for {}, leaving scroll position alone", target),
    }
}

/// Element id for a hash; location and anchor hashes come percent-encoded
fn element_id(target: &Hash) -> String {
    js_sys::decode_uri_component(target.fragment())
        .map(String::from)
        .unwrap_or_else(|_| target.fragment().to_string())
}

fn set_button_visible(button: &HtmlElement, visible: bool) {
    let display = if visible { "block" } else { "none" };
    let _ = button.style().set_property("display", display);
}

fn current_hash() -> Hash {
    web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .map(Hash::new)
        .unwrap_or_default()
}

/// The in-page link the click landed in, if any
fn clicked_in_page_link(event: &Event) -> Option<HtmlAnchorElement> {
    let target: Element = event.target()?.dyn_into().ok()?;
    target
        .closest(IN_PAGE_LINK_SELECTOR)
        .ok()
        .flatten()?
        .dyn_into()
        .ok()
}
