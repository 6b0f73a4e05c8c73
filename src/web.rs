//! Browser binding.
//!
//! Wires the core to the real page: [`WebDocument`] implements the document
//! context over `web_sys`, [`JsHost`] adapts the host view API handed in from
//! JavaScript, and [`SlidesRuntime`] performs the plugin's [`Action`]s by
//! registering a `MutationObserver`, a poll `Interval`, and DOM event
//! listeners. Every registration is kept so teardown can remove it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Interval;
use js_sys::Promise;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AddEventListenerOptions, CssStyleDeclaration, Document, Element, Event, EventTarget, HtmlElement,
    MouseEvent, MutationObserver, MutationObserverInit, WheelEvent,
};

use crate::consts::{
    NESTED_SLIDE_SELECTOR, PRESENTATION_ROOT_SELECTOR, READY_EVENT, SLIDE_CHANGED_EVENT,
    TOP_LEVEL_SLIDE_SELECTOR,
};
use crate::dom::{DocumentContext, StyleProperty};
use crate::error::Error;
use crate::geometry::{Point, Rect};
use crate::host::{DisplayMode, HostView, ModeChange, RequestId, SurfaceId};
use crate::input::{Button, Handled, WheelDelta};
use crate::plugin::{Action, SlidesPlugin};
use crate::settings::Settings;

fn dom_error(context: &str, err: &JsValue) -> Error {
    Error::Dom(format!("{context}: {err:?}"))
}

// =============================================================================
// DOCUMENT
// =============================================================================

pub struct WebDocument {
    document: Document,
}

impl WebDocument {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn body(&self) -> Result<HtmlElement, Error> {
        self.document
            .body()
            .ok_or_else(|| Error::Dom("document has no body".into()))
    }

    fn query_all(scope: &Element, selector: &str) -> Vec<Element> {
        match scope.query_selector_all(selector) {
            Ok(list) => (0..list.length())
                .filter_map(|i| list.item(i))
                .map(JsCast::unchecked_into::<Element>)
                .collect(),
            Err(e) => {
                debug!(selector, error = ?e, "selector query failed");
                Vec::new()
            }
        }
    }

    fn style_of(element: &Element) -> Result<CssStyleDeclaration, Error> {
        element
            .dyn_ref::<HtmlElement>()
            .map(HtmlElement::style)
            .ok_or_else(|| Error::Dom("element has no inline style".into()))
    }
}

impl DocumentContext for WebDocument {
    type Element = Element;

    fn presentation_root(&self) -> Option<Element> {
        match self.document.query_selector(PRESENTATION_ROOT_SELECTOR) {
            Ok(root) => root,
            Err(e) => {
                debug!(error = ?e, "presentation root query failed");
                None
            }
        }
    }

    fn top_level_slides(&self, root: &Element) -> Vec<Element> {
        Self::query_all(root, TOP_LEVEL_SLIDE_SELECTOR)
    }

    fn nested_slides(&self, slide: &Element) -> Vec<Element> {
        Self::query_all(slide, NESTED_SLIDE_SELECTOR)
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn bounding_rect(&self, element: &Element) -> Option<Rect> {
        let r = element.get_bounding_client_rect();
        Some(Rect::new(r.left(), r.top(), r.width(), r.height()))
    }

    fn set_style(&self, element: &Element, property: StyleProperty, value: &str) -> Result<(), Error> {
        Self::style_of(element)?
            .set_property(property.css_name(), value)
            .map_err(|e| dom_error(property.css_name(), &e))
    }

    fn clear_style(&self, element: &Element, property: StyleProperty) -> Result<(), Error> {
        Self::style_of(element)?
            .remove_property(property.css_name())
            .map(|_| ())
            .map_err(|e| dom_error(property.css_name(), &e))
    }

    fn set_body_class(&self, class: &str, enabled: bool) -> Result<(), Error> {
        self.body()?
            .class_list()
            .toggle_with_force(class, enabled)
            .map(|_| ())
            .map_err(|e| dom_error(class, &e))
    }

    fn set_body_property(&self, name: &str, value: &str) -> Result<(), Error> {
        self.body()?
            .style()
            .set_property(name, value)
            .map_err(|e| dom_error(name, &e))
    }
}

// =============================================================================
// HOST
// =============================================================================

#[wasm_bindgen]
extern "C" {
    /// Host view API supplied by the JavaScript side of the plugin.
    ///
    /// Surfaces are identified by the host's leaf id; modes are the host's
    /// mode strings (`source`, `preview`, `live`).
    pub type HostBridge;

    #[wasm_bindgen(method, js_name = activeSurface)]
    fn active_surface(this: &HostBridge) -> Option<String>;

    #[wasm_bindgen(method, js_name = hasSurface)]
    fn has_surface(this: &HostBridge, id: &str) -> bool;

    #[wasm_bindgen(method, catch, js_name = displayMode)]
    fn display_mode(this: &HostBridge, id: &str) -> Result<String, JsValue>;

    #[wasm_bindgen(method, catch, js_name = setDisplayMode)]
    fn set_display_mode(this: &HostBridge, id: &str, mode: &str) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, js_name = focusSurface)]
    fn focus_surface(this: &HostBridge, id: &str);
}

/// [`HostView`] over a [`HostBridge`]. Every mode change is asynchronous; the
/// promises are queued until the runtime picks them up.
pub struct JsHost {
    bridge: HostBridge,
    next_request: u64,
    pending: Vec<(RequestId, Promise)>,
}

impl JsHost {
    #[must_use]
    pub fn new(bridge: HostBridge) -> Self {
        Self { bridge, next_request: 0, pending: Vec::new() }
    }

    fn take_pending(&mut self) -> Vec<(RequestId, Promise)> {
        std::mem::take(&mut self.pending)
    }
}

impl HostView for JsHost {
    fn active_surface(&self) -> Option<SurfaceId> {
        self.bridge.active_surface().map(SurfaceId)
    }

    fn has_surface(&self, surface: &SurfaceId) -> bool {
        self.bridge.has_surface(&surface.0)
    }

    fn display_mode(&self, surface: &SurfaceId) -> Result<DisplayMode, Error> {
        self.bridge
            .display_mode(&surface.0)
            .map(|raw| DisplayMode::parse(&raw))
            .map_err(|e| Error::Host(format!("{e:?}")))
    }

    fn set_display_mode(&mut self, surface: &SurfaceId, mode: DisplayMode) -> Result<ModeChange, Error> {
        let promise = self
            .bridge
            .set_display_mode(&surface.0, mode.as_str())
            .map_err(|e| Error::Host(format!("{e:?}")))?;
        self.next_request += 1;
        let request = RequestId(self.next_request);
        self.pending.push((request, promise));
        Ok(ModeChange::Pending(request))
    }

    fn focus_surface(&mut self, surface: &SurfaceId) {
        self.bridge.focus_surface(&surface.0);
    }
}

// =============================================================================
// RUNTIME
// =============================================================================

type Plugin = SlidesPlugin<WebDocument, JsHost>;

struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

#[derive(Default)]
struct Bindings {
    observer: Option<(MutationObserver, Closure<dyn FnMut()>)>,
    poll: Option<Interval>,
    listeners: Vec<Listener>,
}

struct Inner {
    plugin: RefCell<Plugin>,
    bindings: RefCell<Bindings>,
}

impl Inner {
    /// Run a plugin call, then perform its actions and hand off host promises.
    fn dispatch(inner: &Rc<Inner>, call: impl FnOnce(&mut Plugin) -> Vec<Action>) {
        let actions = call(&mut inner.plugin.borrow_mut());
        Self::spawn_settlements(inner);
        for action in actions {
            Self::perform(inner, action);
        }
    }

    /// Forward an input event and suppress its default action if the plugin asks.
    fn input(weak: &Weak<Inner>, event: &Event, call: impl FnOnce(&mut Plugin, &Event) -> Handled) {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let handled = call(&mut inner.plugin.borrow_mut(), event);
        if handled.prevent_default {
            event.prevent_default();
        }
    }

    fn spawn_settlements(inner: &Rc<Inner>) {
        let pending = inner.plugin.borrow_mut().host_mut().take_pending();
        for (request, promise) in pending {
            let weak = Rc::downgrade(inner);
            wasm_bindgen_futures::spawn_local(async move {
                let result = JsFuture::from(promise)
                    .await
                    .map(|_| ())
                    .map_err(|e| Error::Host(format!("{e:?}")));
                if let Some(inner) = weak.upgrade() {
                    Inner::dispatch(&inner, |plugin| plugin.on_mode_change_settled(request, result));
                }
            });
        }
    }

    fn perform(inner: &Rc<Inner>, action: Action) {
        let result = match action {
            Action::ObserveMutations => Self::observe(inner),
            Action::DisconnectObserver => {
                if let Some((observer, _callback)) = inner.bindings.borrow_mut().observer.take() {
                    observer.disconnect();
                }
                Ok(())
            }
            Action::StartPolling { interval_ms } => {
                Self::start_polling(inner, interval_ms);
                Ok(())
            }
            Action::StopPolling => {
                inner.bindings.borrow_mut().poll = None;
                Ok(())
            }
            Action::AttachInputListeners => Self::attach_listeners(inner),
            Action::DetachInputListeners => {
                Self::detach_listeners(inner);
                Ok(())
            }
        };
        if let Err(e) = result {
            warn!(?action, error = %e, "binding action failed");
        }
    }

    fn observe(inner: &Rc<Inner>) -> Result<(), Error> {
        if inner.bindings.borrow().observer.is_some() {
            return Ok(());
        }
        let weak = Rc::downgrade(inner);
        let callback = Closure::<dyn FnMut()>::new(move || {
            if let Some(inner) = weak.upgrade() {
                Inner::dispatch(&inner, Plugin::on_mutation);
            }
        });
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| dom_error("MutationObserver", &e))?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        let body = inner.plugin.borrow().doc().body()?;
        observer
            .observe_with_options(&body, &init)
            .map_err(|e| dom_error("observe", &e))?;
        inner.bindings.borrow_mut().observer = Some((observer, callback));
        Ok(())
    }

    fn start_polling(inner: &Rc<Inner>, interval_ms: u32) {
        if inner.bindings.borrow().poll.is_some() {
            return;
        }
        let weak = Rc::downgrade(inner);
        let interval = Interval::new(interval_ms, move || {
            if let Some(inner) = weak.upgrade() {
                Inner::dispatch(&inner, Plugin::on_poll_tick);
            }
        });
        inner.bindings.borrow_mut().poll = Some(interval);
    }

    fn attach_listeners(inner: &Rc<Inner>) -> Result<(), Error> {
        Self::detach_listeners(inner);
        let root = inner
            .plugin
            .borrow()
            .controller()
            .root()
            .cloned()
            .ok_or_else(|| Error::Dom("no presentation root to listen on".into()))?;
        let window = web_sys::window().ok_or_else(|| Error::Dom("no window".into()))?;
        let root: EventTarget = root.into();
        let window: EventTarget = window.into();

        let weak = Rc::downgrade(inner);
        let listeners = vec![
            Self::listener(&root, "wheel", &weak, |plugin, event| {
                let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                    return Handled::IGNORED;
                };
                let pointer = Point::new(f64::from(wheel.client_x()), f64::from(wheel.client_y()));
                plugin.on_wheel(pointer, WheelDelta { dx: wheel.delta_x(), dy: wheel.delta_y() })
            }),
            Self::listener(&root, "mousedown", &weak, |plugin, event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return Handled::IGNORED;
                };
                let Some(button) = Button::from_dom(mouse.button()) else {
                    return Handled::IGNORED;
                };
                let pointer = Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y()));
                plugin.on_pointer_down(pointer, button)
            }),
            Self::listener(&root, "contextmenu", &weak, |plugin, _| plugin.on_context_menu()),
            Self::listener(&root, SLIDE_CHANGED_EVENT, &weak, |plugin, _| {
                plugin.on_slide_changed();
                Handled::IGNORED
            }),
            Self::listener(&root, READY_EVENT, &weak, |plugin, _| {
                plugin.on_slide_changed();
                Handled::IGNORED
            }),
            Self::listener(&window, "mousemove", &weak, |plugin, event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return Handled::IGNORED;
                };
                plugin.on_pointer_move(Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y())))
            }),
            Self::listener(&window, "mouseup", &weak, |plugin, _| plugin.on_pointer_up()),
        ];

        let mut bindings = inner.bindings.borrow_mut();
        let mut first_error = None;
        for listener in listeners {
            let registered = if listener.event == "wheel" {
                // Non-passive so the wheel can be consumed.
                let options = AddEventListenerOptions::new();
                options.set_passive(false);
                listener.target.add_event_listener_with_callback_and_add_event_listener_options(
                    listener.event,
                    listener.callback.as_ref().unchecked_ref(),
                    &options,
                )
            } else {
                listener
                    .target
                    .add_event_listener_with_callback(listener.event, listener.callback.as_ref().unchecked_ref())
            };
            match registered {
                Ok(()) => bindings.listeners.push(listener),
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(dom_error(listener.event, &e));
                    }
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn listener(
        target: &EventTarget,
        event: &'static str,
        weak: &Weak<Inner>,
        call: fn(&mut Plugin, &Event) -> Handled,
    ) -> Listener {
        let weak = weak.clone();
        let callback = Closure::<dyn FnMut(Event)>::new(move |e: Event| {
            Inner::input(&weak, &e, call);
        });
        Listener { target: target.clone(), event, callback }
    }

    fn detach_listeners(inner: &Rc<Inner>) {
        let listeners = std::mem::take(&mut inner.bindings.borrow_mut().listeners);
        for listener in listeners {
            if let Err(e) = listener
                .target
                .remove_event_listener_with_callback(listener.event, listener.callback.as_ref().unchecked_ref())
            {
                warn!(event = listener.event, error = ?e, "failed to remove listener");
            }
        }
    }
}

/// Plugin runtime exported to the JavaScript host.
#[wasm_bindgen]
pub struct SlidesRuntime {
    inner: Rc<Inner>,
}

#[wasm_bindgen]
impl SlidesRuntime {
    /// Build a runtime over the current document.
    ///
    /// `settings_json` is the plugin's stored data (`null` for defaults).
    ///
    /// # Errors
    ///
    /// Fails if there is no document or the settings are malformed.
    #[wasm_bindgen(constructor)]
    pub fn new(host: HostBridge, settings_json: &str) -> Result<SlidesRuntime, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let settings = Settings::from_json(settings_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let plugin = SlidesPlugin::new(WebDocument::new(document), JsHost::new(host), settings);
        Ok(Self {
            inner: Rc::new(Inner {
                plugin: RefCell::new(plugin),
                bindings: RefCell::new(Bindings::default()),
            }),
        })
    }

    pub fn load(&self) {
        Inner::dispatch(&self.inner, Plugin::load);
    }

    pub fn unload(&self) {
        Inner::dispatch(&self.inner, Plugin::unload);
    }

    /// Replace settings from stored JSON and reapply cosmetic styles.
    ///
    /// # Errors
    ///
    /// Fails if the settings are malformed; the previous settings stay in effect.
    #[wasm_bindgen(js_name = updateSettings)]
    pub fn update_settings(&self, settings_json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(settings_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.inner.plugin.borrow_mut().update_settings(settings);
        Ok(())
    }

    /// Whether presentation mode is currently active.
    #[wasm_bindgen(js_name = isPresenting)]
    #[must_use]
    pub fn is_presenting(&self) -> bool {
        self.inner.plugin.borrow().detector().is_active()
    }
}

impl Drop for SlidesRuntime {
    fn drop(&mut self) {
        let Ok(mut plugin) = self.inner.plugin.try_borrow_mut() else {
            return;
        };
        let actions = plugin.unload();
        drop(plugin);
        for action in actions {
            Inner::perform(&self.inner, action);
        }
    }
}
