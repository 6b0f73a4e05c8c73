//! Viewport transform controller: pointer/wheel pan and zoom for the visible slide.
//!
//! The controller is armed when presentation mode is entered and disarmed
//! when it is left. While armed it tracks one [`ViewportTransform`] bound to
//! the slide currently on screen and writes it to that slide's standalone
//! `translate`/`scale` properties. The transform is volatile: every slide
//! change, engine-ready event, reset gesture and disarm returns it to identity.
//!
//! Handlers never fail. Missing elements or refused style writes turn an
//! event into a no-op frame.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use tracing::{debug, info, warn};

use crate::consts::{PANNING_CLASS, PRESENT_CLASS, TRANSFORM_ORIGIN_CENTER};
use crate::dom::{DocumentContext, StyleProperty};
use crate::geometry::Point;
use crate::input::{Button, Handled, InputFlags, PointerState, WheelDelta};
use crate::transform::ViewportTransform;

/// Resolve the slide currently on screen.
///
/// Prefers the top-level slide marked present, falling back to the first
/// top-level slide before the engine has marked one. If the chosen slide
/// holds a present nested slide, that one wins.
pub fn resolve_current_slide<D: DocumentContext>(doc: &D, root: &D::Element) -> Option<D::Element> {
    let top_level = doc.top_level_slides(root);
    let current = top_level
        .iter()
        .find(|slide| doc.has_class(slide, PRESENT_CLASS))
        .or_else(|| top_level.first())?
        .clone();
    let nested = doc
        .nested_slides(&current)
        .into_iter()
        .find(|slide| doc.has_class(slide, PRESENT_CLASS));
    Some(nested.unwrap_or(current))
}

#[derive(Debug)]
struct Armed<E> {
    root: E,
    slide: Option<E>,
}

#[derive(Debug)]
pub struct ViewportController<E> {
    armed: Option<Armed<E>>,
    transform: ViewportTransform,
    pointer: PointerState,
}

impl<E> Default for ViewportController<E> {
    fn default() -> Self {
        Self {
            armed: None,
            transform: ViewportTransform::default(),
            pointer: PointerState::Idle,
        }
    }
}

impl<E: Clone + PartialEq + std::fmt::Debug> ViewportController<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    #[must_use]
    pub fn transform(&self) -> ViewportTransform {
        self.transform
    }

    #[must_use]
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// The slide the transform is bound to.
    #[must_use]
    pub fn slide(&self) -> Option<&E> {
        self.armed.as_ref().and_then(|armed| armed.slide.as_ref())
    }

    /// The presentation root the controller is listening on.
    #[must_use]
    pub fn root(&self) -> Option<&E> {
        self.armed.as_ref().map(|armed| &armed.root)
    }

    // --- Lifecycle ---

    /// Bind to the presentation root. Returns `false` if there is none.
    ///
    /// Arming an armed controller is a no-op that returns `true`.
    pub fn arm<D>(&mut self, doc: &D) -> bool
    where
        D: DocumentContext<Element = E>,
    {
        if self.is_armed() {
            return true;
        }
        let Some(root) = doc.presentation_root() else {
            debug!("no presentation root; controller stays disarmed");
            return false;
        };
        let slide = resolve_current_slide(doc, &root);
        self.transform.reset();
        self.pointer = PointerState::Idle;
        info!(has_slide = slide.is_some(), "viewport controller armed");
        self.armed = Some(Armed { root, slide });
        true
    }

    /// Reset and release the slide and root. No-op when already disarmed.
    pub fn disarm<D>(&mut self, doc: &D)
    where
        D: DocumentContext<Element = E>,
    {
        if !self.is_armed() {
            return;
        }
        self.reset(doc);
        self.armed = None;
        info!("viewport controller disarmed");
    }

    /// Return to identity and clear every style this controller wrote.
    ///
    /// Safe mid-drag and with no bound slide.
    pub fn reset<D>(&mut self, doc: &D)
    where
        D: DocumentContext<Element = E>,
    {
        self.transform.reset();
        self.pointer = PointerState::Idle;
        if let Some(slide) = self.slide() {
            for property in StyleProperty::ALL {
                if let Err(e) = doc.clear_style(slide, property) {
                    warn!(%property, error = %e, "failed to clear slide style");
                }
            }
        }
        self.set_panning_indicator(doc, false);
    }

    /// The engine moved to another slide or finished initializing.
    ///
    /// Resets the outgoing slide, then resolves the new one.
    pub fn on_slide_changed<D>(&mut self, doc: &D)
    where
        D: DocumentContext<Element = E>,
    {
        if !self.is_armed() {
            return;
        }
        self.reset(doc);
        if let Some(armed) = self.armed.as_mut() {
            armed.slide = resolve_current_slide(doc, &armed.root);
            debug!(has_slide = armed.slide.is_some(), "current slide re-resolved");
        }
    }

    // --- Input ---

    /// Zoom anchored at `pointer`.
    ///
    /// With zoom enabled the event is consumed even when no slide resolves,
    /// so the host never scrolls underneath the presentation.
    pub fn on_wheel<D>(&mut self, doc: &D, pointer: Point, delta: WheelDelta, flags: InputFlags) -> Handled
    where
        D: DocumentContext<Element = E>,
    {
        if !self.is_armed() || !flags.zoom_enabled {
            return Handled::IGNORED;
        }
        let Some(slide) = self.slide() else {
            debug!("no current slide; wheel swallowed");
            return Handled::CONSUMED;
        };
        let Some(rect) = doc.bounding_rect(slide) else {
            debug!("current slide has no layout; wheel swallowed");
            return Handled::CONSUMED;
        };

        let offset = pointer.offset_from(rect.center());
        if self.transform.zoom_at(offset, delta.dy) {
            self.apply(doc);
        }
        Handled::CONSUMED
    }

    /// Primary press starts a pan drag.
    pub fn on_pointer_down<D>(&mut self, doc: &D, pointer: Point, button: Button, flags: InputFlags) -> Handled
    where
        D: DocumentContext<Element = E>,
    {
        if !self.is_armed() || !flags.pan_enabled || button != Button::Primary {
            return Handled::IGNORED;
        }
        self.pointer = PointerState::Panning { last_screen: pointer };
        self.set_panning_indicator(doc, true);
        Handled::CONSUMED
    }

    /// Pointer movement pans by the raw screen delta while dragging.
    pub fn on_pointer_move<D>(&mut self, doc: &D, pointer: Point) -> Handled
    where
        D: DocumentContext<Element = E>,
    {
        let PointerState::Panning { last_screen } = self.pointer else {
            return Handled::IGNORED;
        };
        self.pointer = PointerState::Panning { last_screen: pointer };
        if self.slide().is_none() {
            return Handled::IGNORED;
        }

        let delta = pointer.offset_from(last_screen);
        self.transform.pan_by(delta.x, delta.y);
        self.apply(doc);
        Handled::IGNORED
    }

    /// Button release ends the drag.
    pub fn on_pointer_up<D>(&mut self, doc: &D) -> Handled
    where
        D: DocumentContext<Element = E>,
    {
        if self.pointer.is_panning() {
            self.pointer = PointerState::Idle;
            self.set_panning_indicator(doc, false);
        }
        Handled::IGNORED
    }

    /// Secondary-button action resets instead of opening a context menu.
    pub fn on_context_menu<D>(&mut self, doc: &D, flags: InputFlags) -> Handled
    where
        D: DocumentContext<Element = E>,
    {
        if !self.is_armed() || !flags.any_pointer_enabled() {
            return Handled::IGNORED;
        }
        self.reset(doc);
        Handled::CONSUMED
    }

    // --- Output ---

    fn apply<D>(&self, doc: &D)
    where
        D: DocumentContext<Element = E>,
    {
        let Some(slide) = self.slide() else {
            return;
        };
        let writes = [
            (StyleProperty::TransformOrigin, TRANSFORM_ORIGIN_CENTER.to_string()),
            (StyleProperty::Translate, self.transform.translate_css()),
            (StyleProperty::Scale, self.transform.scale_css()),
        ];
        for (property, value) in &writes {
            if let Err(e) = doc.set_style(slide, *property, value) {
                warn!(%property, error = %e, "failed to write slide style");
            }
        }
    }

    fn set_panning_indicator<D>(&self, doc: &D, enabled: bool)
    where
        D: DocumentContext<Element = E>,
    {
        if let Err(e) = doc.set_body_class(PANNING_CLASS, enabled) {
            warn!(enabled, error = %e, "failed to toggle panning class");
        }
    }
}
