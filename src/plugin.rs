//! Plugin orchestration: load/unload lifecycle and signal routing.
//!
//! `SlidesPlugin` owns the detector and the controller and holds the injected
//! document and host. Signal handlers return the [`Action`]s the binding has
//! to perform (start/stop observers, timers, input listeners), mirroring how
//! the engine reports side effects instead of performing them.

#[cfg(test)]
#[path = "plugin_test.rs"]
mod plugin_test;

use tracing::{info, warn};

use crate::consts::POLL_INTERVAL_MS;
use crate::controller::ViewportController;
use crate::detector::{ModeDetector, ModeListener, Signal, Transition};
use crate::dom::DocumentContext;
use crate::error::Result;
use crate::geometry::Point;
use crate::host::{HostView, RequestId};
use crate::input::{Button, Handled, WheelDelta};
use crate::settings::Settings;

/// Side effects returned to the binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Subscribe to subtree insertions/removals on the document body.
    ObserveMutations,
    /// Drop the mutation subscription.
    DisconnectObserver,
    /// Start the fallback presence poll.
    StartPolling { interval_ms: u32 },
    /// Cancel the fallback presence poll.
    StopPolling,
    /// Attach wheel/pointer/context-menu/engine listeners to the presentation root.
    AttachInputListeners,
    /// Detach every input listener.
    DetachInputListeners,
}

/// Bridges detector notifications to the controller.
struct Lifecycle<'a, D: DocumentContext> {
    doc: &'a D,
    controller: &'a mut ViewportController<D::Element>,
    actions: Vec<Action>,
}

impl<D: DocumentContext> ModeListener for Lifecycle<'_, D> {
    fn on_enter(&mut self) {
        if self.controller.arm(self.doc) {
            self.actions.push(Action::AttachInputListeners);
        }
    }

    fn on_exit(&mut self) {
        self.controller.disarm(self.doc);
        self.actions.push(Action::DetachInputListeners);
    }
}

pub struct SlidesPlugin<D: DocumentContext, H: HostView> {
    doc: D,
    host: H,
    settings: Settings,
    detector: ModeDetector,
    controller: ViewportController<D::Element>,
    loaded: bool,
}

impl<D: DocumentContext, H: HostView> SlidesPlugin<D, H> {
    #[must_use]
    pub fn new(doc: D, host: H, settings: Settings) -> Self {
        Self {
            doc,
            host,
            settings,
            detector: ModeDetector::new(),
            controller: ViewportController::new(),
            loaded: false,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn doc(&self) -> &D {
        &self.doc
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn detector(&self) -> &ModeDetector {
        &self.detector
    }

    #[must_use]
    pub fn controller(&self) -> &ViewportController<D::Element> {
        &self.controller
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    // --- Lifecycle ---

    /// Apply cosmetic styles, start both detection signals, and sample once.
    ///
    /// Loading twice is a no-op.
    pub fn load(&mut self) -> Vec<Action> {
        if self.loaded {
            return Vec::new();
        }
        self.loaded = true;
        self.apply_cosmetics();
        info!(poll_ms = POLL_INTERVAL_MS, "slides plugin loaded");

        let mut actions = vec![
            Action::ObserveMutations,
            Action::StartPolling { interval_ms: POLL_INTERVAL_MS },
        ];
        actions.extend(self.evaluate(Signal::Poll));
        actions
    }

    /// Tear everything down. Always returns the full teardown set, whatever
    /// state setup reached.
    pub fn unload(&mut self) -> Vec<Action> {
        self.controller.disarm(&self.doc);
        self.detector.reset();
        self.loaded = false;
        info!("slides plugin unloaded");
        vec![
            Action::DetachInputListeners,
            Action::StopPolling,
            Action::DisconnectObserver,
        ]
    }

    /// Replace settings and reapply cosmetic styles.
    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.apply_cosmetics();
    }

    // --- Detection signals ---

    pub fn on_mutation(&mut self) -> Vec<Action> {
        self.evaluate(Signal::Mutation)
    }

    pub fn on_poll_tick(&mut self) -> Vec<Action> {
        self.evaluate(Signal::Poll)
    }

    /// The host finished an asynchronous display mode change.
    pub fn on_mode_change_settled(&mut self, request: RequestId, result: Result<()>) -> Vec<Action> {
        let mut lifecycle = Lifecycle {
            doc: &self.doc,
            controller: &mut self.controller,
            actions: Vec::new(),
        };
        self.detector.settle(request, result, &mut lifecycle);
        lifecycle.actions
    }

    // --- Input ---

    pub fn on_wheel(&mut self, pointer: Point, delta: WheelDelta) -> Handled {
        let flags = self.settings.input_flags();
        self.controller.on_wheel(&self.doc, pointer, delta, flags)
    }

    pub fn on_pointer_down(&mut self, pointer: Point, button: Button) -> Handled {
        let flags = self.settings.input_flags();
        self.controller.on_pointer_down(&self.doc, pointer, button, flags)
    }

    pub fn on_pointer_move(&mut self, pointer: Point) -> Handled {
        self.controller.on_pointer_move(&self.doc, pointer)
    }

    pub fn on_pointer_up(&mut self) -> Handled {
        self.controller.on_pointer_up(&self.doc)
    }

    pub fn on_context_menu(&mut self) -> Handled {
        let flags = self.settings.input_flags();
        self.controller.on_context_menu(&self.doc, flags)
    }

    /// Engine `slidechanged` or `ready` event.
    pub fn on_slide_changed(&mut self) {
        self.controller.on_slide_changed(&self.doc);
    }

    // --- Internals ---

    fn evaluate(&mut self, signal: Signal) -> Vec<Action> {
        if !self.loaded {
            return Vec::new();
        }
        let mut lifecycle = Lifecycle {
            doc: &self.doc,
            controller: &mut self.controller,
            actions: Vec::new(),
        };
        let transition = self.detector.evaluate(signal, &self.doc, &mut self.host, &mut lifecycle);
        if transition != Transition::Unchanged && transition != Transition::Deferred {
            info!(?signal, ?transition, "presentation mode transition");
        }
        lifecycle.actions
    }

    fn apply_cosmetics(&self) {
        for (class, enabled) in self.settings.body_classes() {
            if let Err(e) = self.doc.set_body_class(class, enabled) {
                warn!(class, error = %e, "failed to toggle cosmetic class");
            }
        }
        let (name, value) = self.settings.progress_height_property();
        if let Err(e) = self.doc.set_body_property(name, &value) {
            warn!(name, error = %e, "failed to set progress height");
        }
    }
}
