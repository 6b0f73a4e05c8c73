//! Presentation mode detector.
//!
//! DESIGN
//! ======
//! Two states, inactive and active, keyed on whether the presentation root
//! is in the document. Mutation notifications and a fixed-interval poll both
//! call [`ModeDetector::evaluate`], which is idempotent: calling it again in
//! the matching state does nothing, so the two signals can't race.
//!
//! On entry the active editing surface is switched to preview and its
//! previous mode is captured together with the surface's identity. On exit
//! that same surface is restored. Restoration may complete asynchronously;
//! while it is in flight every signal is deferred and the detector stays
//! active, so at most one restoration is outstanding and `on_exit` fires only
//! after the host confirms it.
//!
//! Nothing here returns an error. Host failures are logged and leave the
//! state where it was so a later signal retries.

#[cfg(test)]
#[path = "detector_test.rs"]
mod detector_test;

use tracing::{debug, info, warn};

use crate::dom::DocumentContext;
use crate::error::Result;
use crate::host::{DisplayMode, HostView, ModeChange, RequestId, SurfaceId};

// =============================================================================
// TYPES
// =============================================================================

/// Which signal triggered an evaluation. Only used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The document subtree changed.
    Mutation,
    /// The fallback poll timer fired.
    Poll,
}

/// What an evaluation or settlement did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Root presence matches the current state, or nothing actionable was found.
    Unchanged,
    /// Presentation mode was entered; `on_enter` fired.
    Entered,
    /// The root is gone and the surface restoration is in flight.
    ExitPending,
    /// Presentation mode was left; `on_exit` fired.
    Exited,
    /// A restoration is in flight; the signal was dropped.
    Deferred,
}

/// Receives lifecycle notifications for real transitions.
pub trait ModeListener {
    fn on_enter(&mut self);
    fn on_exit(&mut self);
}

/// The display mode a surface had before presentation mode took it over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preempted {
    pub surface: SurfaceId,
    pub mode: DisplayMode,
}

/// Inferred mode. Written only by the detector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeState {
    pub is_presentation_active: bool,
    /// Set once per entry, consumed once per exit.
    pub preempted: Option<Preempted>,
}

// =============================================================================
// DETECTOR
// =============================================================================

#[derive(Debug, Default)]
pub struct ModeDetector {
    state: ModeState,
    restoration: Option<RequestId>,
}

impl ModeDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &ModeState {
        &self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.is_presentation_active
    }

    /// The restoration request currently awaiting the host, if any.
    #[must_use]
    pub fn restoration_in_flight(&self) -> Option<RequestId> {
        self.restoration
    }

    /// Sample the document and transition if root presence disagrees with the state.
    pub fn evaluate<D, H, L>(&mut self, signal: Signal, doc: &D, host: &mut H, listener: &mut L) -> Transition
    where
        D: DocumentContext,
        H: HostView + ?Sized,
        L: ModeListener + ?Sized,
    {
        if let Some(request) = self.restoration {
            debug!(?signal, %request, "restoration in flight; signal deferred");
            return Transition::Deferred;
        }

        let root_present = doc.presentation_root().is_some();
        match (self.state.is_presentation_active, root_present) {
            (false, true) => self.enter(host, listener),
            (true, false) => self.exit(host, listener),
            _ => Transition::Unchanged,
        }
    }

    /// Report that an asynchronous mode change finished.
    ///
    /// Only the in-flight restoration is tracked; other requests (the
    /// fire-and-forget switch to preview on entry) are ignored. A failed
    /// restoration clears the in-flight flag but keeps the state active and
    /// the capture intact, so the next signal retries.
    pub fn settle<L>(&mut self, request: RequestId, result: Result<()>, listener: &mut L) -> Transition
    where
        L: ModeListener + ?Sized,
    {
        if self.restoration != Some(request) {
            if let Err(e) = result {
                warn!(%request, error = %e, "untracked mode change failed");
            } else {
                debug!(%request, "ignoring settlement of untracked request");
            }
            return Transition::Unchanged;
        }

        self.restoration = None;
        match result {
            Ok(()) => self.finish_exit(listener),
            Err(e) => {
                warn!(%request, error = %e, "surface restoration failed; will retry");
                Transition::Unchanged
            }
        }
    }

    /// Forget everything. Used on plugin unload.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn enter<H, L>(&mut self, host: &mut H, listener: &mut L) -> Transition
    where
        H: HostView + ?Sized,
        L: ModeListener + ?Sized,
    {
        let Some(surface) = host.active_surface() else {
            debug!("presentation root present but no editing surface; waiting");
            return Transition::Unchanged;
        };
        let mode = match host.display_mode(&surface) {
            Ok(mode) => mode,
            Err(e) => {
                warn!(%surface, error = %e, "could not read display mode");
                return Transition::Unchanged;
            }
        };

        host.focus_surface(&surface);
        match host.set_display_mode(&surface, DisplayMode::Preview) {
            Ok(change) => debug!(%surface, ?change, "requested preview mode"),
            Err(e) => {
                warn!(%surface, error = %e, "host rejected preview mode");
                return Transition::Unchanged;
            }
        }

        info!(%surface, captured = %mode, "entered presentation mode");
        self.state = ModeState {
            is_presentation_active: true,
            preempted: Some(Preempted { surface, mode }),
        };
        listener.on_enter();
        Transition::Entered
    }

    fn exit<H, L>(&mut self, host: &mut H, listener: &mut L) -> Transition
    where
        H: HostView + ?Sized,
        L: ModeListener + ?Sized,
    {
        let (surface, mode) = match &self.state.preempted {
            Some(captured) if host.has_surface(&captured.surface) => {
                (captured.surface.clone(), captured.mode.restore_target())
            }
            Some(captured) => {
                info!(surface = %captured.surface, "captured surface closed; nothing to restore");
                return self.finish_exit(listener);
            }
            None => match host.active_surface() {
                Some(active) => (active, DisplayMode::Source),
                None => {
                    debug!("presentation root gone but no editing surface; waiting");
                    return Transition::Unchanged;
                }
            },
        };

        host.focus_surface(&surface);
        match host.set_display_mode(&surface, mode) {
            Ok(ModeChange::Applied) => self.finish_exit(listener),
            Ok(ModeChange::Pending(request)) => {
                info!(%surface, %mode, %request, "restoring display mode");
                self.restoration = Some(request);
                Transition::ExitPending
            }
            Err(e) => {
                warn!(%surface, %mode, error = %e, "host rejected restoration; will retry");
                Transition::Unchanged
            }
        }
    }

    fn finish_exit<L>(&mut self, listener: &mut L) -> Transition
    where
        L: ModeListener + ?Sized,
    {
        self.state = ModeState::default();
        self.restoration = None;
        info!("left presentation mode");
        listener.on_exit();
        Transition::Exited
    }
}
