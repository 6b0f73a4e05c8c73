//! Input model: mouse buttons, wheel deltas, the pan gesture, and handler outcomes.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geometry::Point;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button.
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code. Returns `None` for auxiliary buttons.
    #[must_use]
    pub fn from_dom(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

impl WheelDelta {
    #[must_use]
    pub fn vertical(dy: f64) -> Self {
        Self { dx: 0.0, dy }
    }
}

/// Pointer gesture tracked between button press and release.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A primary-button drag is panning the slide.
    Panning {
        /// Screen position of the previous pointer event, the baseline for the next delta.
        last_screen: Point,
    },
}

impl PointerState {
    #[must_use]
    pub fn is_panning(&self) -> bool {
        matches!(self, Self::Panning { .. })
    }
}

/// Outcome of an input handler, telling the binding whether to suppress the
/// host's default action for the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Handled {
    pub prevent_default: bool,
}

impl Handled {
    /// Leave the event to the host.
    pub const IGNORED: Self = Self { prevent_default: false };
    /// The event was ours; suppress the default action.
    pub const CONSUMED: Self = Self { prevent_default: true };
}

/// Feature switches read on every event. Supplied from settings, never mutated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputFlags {
    /// Primary-button drag pans the slide.
    pub pan_enabled: bool,
    /// Wheel zooms the slide.
    pub zoom_enabled: bool,
    /// WASD/QE navigation remap; consumed by the key-remap layer.
    pub key_remap_enabled: bool,
}

impl Default for InputFlags {
    fn default() -> Self {
        Self { pan_enabled: true, zoom_enabled: true, key_remap_enabled: false }
    }
}

impl InputFlags {
    /// Whether any pointer interaction is turned on.
    #[must_use]
    pub fn any_pointer_enabled(&self) -> bool {
        self.pan_enabled || self.zoom_enabled
    }
}
