//! The pan/zoom layer applied to the visible slide.
//!
//! `ViewportTransform` is composed on top of whatever transform the
//! presentation engine already puts on the slide. It is written to the
//! independent CSS `translate` and `scale` properties, with the transform
//! origin pinned to the element's center, so translation lives in a
//! center-origin coordinate space:
//!
//! ```text
//! screen = layout_center + translate + content * scale
//! ```
//!
//! Content space is the element's local, unscaled space measured from its
//! center; screen space is viewport pixels after the transform.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use crate::consts::{WHEEL_STEP_PX, ZOOM_BASE, ZOOM_MAX, ZOOM_MIN};
use crate::geometry::Point;

/// Scale and translation for the current slide. Identity is the reset state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    /// Scale factor, always within `[ZOOM_MIN, ZOOM_MAX]`.
    pub scale: f64,
    /// Horizontal translation in CSS pixels.
    pub translate_x: f64,
    /// Vertical translation in CSS pixels.
    pub translate_y: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self { scale: 1.0, translate_x: 0.0, translate_y: 0.0 }
    }
}

impl ViewportTransform {
    /// Multiplicative zoom factor for a wheel event's vertical delta.
    ///
    /// Scrolling up (negative delta) zooms in; one [`WHEEL_STEP_PX`] of travel
    /// is one [`ZOOM_BASE`] step.
    #[must_use]
    pub fn zoom_factor(delta_y: f64) -> f64 {
        ZOOM_BASE.powf(-delta_y / WHEEL_STEP_PX)
    }

    /// Whether this is exactly the reset state.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Convert a screen offset (measured from the element's visual center)
    /// into content space.
    #[must_use]
    pub fn screen_to_content(&self, offset_from_center: Point) -> Point {
        Point {
            x: offset_from_center.x / self.scale,
            y: offset_from_center.y / self.scale,
        }
    }

    /// Zoom by one wheel event, keeping the content under the pointer fixed.
    ///
    /// `offset_from_center` is the pointer position relative to the slide's
    /// visual center. Returns `false` when the scale did not change (bounds
    /// saturated, zero delta, or a non-finite delta).
    pub fn zoom_at(&mut self, offset_from_center: Point, delta_y: f64) -> bool {
        if !delta_y.is_finite() {
            return false;
        }
        let old_scale = self.scale;
        let new_scale = (old_scale * Self::zoom_factor(delta_y)).clamp(ZOOM_MIN, ZOOM_MAX);
        if (new_scale - old_scale).abs() < f64::EPSILON {
            return false;
        }

        let content = self.screen_to_content(offset_from_center);
        self.scale = new_scale;
        self.translate_x += content.x * (old_scale - new_scale);
        self.translate_y += content.y * (old_scale - new_scale);
        true
    }

    /// Pan by a raw screen-pixel delta. Not compensated for scale.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.translate_x += dx;
        self.translate_y += dy;
    }

    /// Return to identity.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Value for the CSS `translate` property.
    #[must_use]
    pub fn translate_css(&self) -> String {
        format!("{}px {}px", self.translate_x, self.translate_y)
    }

    /// Value for the CSS `scale` property.
    #[must_use]
    pub fn scale_css(&self) -> String {
        format!("{}", self.scale)
    }
}
