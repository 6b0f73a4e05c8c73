//! Injected document context.
//!
//! Everything the detector and controller know about the page comes through
//! [`DocumentContext`]. The page is owned by the host and the presentation
//! engine and can change between any two calls, so elements are looked up
//! fresh whenever a caller needs them and never assumed to survive a slide
//! change.

use std::fmt;

use crate::error::Result;
use crate::geometry::Rect;

/// Inline style properties this crate writes.
///
/// `translate` and `scale` are the standalone CSS transform properties. They
/// compose with the engine's own `transform` instead of replacing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    Translate,
    Scale,
    TransformOrigin,
}

impl StyleProperty {
    pub const ALL: [StyleProperty; 3] = [Self::Translate, Self::Scale, Self::TransformOrigin];

    #[must_use]
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Translate => "translate",
            Self::Scale => "scale",
            Self::TransformOrigin => "transform-origin",
        }
    }
}

impl fmt::Display for StyleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

/// Read/write view of the page shared with the presentation engine.
///
/// Writes take `&self`: like the DOM itself, the context is interior-mutable.
pub trait DocumentContext {
    /// Handle to a page element.
    type Element: Clone + PartialEq + fmt::Debug;

    /// The presentation root, if the engine is currently rendering.
    fn presentation_root(&self) -> Option<Self::Element>;

    /// Top-level slide containers under `root`, in document order.
    fn top_level_slides(&self, root: &Self::Element) -> Vec<Self::Element>;

    /// Slides nested inside a top-level slide (vertical stacks), in document order.
    fn nested_slides(&self, slide: &Self::Element) -> Vec<Self::Element>;

    /// Whether `element` carries `class`.
    fn has_class(&self, element: &Self::Element, class: &str) -> bool;

    /// Current on-screen rect of `element`, after all transforms.
    fn bounding_rect(&self, element: &Self::Element) -> Option<Rect>;

    /// Set an inline style property.
    ///
    /// # Errors
    ///
    /// Returns `Error::Dom` if the page refuses the write.
    fn set_style(&self, element: &Self::Element, property: StyleProperty, value: &str) -> Result<()>;

    /// Remove an inline style property.
    ///
    /// # Errors
    ///
    /// Returns `Error::Dom` if the page refuses the write.
    fn clear_style(&self, element: &Self::Element, property: StyleProperty) -> Result<()>;

    /// Add or remove a class on the document body.
    ///
    /// # Errors
    ///
    /// Returns `Error::Dom` if there is no body or the write fails.
    fn set_body_class(&self, class: &str, enabled: bool) -> Result<()>;

    /// Set a custom property on the document body.
    ///
    /// # Errors
    ///
    /// Returns `Error::Dom` if there is no body or the write fails.
    fn set_body_property(&self, name: &str, value: &str) -> Result<()>;
}
