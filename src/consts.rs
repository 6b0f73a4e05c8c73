//! Shared constants for the presentation detector and viewport controller.

// ── Zoom ────────────────────────────────────────────────────────

/// Minimum slide scale factor.
pub const ZOOM_MIN: f64 = 0.1;

/// Maximum slide scale factor.
pub const ZOOM_MAX: f64 = 10.0;

/// Scale multiplier applied per [`WHEEL_STEP_PX`] of wheel travel.
pub const ZOOM_BASE: f64 = 1.1;

/// Wheel delta (in pixels) that corresponds to one zoom step.
pub const WHEEL_STEP_PX: f64 = 100.0;

// ── Detection ───────────────────────────────────────────────────

/// Period of the fallback presence poll, in milliseconds.
pub const POLL_INTERVAL_MS: u32 = 1000;

// ── Presentation engine DOM contract ────────────────────────────

/// Marker selector for the presentation root element.
pub const PRESENTATION_ROOT_SELECTOR: &str = ".reveal";

/// Top-level slide containers, relative to the presentation root.
pub const TOP_LEVEL_SLIDE_SELECTOR: &str = ".slides > section";

/// Nested (vertical) slides, relative to a top-level slide.
pub const NESTED_SLIDE_SELECTOR: &str = "section";

/// Class the engine puts on the slide currently on screen.
pub const PRESENT_CLASS: &str = "present";

/// Engine event fired after navigating to another slide.
pub const SLIDE_CHANGED_EVENT: &str = "slidechanged";

/// Engine event fired once the deck has finished initializing.
pub const READY_EVENT: &str = "ready";

// ── Styling ─────────────────────────────────────────────────────

/// Body class present while a pan drag is in progress.
pub const PANNING_CLASS: &str = "is-panning";

/// Transform origin pinned on the zoomed slide.
pub const TRANSFORM_ORIGIN_CENTER: &str = "center center";

/// Custom property carrying the progress bar height.
pub const PROGRESS_HEIGHT_PROPERTY: &str = "--progress-height";
