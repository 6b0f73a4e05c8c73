//! Host document-view boundary.
//!
//! The host owns editing surfaces (one per open document pane). The detector
//! reads and changes their display mode through [`HostView`]; mode changes
//! may complete later, which is modelled with [`ModeChange::Pending`] and a
//! [`RequestId`] that the host hands back when the change settles.

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Rendering mode of an editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Raw markdown source.
    #[default]
    Source,
    /// Read-only rendered view.
    Preview,
    /// Live-preview editing.
    Live,
    /// Anything the host reports that we don't recognize.
    #[serde(other)]
    Unknown,
}

impl DisplayMode {
    /// Parse the host's mode string. Unrecognized strings map to `Unknown`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "source" => Self::Source,
            "preview" => Self::Preview,
            "live" => Self::Live,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Preview => "preview",
            Self::Live => "live",
            Self::Unknown => "unknown",
        }
    }

    /// The mode to request when restoring a surface to this captured mode.
    ///
    /// `Unknown` cannot be requested from the host, so it restores to `Source`.
    #[must_use]
    pub fn restore_target(self) -> Self {
        match self {
            Self::Unknown => Self::Source,
            other => other,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identity of an editing surface (the host's pane/leaf id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(pub String);

impl SurfaceId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle for a mode change the host completes asynchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of asking the host to change a surface's display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    /// The host applied the change before returning.
    Applied,
    /// The change is in flight; the host will report it settled under this id.
    Pending(RequestId),
}

/// The host application's document-view API.
pub trait HostView {
    /// The editing surface that currently has focus, if any.
    fn active_surface(&self) -> Option<SurfaceId>;

    /// Whether `surface` is still open.
    fn has_surface(&self, surface: &SurfaceId) -> bool;

    /// Current display mode of `surface`.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface is gone or the host refuses the query.
    fn display_mode(&self, surface: &SurfaceId) -> Result<DisplayMode>;

    /// Request a display mode change.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the request outright.
    fn set_display_mode(&mut self, surface: &SurfaceId, mode: DisplayMode) -> Result<ModeChange>;

    /// Make `surface` the active one.
    fn focus_surface(&mut self, surface: &SurfaceId);
}
