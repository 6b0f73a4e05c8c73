//! Presentation mode detection and slide pan/zoom for a document editor.
//!
//! The host editor renders slide decks through a third-party presentation
//! engine that inserts a recognizable root element into the page. This crate
//! notices that root appearing and disappearing, switches the active editing
//! surface into preview while the deck is up (and restores it afterwards),
//! and gives the user an independent pan/zoom layer over the slide on screen.
//!
//! All page and host access goes through injected traits, so the core runs
//! and is tested natively. The `web` feature adds the browser binding.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`plugin`] | Load/unload lifecycle and signal routing ([`plugin::SlidesPlugin`]) |
//! | [`detector`] | Presentation mode state machine |
//! | [`controller`] | Pan/zoom controller for the current slide |
//! | [`transform`] | Scale/translate math and CSS rendering |
//! | [`input`] | Buttons, wheel deltas, pan gesture, handler outcomes |
//! | [`geometry`] | Screen-space points and rects |
//! | [`dom`] | Injected document context |
//! | [`host`] | Injected host document-view API |
//! | [`settings`] | Persisted plugin settings |
//! | [`error`] | Shared error type |
//! | [`consts`] | Zoom limits, poll period, selectors, class names |
//! | `web` | Browser binding (feature `web`) |

pub mod consts;
pub mod controller;
pub mod detector;
pub mod dom;
pub mod error;
pub mod geometry;
pub mod host;
pub mod input;
pub mod plugin;
pub mod settings;
pub mod transform;
#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
#[path = "fake_test.rs"]
pub(crate) mod fake;

pub use error::{Error, Result};
