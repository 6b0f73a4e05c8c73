//! Error type shared by the host and document boundaries.
//!
//! None of these are fatal: the detector and controller log them and degrade
//! to "nothing changed this tick".

use crate::host::SurfaceId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("host rejected view request: {0}")]
    Host(String),
    #[error("editing surface not available: {0}")]
    SurfaceUnavailable(SurfaceId),
    #[error("document update failed: {0}")]
    Dom(String),
    #[error("malformed settings: {0}")]
    Settings(#[from] serde_json::Error),
    #[error("invalid value for {key}: {value}")]
    InvalidSetting { key: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
