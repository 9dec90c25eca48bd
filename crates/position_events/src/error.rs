//! Error types for the position events engine

use crate::handle::RegionHandle;
use position_geometry::ShapeError;
use thiserror::Error;

/// Engine errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositionEventsError {
    /// Malformed geometry
    #[error("Invalid shape: {0}")]
    InvalidShape(#[from] ShapeError),

    /// Rejected registration argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Handle is not (or no longer) registered
    #[error("Unknown region handle: {0}")]
    UnknownHandle(RegionHandle),

    /// Transition callback failure
    #[error("Callback failed: {0}")]
    Callback(#[from] CallbackError),

    /// Configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Failure surfaced by a user-supplied transition callback
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    /// Callback returned an error
    #[error("callback returned an error: {0}")]
    Failed(String),

    /// Callback panicked
    #[error("callback panicked: {0}")]
    Panicked(String),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, PositionEventsError>;
