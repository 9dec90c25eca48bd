//! Error types for shape construction

use thiserror::Error;

/// Shape construction errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    /// Polygon footprint has fewer than three distinct vertices
    #[error("Degenerate polygon: {0} vertices, at least 3 required")]
    DegeneratePolygon(usize),

    /// Sphere radius below zero
    #[error("Negative sphere radius: {0}")]
    NegativeRadius(f64),

    /// Prism height below zero
    #[error("Negative prism height: {0}")]
    NegativeHeight(f64),

    /// Box minimum exceeds maximum on an axis
    #[error("Inverted box on {axis} axis: min {min} > max {max}")]
    InvertedBox {
        /// Axis name ("x", "y" or "z")
        axis: &'static str,
        /// Minimum coordinate
        min: f64,
        /// Maximum coordinate
        max: f64,
    },

    /// NaN or infinite coordinate
    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),

    /// Builder has no operations
    #[error("Shape builder has no shapes")]
    EmptyBuilder,

    /// Builder starts with subtract or intersect
    #[error("Shape builder must start with add, found {0}")]
    MissingBase(&'static str),
}

/// Result type for shape operations
pub type Result<T> = std::result::Result<T, ShapeError>;
