//! Error types for bead generation.
//!
//! Ordinary negative outcomes (a missed probe, a candidate that is too close,
//! a missing tip pose) are not errors and never appear here. These variants
//! cover programmer errors only: dimensions supplied outside the clamping
//! configuration path, and collaborators missing at construction time.

use thiserror::Error;

/// Result type for bead operations.
pub type BeadResult<T> = Result<T, BeadError>;

/// Errors that can occur while constructing bead geometry components.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BeadError {
    /// A bead dimension is zero, negative, or not finite.
    #[error("invalid {name}: {value} (must be finite and > 0)")]
    InvalidDimension {
        /// Name of the dimension.
        name: &'static str,
        /// Supplied value.
        value: f64,
    },

    /// Radial segment count is outside the supported range.
    #[error("radial segments must be in [{min}, {max}], got {actual}")]
    InvalidSegments {
        /// Minimum supported segments.
        min: usize,
        /// Maximum supported segments.
        max: usize,
        /// Supplied segment count.
        actual: usize,
    },

    /// UV length scale is zero, negative, or not finite.
    #[error("invalid uv length scale: {0}")]
    InvalidUvScale(f64),

    /// Probe distance is zero, negative, or not finite.
    #[error("invalid probe distance: {0}")]
    InvalidProbeDistance(f64),

    /// A required collaborator was not supplied.
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),
}

impl BeadError {
    /// Creates an invalid dimension error.
    #[must_use]
    pub const fn invalid_dimension(name: &'static str, value: f64) -> Self {
        Self::InvalidDimension { name, value }
    }

    /// Creates an invalid segments error.
    #[must_use]
    pub const fn invalid_segments(min: usize, max: usize, actual: usize) -> Self {
        Self::InvalidSegments { min, max, actual }
    }

    /// Creates a missing collaborator error.
    #[must_use]
    pub const fn missing(collaborator: &'static str) -> Self {
        Self::MissingCollaborator(collaborator)
    }
}

/// Returns `Ok(value)` when `value` is finite and strictly positive.
///
/// # Errors
///
/// Returns [`BeadError::InvalidDimension`] otherwise.
pub fn require_positive(name: &'static str, value: f64) -> BeadResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(BeadError::invalid_dimension(name, value))
    }
}
