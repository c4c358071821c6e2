//! Path samples.

use nalgebra::{Point3, Vector3};

use crate::frame::{DEGENERATE_EPSILON, Frame, perpendicular_to};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One accepted point of the bead path, projected onto the surface.
///
/// `surface_normal` is always unit length. `tangent` is unit length once the
/// path holds at least two samples; a lone sample carries a fallback tangent
/// perpendicular to its surface normal.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Sample position (surface hit lifted along the hit normal).
    pub position: Point3<f64>,
    /// Unit surface normal at the hit.
    pub surface_normal: Vector3<f64>,
    /// Unit path tangent, corrected as neighbours arrive.
    pub tangent: Vector3<f64>,
    /// Arc length from the first sample ever appended.
    pub cumulative_length: f64,
}

impl Sample {
    /// Create a sample with a provisional fallback tangent.
    ///
    /// The surface normal is normalized; a degenerate normal becomes `+Z`.
    ///
    /// # Example
    ///
    /// ```
    /// use bead_types::Sample;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let s = Sample::new(Point3::origin(), Vector3::new(0.0, 0.0, 2.0), 0.0);
    /// assert!((s.surface_normal.norm() - 1.0).abs() < 1e-12);
    /// assert!(s.tangent.dot(&s.surface_normal).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn new(position: Point3<f64>, surface_normal: Vector3<f64>, cumulative_length: f64) -> Self {
        let surface_normal = surface_normal
            .try_normalize(DEGENERATE_EPSILON)
            .unwrap_or(Vector3::z());
        Self {
            position,
            surface_normal,
            tangent: perpendicular_to(surface_normal),
            cumulative_length,
        }
    }

    /// Set the tangent, returning the updated sample.
    #[must_use]
    pub const fn with_tangent(mut self, tangent: Vector3<f64>) -> Self {
        self.tangent = tangent;
        self
    }

    /// Orthonormal frame for this sample.
    #[must_use]
    pub fn frame(&self) -> Frame {
        Frame::from_surface(self.tangent, self.surface_normal)
    }

    /// Euclidean distance to another sample.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }
}
