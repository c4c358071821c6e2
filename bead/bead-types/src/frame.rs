//! Orthonormal frames along the bead path.
//!
//! A frame is built from a sample's tangent and the surface normal under it.
//! The binormal lies in the surface plane, and the cross-section normal is
//! re-derived from the binormal so the three axes stay mutually orthogonal
//! while the normal tracks the surface as closely as possible.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Below this magnitude a cross product is treated as degenerate.
pub const DEGENERATE_EPSILON: f64 = 1e-9;

/// Below this sine of the angle between two unit vectors they are treated
/// as parallel when choosing a binormal.
pub const PARALLEL_EPSILON: f64 = 1e-6;

/// World "right" axis, the first binormal fallback.
pub const WORLD_RIGHT: Vector3<f64> = Vector3::new(1.0, 0.0, 0.0);

/// World "up" axis, the second binormal fallback.
pub const WORLD_UP: Vector3<f64> = Vector3::new(0.0, 0.0, 1.0);

/// A reference frame at one sample of the bead path.
///
/// Consists of three orthonormal vectors: tangent, normal, and binormal.
/// The cross-section is laid out in the binormal/normal plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    /// Tangent direction (forward along the path).
    pub tangent: Vector3<f64>,
    /// Stabilized cross-section normal (away from the surface).
    pub normal: Vector3<f64>,
    /// Binormal direction (sideways across the bead).
    pub binormal: Vector3<f64>,
}

impl Frame {
    /// Create a frame from tangent, normal, and binormal vectors.
    ///
    /// Vectors are assumed to be orthonormal.
    #[must_use]
    pub const fn new(tangent: Vector3<f64>, normal: Vector3<f64>, binormal: Vector3<f64>) -> Self {
        Self {
            tangent,
            normal,
            binormal,
        }
    }

    /// Build a frame from a path tangent and the surface normal beneath it.
    ///
    /// `B = normalize(T × surface_normal)`. When the tangent is nearly
    /// parallel to the surface normal (`|T × N̂| < PARALLEL_EPSILON`) the
    /// binormal falls back to `T × WORLD_RIGHT`, then `T × WORLD_UP`. The
    /// final normal is `normalize(B × T)`.
    ///
    /// # Example
    ///
    /// ```
    /// use bead_types::Frame;
    /// use nalgebra::Vector3;
    ///
    /// let frame = Frame::from_surface(Vector3::x(), Vector3::z());
    /// assert!((frame.normal - Vector3::z()).norm() < 1e-12);
    /// assert!((frame.binormal + Vector3::y()).norm() < 1e-12);
    /// ```
    #[must_use]
    pub fn from_surface(tangent: Vector3<f64>, surface_normal: Vector3<f64>) -> Self {
        let tangent = tangent
            .try_normalize(DEGENERATE_EPSILON)
            .unwrap_or_else(|| perpendicular_to(surface_normal));

        let binormal = [surface_normal, WORLD_RIGHT, WORLD_UP]
            .iter()
            .filter_map(|axis| axis.try_normalize(DEGENERATE_EPSILON))
            .find_map(|axis| tangent.cross(&axis).try_normalize(PARALLEL_EPSILON))
            .unwrap_or_else(|| perpendicular_to(tangent));

        let normal = binormal
            .cross(&tangent)
            .try_normalize(DEGENERATE_EPSILON)
            .unwrap_or(WORLD_UP);

        Self {
            tangent,
            normal,
            binormal,
        }
    }

    /// Largest deviation from orthonormality across the frame axes.
    ///
    /// Zero for a perfect frame.
    #[must_use]
    pub fn orthonormality_error(&self) -> f64 {
        let lengths = [
            (self.tangent.norm() - 1.0).abs(),
            (self.normal.norm() - 1.0).abs(),
            (self.binormal.norm() - 1.0).abs(),
        ];
        let dots = [
            self.tangent.dot(&self.normal).abs(),
            self.tangent.dot(&self.binormal).abs(),
            self.normal.dot(&self.binormal).abs(),
        ];
        lengths.into_iter().chain(dots).fold(0.0, f64::max)
    }
}

/// Find a unit vector perpendicular to the given vector.
///
/// Crosses `v` with the world axis it is least aligned with.
#[must_use]
pub fn perpendicular_to(v: Vector3<f64>) -> Vector3<f64> {
    let abs_x = v.x.abs();
    let abs_y = v.y.abs();
    let abs_z = v.z.abs();

    let axis = if abs_x <= abs_y && abs_x <= abs_z {
        Vector3::x()
    } else if abs_y <= abs_z {
        Vector3::y()
    } else {
        Vector3::z()
    };

    v.cross(&axis)
        .try_normalize(DEGENERATE_EPSILON)
        .unwrap_or(Vector3::x())
}
