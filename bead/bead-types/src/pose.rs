//! Tool tip pose.

use nalgebra::{Point3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// World pose of the welding tool tip, sampled once per tick.
///
/// The tip's local "down" axis is local `-Z`, which is the default probe
/// direction when no fixed direction is configured.
///
/// # Example
///
/// ```
/// use bead_types::TipPose;
/// use nalgebra::{Point3, Vector3};
///
/// let pose = TipPose::from_position(Point3::new(0.0, 0.0, 0.02));
/// assert_eq!(pose.down(), -Vector3::z());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TipPose {
    /// Tip position in world coordinates.
    pub position: Point3<f64>,
    /// Tip orientation.
    pub orientation: UnitQuaternion<f64>,
}

impl Default for TipPose {
    fn default() -> Self {
        Self::from_position(Point3::origin())
    }
}

impl TipPose {
    /// Create a pose from position and orientation.
    #[must_use]
    pub const fn new(position: Point3<f64>, orientation: UnitQuaternion<f64>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Create a pose with identity orientation.
    #[must_use]
    pub fn from_position(position: Point3<f64>) -> Self {
        Self {
            position,
            orientation: UnitQuaternion::identity(),
        }
    }

    /// Transform a direction from the tip frame to world coordinates.
    #[must_use]
    pub fn transform_vector(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.orientation * local
    }

    /// The tip's local down axis (local `-Z`) in world coordinates.
    #[must_use]
    pub fn down(&self) -> Vector3<f64> {
        self.transform_vector(&-Vector3::z())
    }

    /// Check that the pose holds no `NaN` or infinite values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|x| x.is_finite())
            && self.orientation.coords.iter().all(|x| x.is_finite())
    }
}
