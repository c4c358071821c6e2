//! Surface probing.
//!
//! The collector never talks to a physics engine directly. Hosts implement
//! [`SurfaceProbe`] for their scene type; [`PlaneSurface`] covers the common
//! flat work-piece case and doubles as a test surface.

use nalgebra::{Point3, UnitVector3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which surfaces a probe may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProbeFilter {
    /// Bit mask of eligible surface layers.
    pub layers: u32,
}

impl Default for ProbeFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl ProbeFilter {
    /// Accept every layer.
    #[must_use]
    pub const fn all() -> Self {
        Self { layers: u32::MAX }
    }

    /// Accept only the given layer mask.
    #[must_use]
    pub const fn layers(layers: u32) -> Self {
        Self { layers }
    }

    /// True if a surface on `surface_layers` passes this filter.
    #[must_use]
    pub const fn accepts(&self, surface_layers: u32) -> bool {
        self.layers & surface_layers != 0
    }
}

/// A probe hit on a weldable surface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceHit {
    /// Hit point in world coordinates.
    pub point: Point3<f64>,
    /// Surface normal at the hit point (need not be normalized).
    pub normal: Vector3<f64>,
    /// Distance from the probe origin to the hit point.
    pub distance: f64,
}

impl SurfaceHit {
    /// True if the hit holds no `NaN` or infinite values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.point.coords.iter().all(|c| c.is_finite())
            && self.normal.iter().all(|c| c.is_finite())
            && self.distance.is_finite()
    }
}

/// Directed distance query against the host's surfaces.
///
/// Implement this trait for your world or scene type to let the sample
/// collector project the tool tip onto weldable geometry.
pub trait SurfaceProbe {
    /// Cast from `origin` along `direction` and return the closest eligible hit.
    ///
    /// # Arguments
    ///
    /// * `origin` - Probe origin in world coordinates (the tool tip)
    /// * `direction` - Unit probe direction in world coordinates
    /// * `max_distance` - Maximum distance to check
    /// * `filter` - Surface layers the hit must belong to
    ///
    /// # Returns
    ///
    /// The closest hit, or `None` if nothing eligible lies within `max_distance`.
    fn probe(
        &self,
        origin: Point3<f64>,
        direction: UnitVector3<f64>,
        max_distance: f64,
        filter: &ProbeFilter,
    ) -> Option<SurfaceHit>;
}

impl<T: SurfaceProbe + ?Sized> SurfaceProbe for &T {
    fn probe(
        &self,
        origin: Point3<f64>,
        direction: UnitVector3<f64>,
        max_distance: f64,
        filter: &ProbeFilter,
    ) -> Option<SurfaceHit> {
        (**self).probe(origin, direction, max_distance, filter)
    }
}

impl<T: SurfaceProbe + ?Sized> SurfaceProbe for Box<T> {
    fn probe(
        &self,
        origin: Point3<f64>,
        direction: UnitVector3<f64>,
        max_distance: f64,
        filter: &ProbeFilter,
    ) -> Option<SurfaceHit> {
        (**self).probe(origin, direction, max_distance, filter)
    }
}

/// A set of surfaces reports the nearest hit among its members.
impl<T: SurfaceProbe> SurfaceProbe for [T] {
    fn probe(
        &self,
        origin: Point3<f64>,
        direction: UnitVector3<f64>,
        max_distance: f64,
        filter: &ProbeFilter,
    ) -> Option<SurfaceHit> {
        self.iter()
            .filter_map(|s| s.probe(origin, direction, max_distance, filter))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

impl<T: SurfaceProbe> SurfaceProbe for Vec<T> {
    fn probe(
        &self,
        origin: Point3<f64>,
        direction: UnitVector3<f64>,
        max_distance: f64,
        filter: &ProbeFilter,
    ) -> Option<SurfaceHit> {
        self.as_slice().probe(origin, direction, max_distance, filter)
    }
}

/// An infinite one-sided plane.
///
/// Only the front face (the side the normal points to) can be hit.
///
/// # Example
///
/// ```
/// use bead_path::{PlaneSurface, ProbeFilter, SurfaceProbe};
/// use nalgebra::{Point3, UnitVector3, Vector3};
///
/// let ground = PlaneSurface::ground();
/// let down = UnitVector3::new_normalize(-Vector3::z());
/// let hit = ground
///     .probe(Point3::new(1.0, 2.0, 0.5), down, 1.0, &ProbeFilter::all())
///     .unwrap();
///
/// assert!((hit.distance - 0.5).abs() < 1e-12);
/// assert!(hit.point.z.abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlaneSurface {
    /// Any point on the plane.
    pub point: Point3<f64>,
    /// Front-face normal.
    pub normal: UnitVector3<f64>,
    /// Layer bits this surface belongs to.
    pub layers: u32,
}

impl PlaneSurface {
    /// Create a plane on every layer.
    #[must_use]
    pub const fn new(point: Point3<f64>, normal: UnitVector3<f64>) -> Self {
        Self {
            point,
            normal,
            layers: u32::MAX,
        }
    }

    /// The `z = 0` plane facing `+Z`.
    #[must_use]
    pub fn ground() -> Self {
        Self::new(Point3::origin(), Vector3::z_axis())
    }

    /// Restrict the plane to the given layers.
    #[must_use]
    pub const fn with_layers(mut self, layers: u32) -> Self {
        self.layers = layers;
        self
    }
}

impl SurfaceProbe for PlaneSurface {
    fn probe(
        &self,
        origin: Point3<f64>,
        direction: UnitVector3<f64>,
        max_distance: f64,
        filter: &ProbeFilter,
    ) -> Option<SurfaceHit> {
        if !filter.accepts(self.layers) {
            return None;
        }

        let normal = self.normal.into_inner();
        let denom = direction.dot(&normal);
        if denom > -f64::EPSILON {
            // Parallel to the plane or approaching the back face
            return None;
        }

        let t = (self.point - origin).dot(&normal) / denom;
        if !(0.0..=max_distance).contains(&t) {
            return None;
        }

        Some(SurfaceHit {
            point: origin + direction.into_inner() * t,
            normal,
            distance: t,
        })
    }
}
