//! Oval cross-section rings.

// Segment counts are at most 64
#![allow(clippy::cast_precision_loss)]

use std::f64::consts::TAU;

use bead_types::{
    BeadConfig, BeadError, BeadMesh, BeadResult, Frame, MAX_RADIAL_SEGMENTS, MIN_RADIAL_SEGMENTS,
    Sample, require_positive,
};
use nalgebra::{Point3, Vector3};

/// An oval bead profile swept along the path.
///
/// The oval is `width` across the binormal and `height` along the frame
/// normal. Its center sits half a height above the sample, so the bottom of
/// the bead touches the sample position.
///
/// The `cos`/`sin` pairs for each radial step are computed once at
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSection {
    width: f64,
    height: f64,
    angles: Vec<(f64, f64)>,
}

impl CrossSection {
    /// Create a cross-section.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `width` or `height` is not positive and finite
    /// - `segments` lies outside `[3, 64]`
    ///
    /// # Example
    ///
    /// ```
    /// use bead_mesh::CrossSection;
    ///
    /// let section = CrossSection::new(0.008, 0.003, 12).unwrap();
    /// assert_eq!(section.segments(), 12);
    /// assert!(CrossSection::new(0.008, 0.003, 2).is_err());
    /// assert!(CrossSection::new(0.0, 0.003, 12).is_err());
    /// ```
    pub fn new(width: f64, height: f64, segments: usize) -> BeadResult<Self> {
        let width = require_positive("bead_width", width)?;
        let height = require_positive("bead_height", height)?;
        if !(MIN_RADIAL_SEGMENTS..=MAX_RADIAL_SEGMENTS).contains(&segments) {
            return Err(BeadError::invalid_segments(
                MIN_RADIAL_SEGMENTS,
                MAX_RADIAL_SEGMENTS,
                segments,
            ));
        }
        Ok(Self::build(width, height, segments))
    }

    /// Create a cross-section from an already clamped configuration.
    #[must_use]
    pub fn from_config(config: &BeadConfig) -> Self {
        Self::build(
            config.bead_width(),
            config.bead_height(),
            config.radial_segments(),
        )
    }

    fn build(width: f64, height: f64, segments: usize) -> Self {
        let angles = (0..segments)
            .map(|j| {
                let theta = TAU * j as f64 / segments as f64;
                (theta.cos(), theta.sin())
            })
            .collect();
        Self {
            width,
            height,
            angles,
        }
    }

    /// Full bead width.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Full bead height.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Vertices per ring.
    #[must_use]
    pub fn segments(&self) -> usize {
        self.angles.len()
    }

    /// Ring angle of step `j`, in radians.
    #[must_use]
    pub fn angle(&self, j: usize) -> f64 {
        TAU * j as f64 / self.segments() as f64
    }

    /// Ring center for a sample: `position + N * height / 2`.
    #[must_use]
    pub fn center(&self, position: &Point3<f64>, frame: &Frame) -> Point3<f64> {
        position + frame.normal * (self.height * 0.5)
    }

    /// Offset of ring vertex `j` from the ring center.
    ///
    /// `B * cos(θ) * width / 2 + N * sin(θ) * height / 2`. Steps past the
    /// last segment wrap around.
    #[must_use]
    pub fn offset(&self, frame: &Frame, j: usize) -> Vector3<f64> {
        let (cos, sin) = self.angles[j % self.angles.len()];
        frame.binormal * (cos * self.width * 0.5) + frame.normal * (sin * self.height * 0.5)
    }

    /// Append one ring of vertices for `sample` to `mesh`.
    ///
    /// `v` is the ring's V texture coordinate; U runs from 0 toward 1
    /// around the ring.
    pub fn push_ring(&self, mesh: &mut BeadMesh, sample: &Sample, v: f64) {
        let frame = sample.frame();
        let center = self.center(&sample.position, &frame);

        for j in 0..self.segments() {
            let offset = self.offset(&frame, j);
            let normal = offset.try_normalize(f64::EPSILON).unwrap_or(frame.normal);
            mesh.push_vertex(center + offset, normal, [self.angle(j) / TAU, v]);
        }
    }
}
