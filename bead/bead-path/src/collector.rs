//! Distance-gated sample acquisition.
//!
//! Each call either appends exactly one sample or leaves the buffer
//! untouched. Rejections are ordinary outcomes, reported as values and never
//! as errors.

use bead_types::{
    BeadConfig, BeadError, BeadResult, DEGENERATE_EPSILON, Sample, TipPose, perpendicular_to,
    require_positive,
};
use nalgebra::{UnitVector3, Vector3};
use tracing::trace;

use crate::buffer::SampleBuffer;
use crate::frames::FrameBuilder;
use crate::probe::{ProbeFilter, SurfaceProbe};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Why a candidate sample was not appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rejection {
    /// Closer than the minimum segment length to the last sample.
    TooClose,
    /// The surface probe found nothing within range.
    ProbeMissed,
    /// The probe direction was degenerate.
    InvalidDirection,
    /// The probe returned a non-finite or degenerate hit.
    InvalidHit,
}

/// Result of one collection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CollectOutcome {
    /// A sample was appended.
    Appended {
        /// Index of the new sample in the buffer.
        index: usize,
        /// Number of old samples evicted to make room.
        evicted: usize,
    },
    /// The candidate was rejected; the buffer is unchanged.
    Rejected(Rejection),
}

impl CollectOutcome {
    /// True if a sample was appended.
    #[must_use]
    pub const fn is_appended(&self) -> bool {
        matches!(self, Self::Appended { .. })
    }
}

/// Sampling parameters taken from [`BeadConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectorParams {
    /// Minimum spacing between consecutive samples.
    pub min_segment_length: f64,
    /// Maximum probe distance.
    pub probe_distance: f64,
    /// Offset along the hit normal.
    pub surface_lift: f64,
    /// Fixed unit probe direction, or `None` for the tip's down axis.
    pub probe_direction: Option<Vector3<f64>>,
    /// Eligible surfaces.
    pub filter: ProbeFilter,
}

impl From<&BeadConfig> for CollectorParams {
    fn from(config: &BeadConfig) -> Self {
        Self {
            min_segment_length: config.min_segment_length(),
            probe_distance: config.probe_distance(),
            surface_lift: config.surface_lift(),
            probe_direction: config.probe_direction(),
            filter: ProbeFilter::layers(config.surface_layers()),
        }
    }
}

/// Gates tool tip positions, projects them onto the surface, and appends
/// accepted samples to a [`SampleBuffer`].
///
/// A candidate is rejected when the probe misses or when the projected
/// position lies closer than `min_segment_length` to the last retained
/// sample. Spacing is measured on the surface, so a stationary tip that
/// tilts can still lay down new samples.
///
/// # Example
///
/// ```
/// use bead_path::{PlaneSurface, SampleBuffer, SampleCollector};
/// use bead_types::{BeadConfig, TipPose};
/// use nalgebra::Point3;
///
/// let config = BeadConfig::default().with_min_segment_length(0.005);
/// let collector = SampleCollector::new(&config);
/// let mut buffer = SampleBuffer::from_config(&config);
/// let ground = PlaneSurface::ground();
///
/// let a = TipPose::from_position(Point3::new(0.0, 0.0, 0.01));
/// let b = TipPose::from_position(Point3::new(0.001, 0.0, 0.01));
/// let c = TipPose::from_position(Point3::new(0.01, 0.0, 0.01));
///
/// assert!(collector.collect(&a, &ground, &mut buffer).is_appended());
/// assert!(!collector.collect(&b, &ground, &mut buffer).is_appended());
/// assert!(collector.collect(&c, &ground, &mut buffer).is_appended());
/// assert_eq!(buffer.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SampleCollector {
    params: CollectorParams,
    frames: FrameBuilder,
}

impl SampleCollector {
    /// Create a collector from configuration.
    #[must_use]
    pub fn new(config: &BeadConfig) -> Self {
        Self {
            params: CollectorParams::from(config),
            frames: FrameBuilder::default(),
        }
    }

    /// Create a collector from explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if `probe_distance` or `min_segment_length` is not
    /// positive and finite, or `surface_lift` is negative or not finite.
    pub fn with_params(params: CollectorParams) -> BeadResult<Self> {
        if !(params.probe_distance.is_finite() && params.probe_distance > 0.0) {
            return Err(BeadError::InvalidProbeDistance(params.probe_distance));
        }
        require_positive("min_segment_length", params.min_segment_length)?;
        if !(params.surface_lift.is_finite() && params.surface_lift >= 0.0) {
            return Err(BeadError::invalid_dimension("surface_lift", params.surface_lift));
        }
        Ok(Self {
            params,
            frames: FrameBuilder::default(),
        })
    }

    /// Use a custom frame builder for tangent correction.
    #[must_use]
    pub const fn with_frame_builder(mut self, frames: FrameBuilder) -> Self {
        self.frames = frames;
        self
    }

    /// Current sampling parameters.
    #[must_use]
    pub const fn params(&self) -> &CollectorParams {
        &self.params
    }

    /// Frame builder used for tangent correction.
    #[must_use]
    pub const fn frame_builder(&self) -> &FrameBuilder {
        &self.frames
    }

    /// Replace the sampling parameters.
    pub fn update_config(&mut self, config: &BeadConfig) {
        self.params = CollectorParams::from(config);
    }

    /// World probe direction for a pose, or `None` if degenerate.
    #[must_use]
    pub fn probe_direction(&self, pose: &TipPose) -> Option<UnitVector3<f64>> {
        let direction = self.params.probe_direction.unwrap_or_else(|| pose.down());
        UnitVector3::try_new(direction, DEGENERATE_EPSILON)
    }

    /// Attempt to append one sample for the given tip pose.
    pub fn collect<P: SurfaceProbe + ?Sized>(
        &self,
        pose: &TipPose,
        probe: &P,
        buffer: &mut SampleBuffer,
    ) -> CollectOutcome {
        let Some(direction) = self.probe_direction(pose) else {
            return reject(Rejection::InvalidDirection);
        };

        let Some(hit) = probe.probe(
            pose.position,
            direction,
            self.params.probe_distance,
            &self.params.filter,
        ) else {
            return reject(Rejection::ProbeMissed);
        };

        if hit.distance > self.params.probe_distance {
            return reject(Rejection::ProbeMissed);
        }

        let normal = match hit.normal.try_normalize(DEGENERATE_EPSILON) {
            Some(n) if hit.is_finite() => n,
            _ => return reject(Rejection::InvalidHit),
        };

        let position = hit.point + normal * self.params.surface_lift;

        let increment = match buffer.latest() {
            Some(last) => {
                let d = nalgebra::distance(&position, &last.position);
                if d < self.params.min_segment_length {
                    return reject(Rejection::TooClose);
                }
                d
            }
            None => 0.0,
        };

        // Provisional tangent: direction from the previous sample.
        let tangent = buffer
            .latest()
            .and_then(|last| (position - last.position).try_normalize(DEGENERATE_EPSILON))
            .unwrap_or_else(|| perpendicular_to(normal));

        let sample = Sample::new(position, normal, buffer.total_length() + increment)
            .with_tangent(tangent);

        let evicted = buffer.push(sample);
        self.frames.correct_after_append(buffer);
        if evicted > 0 {
            self.frames.correct_after_evict(buffer);
        }

        trace!(
            index = buffer.len() - 1,
            evicted,
            cumulative_length = sample.cumulative_length,
            "Sample appended"
        );

        CollectOutcome::Appended {
            index: buffer.len() - 1,
            evicted,
        }
    }
}

fn reject(reason: Rejection) -> CollectOutcome {
    trace!(?reason, "Sample rejected");
    CollectOutcome::Rejected(reason)
}
