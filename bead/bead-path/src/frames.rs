//! Tangent correction and per-sample frames.
//!
//! Tangents are re-derived whenever the path grows or loses its head, using
//! central differences for interior samples and one-sided differences at the
//! ends. A difference shorter than the epsilon leaves the old tangent in
//! place, so a tangent is never zeroed.

use bead_types::{DEGENERATE_EPSILON, Frame};
use nalgebra::Vector3;

use crate::buffer::SampleBuffer;

/// Computes and repairs sample tangents and builds orthonormal frames.
///
/// # Example
///
/// ```
/// use bead_path::{FrameBuilder, SampleBuffer};
/// use bead_types::{Sample, UvLengthPolicy};
/// use nalgebra::{Point3, Vector3};
///
/// let mut buffer = SampleBuffer::new(0, UvLengthPolicy::Continuous);
/// let builder = FrameBuilder::default();
///
/// for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]] {
///     buffer.push(Sample::new(Point3::from(p), Vector3::z(), 0.0));
///     builder.correct_after_append(&mut buffer);
/// }
///
/// let frames = builder.frames(&buffer);
/// assert_eq!(frames.len(), 3);
/// // The middle tangent is the central difference (1, 1, 0) normalized.
/// assert!((frames[1].tangent.x - frames[1].tangent.y).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameBuilder {
    /// Differences shorter than this keep the previous tangent.
    pub epsilon: f64,
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self {
            epsilon: DEGENERATE_EPSILON,
        }
    }
}

impl FrameBuilder {
    /// Create a frame builder with a custom degeneracy epsilon.
    #[must_use]
    pub const fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Corrected tangent for the sample at `index`, if one can be derived.
    ///
    /// Interior samples use `next - prev`; the first sample uses
    /// `next - self`; the last sample uses `self - prev`. Returns `None` for
    /// buffers with fewer than two samples or degenerate differences.
    #[must_use]
    pub fn tangent_at(&self, buffer: &SampleBuffer, index: usize) -> Option<Vector3<f64>> {
        let n = buffer.len();
        if n < 2 || index >= n {
            return None;
        }

        let (from, to) = if index == 0 {
            (0, 1)
        } else if index == n - 1 {
            (n - 2, n - 1)
        } else {
            (index - 1, index + 1)
        };

        let a = buffer.get(from)?;
        let b = buffer.get(to)?;
        (b.position - a.position).try_normalize(self.epsilon)
    }

    /// Recompute one sample's tangent in place.
    ///
    /// Returns true if the tangent changed.
    pub fn correct(&self, buffer: &mut SampleBuffer, index: usize) -> bool {
        let Some(tangent) = self.tangent_at(buffer, index) else {
            return false;
        };
        match buffer.get_mut(index) {
            Some(sample) => {
                sample.tangent = tangent;
                true
            }
            None => false,
        }
    }

    /// Repair tangents after a sample was appended.
    ///
    /// The new sample becomes the tail (one-sided difference) and its
    /// predecessor becomes interior, or the head if it is the first sample.
    pub fn correct_after_append(&self, buffer: &mut SampleBuffer) {
        let n = buffer.len();
        if n < 2 {
            return;
        }
        self.correct(buffer, n - 1);
        self.correct(buffer, n - 2);
    }

    /// Repair the head tangent after eviction made a new sample the oldest.
    pub fn correct_after_evict(&self, buffer: &mut SampleBuffer) {
        self.correct(buffer, 0);
    }

    /// Recompute every tangent from scratch.
    pub fn correct_all(&self, buffer: &mut SampleBuffer) {
        for index in 0..buffer.len() {
            self.correct(buffer, index);
        }
    }

    /// Orthonormal frame for the sample at `index`.
    #[must_use]
    pub fn frame_at(&self, buffer: &SampleBuffer, index: usize) -> Option<Frame> {
        buffer.get(index).map(bead_types::Sample::frame)
    }

    /// One orthonormal frame per retained sample, oldest first.
    #[must_use]
    pub fn frames(&self, buffer: &SampleBuffer) -> Vec<Frame> {
        buffer.iter().map(bead_types::Sample::frame).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bead_types::{Sample, UvLengthPolicy};
    use nalgebra::Point3;

    fn buffer_from(points: &[[f64; 3]]) -> SampleBuffer {
        let builder = FrameBuilder::default();
        let mut buffer = SampleBuffer::new(0, UvLengthPolicy::Continuous);
        for p in points {
            buffer.push(Sample::new(Point3::from(*p), Vector3::z(), 0.0));
            builder.correct_after_append(&mut buffer);
        }
        buffer
    }

    #[test]
    fn single_sample_keeps_fallback_tangent() {
        let buffer = buffer_from(&[[0.0, 0.0, 0.0]]);
        let s = buffer.get(0).unwrap();
        assert_relative_eq!(s.tangent.norm(), 1.0, epsilon = 1e-12);
        assert!(FrameBuilder::default().tangent_at(&buffer, 0).is_none());
    }

    #[test]
    fn straight_line_tangents() {
        let buffer = buffer_from(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        for s in buffer.iter() {
            assert_relative_eq!(s.tangent, Vector3::x(), epsilon = 1e-12);
        }
    }

    #[test]
    fn quarter_turn_central_difference() {
        let buffer = buffer_from(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]);
        assert_relative_eq!(buffer.get(0).unwrap().tangent, Vector3::x(), epsilon = 1e-12);
        let mid = Vector3::new(1.0, 1.0, 0.0).normalize();
        assert_relative_eq!(buffer.get(1).unwrap().tangent, mid, epsilon = 1e-12);
        assert_relative_eq!(buffer.get(2).unwrap().tangent, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn appending_retroactively_corrects_previous_tail() {
        let mut buffer = buffer_from(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        assert_relative_eq!(buffer.get(1).unwrap().tangent, Vector3::x(), epsilon = 1e-12);

        buffer.push(Sample::new(Point3::new(1.0, 1.0, 0.0), Vector3::z(), 0.0));
        FrameBuilder::default().correct_after_append(&mut buffer);

        let mid = Vector3::new(1.0, 1.0, 0.0).normalize();
        assert_relative_eq!(buffer.get(1).unwrap().tangent, mid, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_difference_keeps_previous_tangent() {
        let builder = FrameBuilder::default();
        let mut buffer = buffer_from(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        // A duplicate point makes the tail difference zero.
        buffer.push(Sample::new(Point3::new(1.0, 0.0, 0.0), Vector3::z(), 0.0).with_tangent(Vector3::y()));
        builder.correct_after_append(&mut buffer);

        assert_relative_eq!(buffer.get(2).unwrap().tangent, Vector3::y(), epsilon = 1e-12);
        // Interior sample still sees a non-degenerate central difference.
        assert_relative_eq!(buffer.get(1).unwrap().tangent, Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn eviction_turns_interior_into_head() {
        let builder = FrameBuilder::default();
        let mut buffer = SampleBuffer::new(2, UvLengthPolicy::Continuous);
        for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]] {
            let evicted = buffer.push(Sample::new(Point3::from(p), Vector3::z(), 0.0));
            builder.correct_after_append(&mut buffer);
            if evicted > 0 {
                builder.correct_after_evict(&mut buffer);
            }
        }
        assert_eq!(buffer.len(), 2);
        assert_relative_eq!(buffer.get(0).unwrap().tangent, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn frames_are_orthonormal_and_track_surface() {
        let buffer = buffer_from(&[
            [0.0, 0.0, 0.0],
            [0.01, 0.002, 0.0],
            [0.02, 0.001, 0.0],
            [0.03, -0.003, 0.0],
        ]);
        let frames = FrameBuilder::default().frames(&buffer);
        assert_eq!(frames.len(), 4);
        for frame in &frames {
            assert!(frame.orthonormality_error() < 1e-9);
            assert!(frame.normal.dot(&Vector3::z()) > 0.99);
        }
    }

    #[test]
    fn correct_all_matches_incremental() {
        let points = [[0.0, 0.0, 0.0], [0.5, 0.1, 0.0], [1.0, 0.4, 0.0], [1.2, 1.0, 0.0]];
        let incremental = buffer_from(&points);

        let mut batch = SampleBuffer::new(0, UvLengthPolicy::Continuous);
        for p in &points {
            batch.push(Sample::new(Point3::from(*p), Vector3::z(), 0.0));
        }
        FrameBuilder::default().correct_all(&mut batch);

        for (a, b) in incremental.iter().zip(batch.iter()) {
            assert_relative_eq!(a.tangent, b.tangent, epsilon = 1e-12);
        }
    }

    #[test]
    fn frame_at_out_of_range() {
        let buffer = buffer_from(&[[0.0, 0.0, 0.0]]);
        assert!(FrameBuilder::default().frame_at(&buffer, 0).is_some());
        assert!(FrameBuilder::default().frame_at(&buffer, 1).is_none());
    }
}
