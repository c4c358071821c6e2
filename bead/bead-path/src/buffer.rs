//! Bounded sample history.

use std::collections::VecDeque;

use bead_types::{BeadConfig, Sample, UvLengthPolicy};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An arrival-ordered buffer of path samples with front eviction.
///
/// Backed by a ring buffer so append and evict are O(1) amortized. A
/// capacity of 0 means unbounded.
///
/// The buffer also tracks the running arc length of the path. Eviction never
/// rewrites `cumulative_length` on the retained samples; under
/// [`UvLengthPolicy::RebaseOnEvict`] it instead moves a length base to the
/// new oldest sample, which [`Self::uv_length`] subtracts.
///
/// # Example
///
/// ```
/// use bead_path::SampleBuffer;
/// use bead_types::{Sample, UvLengthPolicy};
/// use nalgebra::{Point3, Vector3};
///
/// let mut buffer = SampleBuffer::new(2, UvLengthPolicy::Continuous);
/// for i in 0..3 {
///     let x = f64::from(i);
///     buffer.push(Sample::new(Point3::new(x, 0.0, 0.0), Vector3::z(), x));
/// }
///
/// assert_eq!(buffer.len(), 2);
/// assert_eq!(buffer.evicted_total(), 1);
/// assert!((buffer.oldest().unwrap().position.x - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    /// Maximum number of samples; 0 for unbounded.
    capacity: usize,

    /// Retained samples, oldest first.
    samples: VecDeque<Sample>,

    /// Cumulative length of the most recently appended sample.
    total_length: f64,

    /// Length subtracted from cumulative lengths when computing V.
    length_base: f64,

    /// V coordinate behaviour across evictions.
    policy: UvLengthPolicy,

    /// Samples evicted since the last clear.
    evicted_total: u64,
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new(0, UvLengthPolicy::Continuous)
    }
}

impl SampleBuffer {
    /// Creates a new buffer.
    ///
    /// # Arguments
    ///
    /// - `capacity`: Maximum number of samples to retain, 0 for unbounded
    /// - `policy`: How the UV length origin follows evictions
    #[must_use]
    pub fn new(capacity: usize, policy: UvLengthPolicy) -> Self {
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity.min(1024)),
            total_length: 0.0,
            length_base: 0.0,
            policy,
            evicted_total: 0,
        }
    }

    /// Creates a buffer sized and configured from a [`BeadConfig`].
    #[must_use]
    pub fn from_config(config: &BeadConfig) -> Self {
        Self::new(config.max_samples(), config.uv_policy())
    }

    /// Returns the capacity of the buffer (0 for unbounded).
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true if the buffer has a capacity limit.
    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        self.capacity > 0
    }

    /// Returns the number of retained samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if no samples are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns true if the next push will evict.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.is_bounded() && self.samples.len() >= self.capacity
    }

    /// Returns the UV length policy.
    #[must_use]
    pub const fn policy(&self) -> UvLengthPolicy {
        self.policy
    }

    /// Cumulative length of the most recently appended sample.
    ///
    /// Unaffected by eviction; reset to 0 by [`Self::clear`].
    #[must_use]
    pub const fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Length subtracted from cumulative lengths when computing V.
    #[must_use]
    pub const fn length_base(&self) -> f64 {
        self.length_base
    }

    /// Number of samples evicted since the last clear.
    #[must_use]
    pub const fn evicted_total(&self) -> u64 {
        self.evicted_total
    }

    /// Appends a sample, evicting the oldest ones if over capacity.
    ///
    /// Returns the number of samples evicted.
    pub fn push(&mut self, sample: Sample) -> usize {
        self.total_length = self.total_length.max(sample.cumulative_length);
        self.samples.push_back(sample);
        self.evict_to_capacity()
    }

    /// Changes the capacity, evicting the oldest samples if necessary.
    ///
    /// Returns the number of samples evicted.
    pub fn set_capacity(&mut self, capacity: usize) -> usize {
        self.capacity = capacity;
        self.evict_to_capacity()
    }

    /// Changes the UV length policy.
    pub fn set_policy(&mut self, policy: UvLengthPolicy) {
        self.policy = policy;
        self.update_length_base();
    }

    /// Removes all samples and resets length tracking to zero.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.total_length = 0.0;
        self.length_base = 0.0;
        self.evicted_total = 0;
    }

    /// Returns the oldest retained sample.
    #[must_use]
    pub fn oldest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Returns the newest sample.
    #[must_use]
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Gets a sample by index (0 = oldest).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Sample> {
        self.samples.get_mut(index)
    }

    /// Returns an iterator over retained samples, oldest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Sample> {
        self.samples.iter()
    }

    /// V-direction length of a sample under the current policy.
    #[must_use]
    pub fn uv_length(&self, sample: &Sample) -> f64 {
        sample.cumulative_length - self.length_base
    }

    /// Path length spanned by the retained samples.
    #[must_use]
    pub fn retained_length(&self) -> f64 {
        match (self.samples.front(), self.samples.back()) {
            (Some(first), Some(last)) => last.cumulative_length - first.cumulative_length,
            _ => 0.0,
        }
    }

    fn evict_to_capacity(&mut self) -> usize {
        if !self.is_bounded() {
            return 0;
        }
        let mut evicted = 0;
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
            evicted += 1;
        }
        if evicted > 0 {
            self.evicted_total += evicted as u64;
            self.update_length_base();
        }
        evicted
    }

    fn update_length_base(&mut self) {
        self.length_base = match self.policy {
            UvLengthPolicy::Continuous => 0.0,
            UvLengthPolicy::RebaseOnEvict => {
                self.samples.front().map_or(0.0, |s| s.cumulative_length)
            }
        };
    }
}

/// Statistics about a sample buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BufferStats {
    /// Number of retained samples.
    pub count: usize,

    /// Buffer capacity (0 for unbounded).
    pub capacity: usize,

    /// Samples evicted since the last clear.
    pub evicted: u64,

    /// Cumulative length of the newest sample.
    pub total_length: f64,

    /// Path length spanned by retained samples.
    pub retained_length: f64,
}

impl SampleBuffer {
    /// Computes statistics about the buffer.
    #[must_use]
    pub fn stats(&self) -> BufferStats {
        BufferStats {
            count: self.len(),
            capacity: self.capacity,
            evicted: self.evicted_total,
            total_length: self.total_length,
            retained_length: self.retained_length(),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::cast_precision_loss
)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    fn sample_at(x: f64) -> Sample {
        Sample::new(Point3::new(x, 0.0, 0.0), Vector3::z(), x)
    }

    fn filled(capacity: usize, count: usize, policy: UvLengthPolicy) -> SampleBuffer {
        let mut buffer = SampleBuffer::new(capacity, policy);
        for i in 0..count {
            buffer.push(sample_at(i as f64 * 0.01));
        }
        buffer
    }

    #[test]
    fn buffer_new() {
        let buffer = SampleBuffer::new(100, UvLengthPolicy::Continuous);
        assert_eq!(buffer.capacity(), 100);
        assert!(buffer.is_bounded());
        assert!(buffer.is_empty());
        assert!(!buffer.is_full());
        assert_eq!(buffer.total_length(), 0.0);
    }

    #[test]
    fn unbounded_never_evicts() {
        let buffer = filled(0, 500, UvLengthPolicy::Continuous);
        assert!(!buffer.is_bounded());
        assert!(!buffer.is_full());
        assert_eq!(buffer.len(), 500);
        assert_eq!(buffer.evicted_total(), 0);
    }

    #[test]
    fn capacity_five_seven_pushes() {
        let buffer = filled(5, 7, UvLengthPolicy::Continuous);
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.evicted_total(), 2);
        // Samples 3..=7 (1-based) remain: x = 0.02 .. 0.06
        let xs: Vec<f64> = buffer.iter().map(|s| s.position.x).collect();
        for (i, x) in xs.iter().enumerate() {
            assert_relative_eq!(*x, (i + 2) as f64 * 0.01, epsilon = 1e-12);
        }
    }

    #[test]
    fn push_reports_evictions() {
        let mut buffer = SampleBuffer::new(2, UvLengthPolicy::Continuous);
        assert_eq!(buffer.push(sample_at(0.0)), 0);
        assert_eq!(buffer.push(sample_at(1.0)), 0);
        assert!(buffer.is_full());
        assert_eq!(buffer.push(sample_at(2.0)), 1);
    }

    #[test]
    fn shrinking_capacity_evicts_oldest() {
        let mut buffer = filled(0, 10, UvLengthPolicy::Continuous);
        assert_eq!(buffer.set_capacity(4), 6);
        assert_eq!(buffer.len(), 4);
        assert_relative_eq!(buffer.oldest().unwrap().position.x, 0.06, epsilon = 1e-12);
    }

    #[test]
    fn continuous_policy_keeps_length_origin() {
        let buffer = filled(3, 6, UvLengthPolicy::Continuous);
        assert_eq!(buffer.length_base(), 0.0);
        let oldest = buffer.oldest().unwrap();
        assert_relative_eq!(buffer.uv_length(oldest), 0.03, epsilon = 1e-12);
        assert_relative_eq!(buffer.total_length(), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn rebase_policy_moves_length_origin() {
        let buffer = filled(3, 6, UvLengthPolicy::RebaseOnEvict);
        let oldest = buffer.oldest().unwrap();
        assert_relative_eq!(buffer.uv_length(oldest), 0.0, epsilon = 1e-12);
        let latest = buffer.latest().unwrap();
        assert_relative_eq!(buffer.uv_length(latest), 0.02, epsilon = 1e-12);
        // Stored cumulative lengths are untouched.
        assert_relative_eq!(oldest.cumulative_length, 0.03, epsilon = 1e-12);
    }

    #[test]
    fn switching_policy_updates_base() {
        let mut buffer = filled(3, 6, UvLengthPolicy::Continuous);
        buffer.set_policy(UvLengthPolicy::RebaseOnEvict);
        assert_relative_eq!(buffer.length_base(), 0.03, epsilon = 1e-12);
        buffer.set_policy(UvLengthPolicy::Continuous);
        assert_eq!(buffer.length_base(), 0.0);
    }

    #[test]
    fn clear_resets_everything() {
        let mut buffer = filled(3, 6, UvLengthPolicy::RebaseOnEvict);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.total_length(), 0.0);
        assert_eq!(buffer.length_base(), 0.0);
        assert_eq!(buffer.evicted_total(), 0);
        assert_eq!(buffer.capacity(), 3);
    }

    #[test]
    fn stats() {
        let buffer = filled(4, 6, UvLengthPolicy::Continuous);
        let stats = buffer.stats();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.capacity, 4);
        assert_eq!(stats.evicted, 2);
        assert_relative_eq!(stats.total_length, 0.05, epsilon = 1e-12);
        assert_relative_eq!(stats.retained_length, 0.03, epsilon = 1e-12);
    }

    #[test]
    fn from_config() {
        let config = BeadConfig::default()
            .with_max_samples(7)
            .with_uv_policy(UvLengthPolicy::RebaseOnEvict);
        let buffer = SampleBuffer::from_config(&config);
        assert_eq!(buffer.capacity(), 7);
        assert_eq!(buffer.policy(), UvLengthPolicy::RebaseOnEvict);
    }
}
