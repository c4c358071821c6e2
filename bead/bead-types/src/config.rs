//! Bead generator configuration.
//!
//! Every value is validated at assignment: out-of-range numbers are clamped to
//! the nearest valid value and non-finite numbers are ignored, so a
//! `BeadConfig` can never carry a value that would corrupt topology at
//! rebuild time.

use nalgebra::Vector3;
use tracing::warn;

use crate::frame::DEGENERATE_EPSILON;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest value accepted for strictly positive lengths and scales.
pub const MIN_POSITIVE: f64 = 1e-6;

/// Minimum number of radial segments in a ring.
pub const MIN_RADIAL_SEGMENTS: usize = 3;

/// Maximum number of radial segments in a ring.
pub const MAX_RADIAL_SEGMENTS: usize = 64;

/// How the V texture coordinate behaves when old samples are evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UvLengthPolicy {
    /// V keeps measuring from the first sample ever appended. After an
    /// eviction the retained bead no longer starts at `v = 0`.
    #[default]
    Continuous,
    /// V is measured from the current oldest retained sample, so the bead
    /// always starts at `v = 0` and the texture slides along as history is
    /// dropped.
    RebaseOnEvict,
}

/// Configuration for sampling and bead extrusion.
///
/// # Example
///
/// ```
/// use bead_types::BeadConfig;
///
/// let config = BeadConfig::default()
///     .with_radial_segments(1)
///     .with_bead_width(-4.0)
///     .with_max_samples(256);
///
/// // Out-of-range values are clamped at assignment.
/// assert_eq!(config.radial_segments(), 3);
/// assert!(config.bead_width() > 0.0);
/// assert_eq!(config.max_samples(), 256);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "BeadConfigData"))]
pub struct BeadConfig {
    min_segment_length: f64,
    probe_distance: f64,
    surface_lift: f64,
    probe_direction: Option<Vector3<f64>>,
    surface_layers: u32,
    bead_width: f64,
    bead_height: f64,
    radial_segments: usize,
    uv_length_scale: f64,
    uv_policy: UvLengthPolicy,
    max_samples: usize,
    rebuild_every_tick: bool,
    generate_collision_proxy: bool,
}

impl Default for BeadConfig {
    fn default() -> Self {
        Self {
            min_segment_length: 0.002, // 2 mm
            probe_distance: 0.05,      // 5 cm
            surface_lift: 0.0002,
            probe_direction: None,
            surface_layers: u32::MAX,
            bead_width: 0.008,
            bead_height: 0.003,
            radial_segments: 12,
            uv_length_scale: 0.05,
            uv_policy: UvLengthPolicy::Continuous,
            max_samples: 2048,
            rebuild_every_tick: true,
            generate_collision_proxy: false,
        }
    }
}

/// Unvalidated wire form of [`BeadConfig`].
///
/// Deserialized configs pass through the setters, so stored values get the
/// same clamping as values assigned in code. Missing fields take defaults.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(default)]
struct BeadConfigData {
    min_segment_length: f64,
    probe_distance: f64,
    surface_lift: f64,
    probe_direction: Option<Vector3<f64>>,
    surface_layers: u32,
    bead_width: f64,
    bead_height: f64,
    radial_segments: usize,
    uv_length_scale: f64,
    uv_policy: UvLengthPolicy,
    max_samples: usize,
    rebuild_every_tick: bool,
    generate_collision_proxy: bool,
}

#[cfg(feature = "serde")]
impl Default for BeadConfigData {
    fn default() -> Self {
        let BeadConfig {
            min_segment_length,
            probe_distance,
            surface_lift,
            probe_direction,
            surface_layers,
            bead_width,
            bead_height,
            radial_segments,
            uv_length_scale,
            uv_policy,
            max_samples,
            rebuild_every_tick,
            generate_collision_proxy,
        } = BeadConfig::default();
        Self {
            min_segment_length,
            probe_distance,
            surface_lift,
            probe_direction,
            surface_layers,
            bead_width,
            bead_height,
            radial_segments,
            uv_length_scale,
            uv_policy,
            max_samples,
            rebuild_every_tick,
            generate_collision_proxy,
        }
    }
}

#[cfg(feature = "serde")]
impl From<BeadConfigData> for BeadConfig {
    fn from(data: BeadConfigData) -> Self {
        let mut config = Self::default();
        config.set_min_segment_length(data.min_segment_length);
        config.set_probe_distance(data.probe_distance);
        config.set_surface_lift(data.surface_lift);
        config.set_probe_direction(data.probe_direction);
        config.set_surface_layers(data.surface_layers);
        config.set_bead_width(data.bead_width);
        config.set_bead_height(data.bead_height);
        config.set_radial_segments(data.radial_segments);
        config.set_uv_length_scale(data.uv_length_scale);
        config.set_uv_policy(data.uv_policy);
        config.set_max_samples(data.max_samples);
        config.set_rebuild_every_tick(data.rebuild_every_tick);
        config.set_generate_collision_proxy(data.generate_collision_proxy);
        config
    }
}

/// Clamp `value` to at least `min`, keeping `current` if `value` is not finite.
fn clamp_min(name: &str, current: f64, value: f64, min: f64) -> f64 {
    if value.is_finite() {
        value.max(min)
    } else {
        warn!(field = name, value, "Ignoring non-finite configuration value");
        current
    }
}

impl BeadConfig {
    /// Create a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dense, smooth bead for close-up viewing.
    #[must_use]
    pub fn fine() -> Self {
        Self {
            min_segment_length: 0.001,
            radial_segments: 24,
            max_samples: 4096,
            ..Self::default()
        }
    }

    /// Sparse, cheap bead for constrained frame budgets.
    #[must_use]
    pub fn coarse() -> Self {
        Self {
            min_segment_length: 0.005,
            radial_segments: 6,
            max_samples: 512,
            ..Self::default()
        }
    }

    // ----------------------------------------------------------------------
    // Getters
    // ----------------------------------------------------------------------

    /// Minimum spacing between consecutive samples.
    #[must_use]
    pub const fn min_segment_length(&self) -> f64 {
        self.min_segment_length
    }

    /// Maximum surface probe distance.
    #[must_use]
    pub const fn probe_distance(&self) -> f64 {
        self.probe_distance
    }

    /// Offset along the hit normal applied to each sample.
    #[must_use]
    pub const fn surface_lift(&self) -> f64 {
        self.surface_lift
    }

    /// Fixed unit probe direction, or `None` to use the tip's down axis.
    #[must_use]
    pub const fn probe_direction(&self) -> Option<Vector3<f64>> {
        self.probe_direction
    }

    /// Bit mask of surface layers eligible for welding.
    #[must_use]
    pub const fn surface_layers(&self) -> u32 {
        self.surface_layers
    }

    /// Full bead width (across the binormal).
    #[must_use]
    pub const fn bead_width(&self) -> f64 {
        self.bead_width
    }

    /// Full bead height (along the cross-section normal).
    #[must_use]
    pub const fn bead_height(&self) -> f64 {
        self.bead_height
    }

    /// Vertices per ring.
    #[must_use]
    pub const fn radial_segments(&self) -> usize {
        self.radial_segments
    }

    /// Path length mapped to one unit of V.
    #[must_use]
    pub const fn uv_length_scale(&self) -> f64 {
        self.uv_length_scale
    }

    /// V coordinate behaviour across evictions.
    #[must_use]
    pub const fn uv_policy(&self) -> UvLengthPolicy {
        self.uv_policy
    }

    /// Sample capacity; 0 means unbounded.
    #[must_use]
    pub const fn max_samples(&self) -> usize {
        self.max_samples
    }

    /// Whether welding ticks rebuild the mesh automatically.
    #[must_use]
    pub const fn rebuild_every_tick(&self) -> bool {
        self.rebuild_every_tick
    }

    /// Whether rebuilds also replace the collision proxy.
    #[must_use]
    pub const fn generate_collision_proxy(&self) -> bool {
        self.generate_collision_proxy
    }

    // ----------------------------------------------------------------------
    // Clamping setters
    // ----------------------------------------------------------------------

    /// Set the minimum sample spacing (clamped to `> 0`).
    pub fn set_min_segment_length(&mut self, value: f64) {
        self.min_segment_length = clamp_min(
            "min_segment_length",
            self.min_segment_length,
            value,
            MIN_POSITIVE,
        );
    }

    /// Set the probe distance (clamped to `> 0`).
    pub fn set_probe_distance(&mut self, value: f64) {
        self.probe_distance = clamp_min("probe_distance", self.probe_distance, value, MIN_POSITIVE);
    }

    /// Set the surface lift (clamped to `>= 0`).
    pub fn set_surface_lift(&mut self, value: f64) {
        self.surface_lift = clamp_min("surface_lift", self.surface_lift, value, 0.0);
    }

    /// Set a fixed probe direction.
    ///
    /// The direction is normalized. `None`, a zero vector, or a non-finite
    /// vector selects the tip's local down axis instead.
    pub fn set_probe_direction(&mut self, direction: Option<Vector3<f64>>) {
        self.probe_direction = direction
            .filter(|d| d.iter().all(|c| c.is_finite()))
            .and_then(|d| d.try_normalize(DEGENERATE_EPSILON));
    }

    /// Set the eligible surface layer mask.
    pub fn set_surface_layers(&mut self, layers: u32) {
        self.surface_layers = layers;
    }

    /// Set the bead width (clamped to `> 0`).
    pub fn set_bead_width(&mut self, value: f64) {
        self.bead_width = clamp_min("bead_width", self.bead_width, value, MIN_POSITIVE);
    }

    /// Set the bead height (clamped to `> 0`).
    pub fn set_bead_height(&mut self, value: f64) {
        self.bead_height = clamp_min("bead_height", self.bead_height, value, MIN_POSITIVE);
    }

    /// Set the radial segment count (clamped to `[3, 64]`).
    pub fn set_radial_segments(&mut self, value: usize) {
        self.radial_segments = value.clamp(MIN_RADIAL_SEGMENTS, MAX_RADIAL_SEGMENTS);
    }

    /// Set the UV length scale (clamped to `> 0`).
    pub fn set_uv_length_scale(&mut self, value: f64) {
        self.uv_length_scale = clamp_min("uv_length_scale", self.uv_length_scale, value, MIN_POSITIVE);
    }

    /// Set the UV length policy.
    pub fn set_uv_policy(&mut self, policy: UvLengthPolicy) {
        self.uv_policy = policy;
    }

    /// Set the sample capacity; 0 means unbounded.
    pub fn set_max_samples(&mut self, value: usize) {
        self.max_samples = value;
    }

    /// Enable or disable automatic per-tick rebuilds.
    pub fn set_rebuild_every_tick(&mut self, enabled: bool) {
        self.rebuild_every_tick = enabled;
    }

    /// Enable or disable collision proxy generation.
    pub fn set_generate_collision_proxy(&mut self, enabled: bool) {
        self.generate_collision_proxy = enabled;
    }

    // ----------------------------------------------------------------------
    // Builders
    // ----------------------------------------------------------------------

    /// Set the minimum sample spacing.
    #[must_use]
    pub fn with_min_segment_length(mut self, value: f64) -> Self {
        self.set_min_segment_length(value);
        self
    }

    /// Set the probe distance.
    #[must_use]
    pub fn with_probe_distance(mut self, value: f64) -> Self {
        self.set_probe_distance(value);
        self
    }

    /// Set the surface lift.
    #[must_use]
    pub fn with_surface_lift(mut self, value: f64) -> Self {
        self.set_surface_lift(value);
        self
    }

    /// Use a fixed probe direction instead of the tip's down axis.
    #[must_use]
    pub fn with_probe_direction(mut self, direction: Vector3<f64>) -> Self {
        self.set_probe_direction(Some(direction));
        self
    }

    /// Set the eligible surface layer mask.
    #[must_use]
    pub fn with_surface_layers(mut self, layers: u32) -> Self {
        self.set_surface_layers(layers);
        self
    }

    /// Set the bead width.
    #[must_use]
    pub fn with_bead_width(mut self, value: f64) -> Self {
        self.set_bead_width(value);
        self
    }

    /// Set the bead height.
    #[must_use]
    pub fn with_bead_height(mut self, value: f64) -> Self {
        self.set_bead_height(value);
        self
    }

    /// Set the radial segment count.
    #[must_use]
    pub fn with_radial_segments(mut self, value: usize) -> Self {
        self.set_radial_segments(value);
        self
    }

    /// Set the UV length scale.
    #[must_use]
    pub fn with_uv_length_scale(mut self, value: f64) -> Self {
        self.set_uv_length_scale(value);
        self
    }

    /// Set the UV length policy.
    #[must_use]
    pub fn with_uv_policy(mut self, policy: UvLengthPolicy) -> Self {
        self.set_uv_policy(policy);
        self
    }

    /// Set the sample capacity; 0 means unbounded.
    #[must_use]
    pub fn with_max_samples(mut self, value: usize) -> Self {
        self.set_max_samples(value);
        self
    }

    /// Enable or disable automatic per-tick rebuilds.
    #[must_use]
    pub fn with_rebuild_every_tick(mut self, enabled: bool) -> Self {
        self.set_rebuild_every_tick(enabled);
        self
    }

    /// Enable or disable collision proxy generation.
    #[must_use]
    pub fn with_collision_proxy(mut self, enabled: bool) -> Self {
        self.set_generate_collision_proxy(enabled);
        self
    }
}
