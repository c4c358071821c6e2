//! Weld path sampling.
//!
//! Turns a stream of tool tip poses into an ordered, bounded list of
//! surface-projected samples with corrected tangents:
//!
//! - [`SampleCollector`] - distance gating, surface probing, and appending
//! - [`SampleBuffer`] - bounded history with front eviction
//! - [`FrameBuilder`] - tangent correction and orthonormal frames
//! - [`SurfaceProbe`] - host-implemented directed distance query
//!
//! # Example
//!
//! ```
//! use bead_path::prelude::*;
//! use bead_types::{BeadConfig, TipPose};
//! use nalgebra::Point3;
//!
//! let config = BeadConfig::default();
//! let collector = SampleCollector::new(&config);
//! let mut buffer = SampleBuffer::from_config(&config);
//! let ground = PlaneSurface::ground();
//!
//! for i in 0..10 {
//!     let tip = TipPose::from_position(Point3::new(f64::from(i) * 0.005, 0.0, 0.01));
//!     collector.collect(&tip, &ground, &mut buffer);
//! }
//!
//! assert_eq!(buffer.len(), 10);
//! let frames = FrameBuilder::default().frames(&buffer);
//! assert!(frames.iter().all(|f| f.orthonormality_error() < 1e-9));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod buffer;
mod collector;
mod frames;
mod probe;

pub use buffer::{BufferStats, SampleBuffer};
pub use collector::{CollectOutcome, CollectorParams, Rejection, SampleCollector};
pub use frames::FrameBuilder;
pub use probe::{PlaneSurface, ProbeFilter, SurfaceHit, SurfaceProbe};

/// Convenient imports for path sampling.
pub mod prelude {
    pub use crate::{
        CollectOutcome, FrameBuilder, PlaneSurface, ProbeFilter, Rejection, SampleBuffer,
        SampleCollector, SurfaceHit, SurfaceProbe,
    };
}
