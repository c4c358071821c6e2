//! Core types for procedural weld bead meshes.
//!
//! This crate provides the foundational types shared by the bead crates:
//!
//! - [`Sample`] - One surface-projected point of the weld path
//! - [`Frame`] - Orthonormal tangent/normal/binormal triple at a sample
//! - [`TipPose`] - World pose of the tool tip
//! - [`BeadMesh`] - Vertex/normal/UV/index buffers handed to sinks
//! - [`BeadConfig`] - Clamped configuration surface
//! - [`BeadError`] - Programmer-error conditions
//!
//! # Engine Independence
//!
//! Nothing here depends on a rendering or physics engine. Hosts supply
//! surface probes and mesh sinks through the traits in `bead-path` and
//! `bead-mesh`.
//!
//! # Coordinate System
//!
//! Right-handed, Z up. `WORLD_RIGHT` is `+X` and `WORLD_UP` is `+Z`; both are
//! used as binormal fallbacks when the path runs along the surface normal.
//!
//! # Example
//!
//! ```
//! use bead_types::{BeadConfig, Sample};
//! use nalgebra::{Point3, Vector3};
//!
//! let config = BeadConfig::default().with_radial_segments(8);
//! let sample = Sample::new(Point3::origin(), Vector3::z(), 0.0);
//! let frame = sample.frame();
//!
//! assert_eq!(config.radial_segments(), 8);
//! assert!(frame.orthonormality_error() < 1e-12);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod frame;
mod mesh;
mod pose;
mod sample;

pub use config::{
    BeadConfig, MAX_RADIAL_SEGMENTS, MIN_POSITIVE, MIN_RADIAL_SEGMENTS, UvLengthPolicy,
};
pub use error::{BeadError, BeadResult, require_positive};
pub use frame::{
    DEGENERATE_EPSILON, Frame, PARALLEL_EPSILON, WORLD_RIGHT, WORLD_UP, perpendicular_to,
};
pub use mesh::BeadMesh;
pub use pose::TipPose;
pub use sample::Sample;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, UnitQuaternion, UnitVector3, Vector3};
