//! Procedural weld bead meshes.
//!
//! Sweeps an oval cross-section along the sampled weld path and rebuilds a
//! closed tube mesh every tick:
//!
//! - [`CrossSection`] - ring vertices, normals, and UVs around each frame
//! - [`MeshAssembler`] - full-rebuild triangulation of all rings
//! - [`BeadGenerator`] - idle/welding state machine driving the pipeline
//! - [`MeshSink`], [`CollisionSink`], [`TransformProvider`], [`WeldGate`] -
//!   host collaborator seams
//!
//! # Topology
//!
//! With `n` retained samples and `s` radial segments, a rebuild produces
//! `n * s` vertices and `(n - 1) * s * 2` triangles. The tube is open at both
//! ends.
//!
//! # Example
//!
//! ```
//! use bead_mesh::{BeadGenerator, WeldState};
//! use bead_path::PlaneSurface;
//! use bead_types::{BeadConfig, BeadMesh, TipPose};
//! use nalgebra::Point3;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let published = Rc::new(RefCell::new(0usize));
//! let counter = Rc::clone(&published);
//!
//! let mut generator = BeadGenerator::builder()
//!     .config(BeadConfig::coarse())
//!     .surface_probe(PlaneSurface::ground())
//!     .tip_source(|| Some(TipPose::from_position(Point3::new(0.0, 0.0, 0.01))))
//!     .mesh_sink(move |mesh: &BeadMesh| *counter.borrow_mut() = mesh.vertex_count())
//!     .build()
//!     .unwrap();
//!
//! generator.start_welding();
//! assert_eq!(generator.state(), WeldState::Welding);
//! generator.tick();
//! assert_eq!(generator.samples().len(), 1);
//! assert_eq!(*published.borrow(), 0);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod assemble;
mod generator;
mod result;
mod ring;
mod sink;

pub use assemble::MeshAssembler;
pub use generator::{BeadGenerator, BeadGeneratorBuilder};
pub use result::{RebuildStats, SampleOutcome, TickReport, WeldState};
pub use ring::CrossSection;
pub use sink::{
    BoxedCollisionSink, BoxedMeshSink, BoxedTransformProvider, BoxedWeldGate, CollisionSink,
    MeshSink, TransformProvider, WeldGate,
};

// Re-export the lower layers so hosts can depend on this crate alone
pub use bead_path::{
    BufferStats, CollectOutcome, FrameBuilder, PlaneSurface, ProbeFilter, Rejection,
    SampleBuffer, SampleCollector, SurfaceHit, SurfaceProbe,
};
pub use bead_types::{
    BeadConfig, BeadError, BeadMesh, BeadResult, Frame, Sample, TipPose, UvLengthPolicy,
};
