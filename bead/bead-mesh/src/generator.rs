//! The tick-driven bead generator.
//!
//! [`BeadGenerator`] owns the sample history and the published mesh, and
//! wires the host collaborators together:
//!
//! ```text
//! tip pose → gate → collector (probe, append, evict, tangents)
//!          → assembler (rings, triangles) → mesh sink / collision sink
//! ```
//!
//! All work happens synchronously inside [`BeadGenerator::tick`]. A rebuild
//! assembles into a fresh [`BeadMesh`] and swaps it into an [`Arc`], so
//! snapshots returned by [`BeadGenerator::latest_mesh`] are never mutated.

use std::sync::Arc;

use bead_path::{SampleBuffer, SampleCollector, SurfaceProbe};
use bead_types::{BeadConfig, BeadError, BeadMesh, BeadResult, Frame};
use tracing::{debug, info, trace, warn};

use crate::assemble::MeshAssembler;
use crate::result::{RebuildStats, SampleOutcome, TickReport, WeldState};
use crate::sink::{
    BoxedCollisionSink, BoxedMeshSink, BoxedTransformProvider, BoxedWeldGate, CollisionSink,
    MeshSink, TransformProvider, WeldGate,
};

/// Procedural weld bead generator.
///
/// # Example
///
/// ```
/// use bead_mesh::{BeadGenerator, SampleOutcome};
/// use bead_path::PlaneSurface;
/// use bead_types::{BeadConfig, BeadMesh, TipPose};
/// use nalgebra::Point3;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let tip = Rc::new(Cell::new(None));
/// let source = Rc::clone(&tip);
///
/// let mut generator = BeadGenerator::builder()
///     .config(BeadConfig::default().with_radial_segments(8))
///     .surface_probe(PlaneSurface::ground())
///     .tip_source(move || source.get())
///     .mesh_sink(|_mesh: &BeadMesh| {})
///     .build()
///     .unwrap();
///
/// generator.start_welding();
/// for i in 0..5 {
///     tip.set(Some(TipPose::from_position(Point3::new(f64::from(i) * 0.01, 0.0, 0.01))));
///     let report = generator.tick();
///     assert!(report.outcome.is_appended());
/// }
///
/// assert_eq!(generator.latest_mesh().vertex_count(), 5 * 8);
/// ```
pub struct BeadGenerator {
    config: BeadConfig,
    state: WeldState,
    collector: SampleCollector,
    buffer: SampleBuffer,
    assembler: MeshAssembler,
    mesh: Arc<BeadMesh>,
    generation: u64,
    probe: Box<dyn SurfaceProbe>,
    tip: Option<BoxedTransformProvider>,
    sink: BoxedMeshSink,
    collision: Option<BoxedCollisionSink>,
    gate: Option<BoxedWeldGate>,
}

impl std::fmt::Debug for BeadGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeadGenerator")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("samples", &self.buffer.len())
            .field("generation", &self.generation)
            .field("tip_source", &self.tip.is_some())
            .field("collision_sink", &self.collision.is_some())
            .field("weld_gate", &self.gate.is_some())
            .finish_non_exhaustive()
    }
}

impl BeadGenerator {
    /// Start building a generator.
    #[must_use]
    pub fn builder() -> BeadGeneratorBuilder {
        BeadGeneratorBuilder::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> WeldState {
        self.state
    }

    /// True while welding.
    #[must_use]
    pub const fn is_welding(&self) -> bool {
        self.state.is_welding()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &BeadConfig {
        &self.config
    }

    /// Retained samples.
    #[must_use]
    pub const fn samples(&self) -> &SampleBuffer {
        &self.buffer
    }

    /// Orthonormal frame of every retained sample, oldest first.
    #[must_use]
    pub fn frames(&self) -> Vec<Frame> {
        self.collector.frame_builder().frames(&self.buffer)
    }

    /// Snapshot of the most recently published mesh.
    #[must_use]
    pub fn latest_mesh(&self) -> Arc<BeadMesh> {
        Arc::clone(&self.mesh)
    }

    /// Number of meshes published so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Enter the welding state.
    ///
    /// Returns false if already welding.
    pub fn start_welding(&mut self) -> bool {
        if self.state.is_welding() {
            return false;
        }
        self.state = WeldState::Welding;
        info!(samples = self.buffer.len(), "Welding started");
        true
    }

    /// Leave the welding state, keeping the sample history.
    ///
    /// Returns false if already idle.
    pub fn stop_welding(&mut self) -> bool {
        if !self.state.is_welding() {
            return false;
        }
        self.state = WeldState::Idle;
        info!(
            samples = self.buffer.len(),
            length = self.buffer.total_length(),
            "Welding stopped"
        );
        true
    }

    /// Drop every sample, reset the path length, and publish an empty mesh.
    ///
    /// Allowed in either state; the state is unchanged.
    pub fn clear(&mut self) -> RebuildStats {
        let dropped = self.buffer.len();
        self.buffer.clear();
        info!(dropped, "Bead cleared");
        self.publish(BeadMesh::new(), 0)
    }

    /// Replace the configuration.
    ///
    /// Shrinking `max_samples` evicts the oldest samples immediately. The
    /// mesh is not rebuilt until the next rebuild.
    pub fn set_config(&mut self, config: BeadConfig) {
        self.collector.update_config(&config);
        self.buffer.set_policy(config.uv_policy());
        let evicted = self.buffer.set_capacity(config.max_samples());
        if evicted > 0 {
            self.collector.frame_builder().correct_after_evict(&mut self.buffer);
        }
        self.assembler = MeshAssembler::from_config(&config);
        if config.generate_collision_proxy() && self.collision.is_none() {
            warn!("Collision proxy enabled without a collision sink");
        }
        debug!(evicted, "Configuration updated");
        self.config = config;
    }

    /// Advance one simulation step.
    ///
    /// While welding, samples the tip pose once, consults the weld gate,
    /// attempts one sample, and rebuilds if `rebuild_every_tick` is set and
    /// a sample was appended or at least two samples are retained. Without a
    /// tip source, or when it yields no finite pose, the tick reports
    /// [`SampleOutcome::NoPose`] and changes nothing.
    pub fn tick(&mut self) -> TickReport {
        if !self.state.is_welding() {
            return TickReport::idle();
        }

        let pose = match self.tip.as_ref().and_then(|tip| tip.current_tip_pose()) {
            Some(pose) if pose.is_finite() => pose,
            _ => {
                trace!("No tip pose this tick");
                return TickReport {
                    outcome: SampleOutcome::NoPose,
                    rebuild: None,
                };
            }
        };

        if let Some(gate) = &self.gate {
            if !gate.allows_deposit(&pose) {
                return TickReport {
                    outcome: SampleOutcome::Gated,
                    rebuild: None,
                };
            }
        }

        let outcome = SampleOutcome::from(self.collector.collect(
            &pose,
            self.probe.as_ref(),
            &mut self.buffer,
        ));

        let rebuild = (self.config.rebuild_every_tick()
            && (outcome.is_appended() || self.buffer.len() > 1))
            .then(|| self.rebuild());

        TickReport { outcome, rebuild }
    }

    /// Rebuild the mesh from every retained sample and publish it.
    pub fn rebuild(&mut self) -> RebuildStats {
        let mesh = self.assembler.assemble(&self.buffer);
        self.publish(mesh, self.buffer.len())
    }

    fn publish(&mut self, mut mesh: BeadMesh, rings: usize) -> RebuildStats {
        self.generation += 1;
        mesh.generation = self.generation;

        self.sink.publish(&mesh);
        if self.config.generate_collision_proxy() {
            if let Some(collision) = self.collision.as_mut() {
                collision.replace(&mesh);
            }
        }

        let stats = RebuildStats {
            rings: if mesh.is_empty() { 0 } else { rings },
            vertices: mesh.vertex_count(),
            triangles: mesh.triangle_count(),
            generation: self.generation,
        };
        debug!(
            generation = stats.generation,
            rings = stats.rings,
            vertices = stats.vertices,
            triangles = stats.triangles,
            "Bead mesh published"
        );

        self.mesh = Arc::new(mesh);
        stats
    }
}

/// Builder for [`BeadGenerator`].
///
/// A surface probe and a mesh sink are required. Without a tip source every
/// welding tick reports [`SampleOutcome::NoPose`].
#[derive(Default)]
pub struct BeadGeneratorBuilder {
    config: BeadConfig,
    probe: Option<Box<dyn SurfaceProbe>>,
    tip: Option<BoxedTransformProvider>,
    sink: Option<BoxedMeshSink>,
    collision: Option<BoxedCollisionSink>,
    gate: Option<BoxedWeldGate>,
}

impl std::fmt::Debug for BeadGeneratorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeadGeneratorBuilder")
            .field("config", &self.config)
            .field("surface_probe", &self.probe.is_some())
            .field("tip_source", &self.tip.is_some())
            .field("mesh_sink", &self.sink.is_some())
            .field("collision_sink", &self.collision.is_some())
            .field("weld_gate", &self.gate.is_some())
            .finish()
    }
}

impl BeadGeneratorBuilder {
    /// Set the configuration.
    #[must_use]
    pub fn config(mut self, config: BeadConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the surface probe.
    #[must_use]
    pub fn surface_probe(mut self, probe: impl SurfaceProbe + 'static) -> Self {
        self.probe = Some(Box::new(probe));
        self
    }

    /// Set the tip pose source.
    #[must_use]
    pub fn tip_source(mut self, tip: impl TransformProvider + 'static) -> Self {
        self.tip = Some(Box::new(tip));
        self
    }

    /// Set the render mesh sink.
    #[must_use]
    pub fn mesh_sink(mut self, sink: impl MeshSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Set the collision sink.
    #[must_use]
    pub fn collision_sink(mut self, sink: impl CollisionSink + 'static) -> Self {
        self.collision = Some(Box::new(sink));
        self
    }

    /// Set the weld gate.
    #[must_use]
    pub fn weld_gate(mut self, gate: impl WeldGate + 'static) -> Self {
        self.gate = Some(Box::new(gate));
        self
    }

    /// Build the generator in the idle state with an empty path.
    ///
    /// # Errors
    ///
    /// Returns [`BeadError::MissingCollaborator`] if the surface probe or the
    /// mesh sink was not supplied.
    pub fn build(self) -> BeadResult<BeadGenerator> {
        let probe = self.probe.ok_or(BeadError::missing("surface probe"))?;
        let sink = self.sink.ok_or(BeadError::missing("mesh sink"))?;

        if self.config.generate_collision_proxy() && self.collision.is_none() {
            warn!("Collision proxy enabled without a collision sink");
        }

        if self.tip.is_none() {
            warn!("Bead generator built without a tip source");
        }

        info!(
            radial_segments = self.config.radial_segments(),
            max_samples = self.config.max_samples(),
            "Bead generator created"
        );

        Ok(BeadGenerator {
            collector: SampleCollector::new(&self.config),
            buffer: SampleBuffer::from_config(&self.config),
            assembler: MeshAssembler::from_config(&self.config),
            config: self.config,
            state: WeldState::Idle,
            mesh: Arc::new(BeadMesh::new()),
            generation: 0,
            probe,
            tip: self.tip,
            sink,
            collision: self.collision,
            gate: self.gate,
        })
    }
}
