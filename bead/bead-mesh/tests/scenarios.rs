//! End-to-end welding scenarios driven through `BeadGenerator`.
//!
//! Run with: cargo test -p bead-mesh --test scenarios

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use approx::assert_relative_eq;
use bead_mesh::{
    BeadConfig, BeadError, BeadGenerator, BeadMesh, PlaneSurface, Rejection, SampleOutcome,
    TipPose, UvLengthPolicy, WeldState,
};
use nalgebra::{Point3, UnitQuaternion, Vector3};

// =============================================================================
// Harness
// =============================================================================

type Published = Rc<RefCell<Vec<BeadMesh>>>;

struct Rig {
    generator: BeadGenerator,
    tip: Rc<Cell<Option<TipPose>>>,
    gate_open: Rc<Cell<bool>>,
    rendered: Published,
    collided: Published,
}

impl Rig {
    fn new(config: BeadConfig) -> Self {
        let tip = Rc::new(Cell::new(None));
        let gate_open = Rc::new(Cell::new(true));
        let rendered: Published = Rc::default();
        let collided: Published = Rc::default();

        let generator = {
            let tip = Rc::clone(&tip);
            let gate_open = Rc::clone(&gate_open);
            let rendered = Rc::clone(&rendered);
            let collided = Rc::clone(&collided);
            BeadGenerator::builder()
                .config(config)
                .surface_probe(PlaneSurface::ground())
                .tip_source(move || tip.get())
                .weld_gate(move |_: &TipPose| gate_open.get())
                .mesh_sink(move |mesh: &BeadMesh| rendered.borrow_mut().push(mesh.clone()))
                .collision_sink(move |mesh: &BeadMesh| collided.borrow_mut().push(mesh.clone()))
                .build()
                .unwrap()
        };

        Self {
            generator,
            tip,
            gate_open,
            rendered,
            collided,
        }
    }

    /// Move the tip to `(x, y)` one centimetre above the ground and tick.
    fn step(&mut self, x: f64, y: f64) -> SampleOutcome {
        self.tip
            .set(Some(TipPose::from_position(Point3::new(x, y, 0.01))));
        self.generator.tick().outcome
    }

    fn last_rendered(&self) -> BeadMesh {
        self.rendered.borrow().last().cloned().unwrap()
    }
}

fn config() -> BeadConfig {
    BeadConfig::default()
        .with_min_segment_length(0.002)
        .with_radial_segments(4)
        .with_uv_length_scale(0.05)
}

// =============================================================================
// Topology
// =============================================================================

#[test]
fn three_samples_four_segments() {
    let mut rig = Rig::new(config());
    rig.generator.start_welding();
    for i in 0..3 {
        assert!(rig.step(f64::from(i) * 0.01, 0.0).is_appended());
    }

    let mesh = rig.last_rendered();
    assert_eq!(mesh.vertex_count(), 12);
    assert_eq!(mesh.triangle_count(), 16);
    assert_eq!(mesh.index_count(), 48);
    assert!(mesh.is_consistent());
    assert_eq!(*rig.generator.latest_mesh(), mesh);
}

#[test]
fn zero_or_one_sample_is_empty() {
    let mut rig = Rig::new(config());
    rig.generator.start_welding();
    assert!(rig.generator.rebuild().is_empty());
    assert!(rig.last_rendered().is_empty());

    rig.step(0.0, 0.0);
    assert_eq!(rig.generator.samples().len(), 1);
    let mesh = rig.last_rendered();
    assert_eq!(mesh.vertex_count(), 0);
    assert_eq!(mesh.triangle_count(), 0);
}

#[test]
fn winding_is_outward_on_curved_path() {
    let mut rig = Rig::new(config().with_radial_segments(16));
    rig.generator.start_welding();
    for i in 0..24 {
        let a = f64::from(i) * 0.1;
        rig.step(0.05 * a.cos(), 0.05 * a.sin());
    }

    let mesh = rig.last_rendered();
    assert!(mesh.triangle_count() > 0);
    for tri in mesh.triangles() {
        let face = mesh.face_normal(tri).unwrap();
        let avg: Vector3<f64> = tri.iter().map(|&i| mesh.normals[i as usize]).sum();
        assert!(face.dot(&avg) > 0.0, "triangle {tri:?} faces inward");
    }
}

#[test]
fn frames_track_flat_surface() {
    let mut rig = Rig::new(config());
    rig.generator.start_welding();
    for (x, y) in [(0.0, 0.0), (0.01, 0.003), (0.02, 0.001), (0.03, -0.004)] {
        rig.step(x, y);
    }

    let frames = rig.generator.frames();
    assert_eq!(frames.len(), 4);
    for frame in frames {
        assert!(frame.orthonormality_error() < 1e-9);
        assert!(frame.normal.dot(&Vector3::z()) > 0.0);
    }
    for s in rig.generator.samples().iter() {
        assert_relative_eq!(s.tangent.norm(), 1.0, epsilon = 1e-9);
    }
}

// =============================================================================
// History
// =============================================================================

#[test]
fn capacity_five_seven_samples() {
    let mut rig = Rig::new(config().with_max_samples(5));
    rig.generator.start_welding();
    for i in 0..7 {
        rig.step(f64::from(i) * 0.01, 0.0);
    }

    let samples = rig.generator.samples();
    assert_eq!(samples.len(), 5);
    for (k, s) in samples.iter().enumerate() {
        // Samples 3..=7 remain, i.e. x = 0.02 ..= 0.06.
        assert_relative_eq!(s.position.x, 0.01f64.mul_add(k as f64, 0.02), epsilon = 1e-12);
    }
    assert_eq!(rig.last_rendered().vertex_count(), 5 * 4);
}

#[test]
fn uv_policy_after_eviction() {
    let run = |policy| {
        let mut rig = Rig::new(config().with_max_samples(5).with_uv_policy(policy));
        rig.generator.start_welding();
        for i in 0..7 {
            rig.step(f64::from(i) * 0.01, 0.0);
        }
        rig.last_rendered()
    };

    let rebased = run(UvLengthPolicy::RebaseOnEvict);
    assert_relative_eq!(rebased.uvs[0][1], 0.0, epsilon = 1e-12);

    let continuous = run(UvLengthPolicy::Continuous);
    assert!(continuous.uvs[0][1] > 0.0);
    assert_relative_eq!(continuous.uvs[0][1], 0.02 / 0.05, epsilon = 1e-9);
}

#[test]
fn clear_resets_everything() {
    let mut rig = Rig::new(config().with_collision_proxy(true));
    rig.generator.start_welding();
    for i in 0..4 {
        rig.step(f64::from(i) * 0.01, 0.0);
    }
    assert!(!rig.last_rendered().is_empty());

    let stats = rig.generator.clear();
    assert_eq!(stats.vertices, 0);
    assert_eq!(stats.triangles, 0);
    assert!(rig.generator.samples().is_empty());
    assert_eq!(rig.generator.samples().total_length(), 0.0);
    assert!(rig.last_rendered().is_empty());
    assert!(rig.collided.borrow().last().unwrap().is_empty());
    assert_eq!(rig.generator.state(), WeldState::Welding);

    // A fresh path starts over at zero length.
    rig.step(0.5, 0.0);
    rig.step(0.51, 0.0);
    let latest = rig.generator.samples().latest().unwrap();
    assert_relative_eq!(latest.cumulative_length, 0.01, epsilon = 1e-12);
}

// =============================================================================
// State machine
// =============================================================================

#[test]
fn stop_keeps_samples_and_idle_ignores_motion() {
    let mut rig = Rig::new(config());
    rig.generator.start_welding();
    rig.step(0.0, 0.0);
    rig.step(0.01, 0.0);

    rig.generator.stop_welding();
    assert_eq!(rig.step(0.02, 0.0), SampleOutcome::Idle);
    assert_eq!(rig.generator.samples().len(), 2);

    rig.generator.start_welding();
    assert!(rig.step(0.03, 0.0).is_appended());
    assert_eq!(rig.generator.samples().len(), 3);
}

#[test]
fn tilting_a_stationary_tip_keeps_depositing() {
    let mut rig = Rig::new(config());
    rig.generator.start_welding();
    let position = Point3::new(0.0, 0.0, 0.02);

    for (k, pitch) in [0.0, 0.2, 0.4, 0.6].into_iter().enumerate() {
        let orientation = UnitQuaternion::from_euler_angles(0.0, pitch, 0.0);
        rig.tip.set(Some(TipPose::new(position, orientation)));
        let report = rig.generator.tick();
        assert!(report.outcome.is_appended(), "tilt {pitch} rejected");
        assert_eq!(rig.generator.samples().len(), k + 1);
    }

    // Holding the last tilt adds nothing.
    assert_eq!(
        rig.generator.tick().outcome,
        SampleOutcome::Rejected(Rejection::TooClose)
    );
    assert_eq!(rig.last_rendered().vertex_count(), 4 * 4);
}

#[test]
fn closed_gate_is_silent() {
    let mut rig = Rig::new(config());
    rig.generator.start_welding();
    rig.gate_open.set(false);

    assert_eq!(rig.step(0.0, 0.0), SampleOutcome::Gated);
    assert!(rig.generator.samples().is_empty());
    assert!(rig.rendered.borrow().is_empty());

    rig.gate_open.set(true);
    assert!(rig.step(0.0, 0.0).is_appended());
}

#[test]
fn probe_miss_keeps_count_but_rebuilds() {
    let mut rig = Rig::new(config());
    rig.generator.start_welding();
    rig.step(0.0, 0.0);
    rig.step(0.01, 0.0);
    let published = rig.rendered.borrow().len();

    // Far above the plate: out of probe range.
    rig.tip
        .set(Some(TipPose::from_position(Point3::new(0.05, 0.0, 1.0))));
    let report = rig.generator.tick();

    assert_eq!(report.outcome, SampleOutcome::Rejected(Rejection::ProbeMissed));
    assert_eq!(rig.generator.samples().len(), 2);
    assert!(report.rebuild.is_some());
    assert_eq!(rig.rendered.borrow().len(), published + 1);
}

#[test]
fn collision_proxy_follows_render_mesh() {
    let mut rig = Rig::new(config().with_collision_proxy(true));
    rig.generator.start_welding();
    for i in 0..3 {
        rig.step(f64::from(i) * 0.01, 0.0);
    }
    assert_eq!(rig.collided.borrow().len(), rig.rendered.borrow().len());
    assert_eq!(*rig.collided.borrow().last().unwrap(), rig.last_rendered());

    let mut rig = Rig::new(config());
    rig.generator.start_welding();
    rig.step(0.0, 0.0);
    rig.step(0.01, 0.0);
    assert!(rig.collided.borrow().is_empty());
}

#[test]
fn generations_increase() {
    let mut rig = Rig::new(config());
    rig.generator.start_welding();
    for i in 0..4 {
        rig.step(f64::from(i) * 0.01, 0.0);
    }
    let generations: Vec<u64> = rig.rendered.borrow().iter().map(|m| m.generation).collect();
    assert_eq!(generations, vec![1, 2, 3, 4]);
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn missing_collaborators() {
    let err = BeadGenerator::builder()
        .tip_source(|| None::<TipPose>)
        .mesh_sink(|_: &BeadMesh| {})
        .build()
        .unwrap_err();
    assert_eq!(err, BeadError::MissingCollaborator("surface probe"));

    let err = BeadGenerator::builder()
        .surface_probe(PlaneSurface::ground())
        .tip_source(|| None::<TipPose>)
        .build()
        .unwrap_err();
    assert_eq!(err, BeadError::MissingCollaborator("mesh sink"));
}

#[test]
fn missing_tip_source_is_a_silent_tick() {
    let rendered: Published = Rc::default();
    let sink = Rc::clone(&rendered);
    let mut generator = BeadGenerator::builder()
        .config(config())
        .surface_probe(PlaneSurface::ground())
        .mesh_sink(move |mesh: &BeadMesh| sink.borrow_mut().push(mesh.clone()))
        .build()
        .unwrap();

    assert!(generator.start_welding());
    for _ in 0..4 {
        assert_eq!(generator.tick().outcome, SampleOutcome::NoPose);
    }
    assert_eq!(generator.state(), WeldState::Welding);
    assert!(generator.samples().is_empty());
    assert_eq!(generator.generation(), 0);
    assert!(generator.latest_mesh().is_empty());
    assert!(rendered.borrow().is_empty());

    // Explicit rebuilds still publish.
    assert!(generator.rebuild().is_empty());
    assert_eq!(rendered.borrow().len(), 1);
}
