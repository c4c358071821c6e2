//! Host collaborator seams.
//!
//! The generator never touches an engine's mesh, collider, or transform
//! objects. Hosts implement these traits for their own types, or pass a
//! closure:
//!
//! ```
//! use bead_mesh::{MeshSink, TransformProvider};
//! use bead_types::{BeadMesh, TipPose};
//!
//! let mut uploaded = 0;
//! let mut sink = |mesh: &BeadMesh| uploaded += mesh.vertex_count();
//! sink.publish(&BeadMesh::new());
//!
//! let tip = || Some(TipPose::default());
//! assert!(tip.current_tip_pose().is_some());
//! ```

use bead_types::{BeadMesh, TipPose};

/// Receives the render mesh after every rebuild.
///
/// Each call is a full replacement; the previous contents should be
/// discarded.
pub trait MeshSink {
    /// Replace the displayed mesh.
    fn publish(&mut self, mesh: &BeadMesh);
}

impl<F: FnMut(&BeadMesh)> MeshSink for F {
    fn publish(&mut self, mesh: &BeadMesh) {
        self(mesh);
    }
}

/// Receives the collision proxy geometry after every rebuild.
///
/// Only called when `generate_collision_proxy` is enabled.
pub trait CollisionSink {
    /// Replace the collision geometry wholesale.
    fn replace(&mut self, mesh: &BeadMesh);
}

impl<F: FnMut(&BeadMesh)> CollisionSink for F {
    fn replace(&mut self, mesh: &BeadMesh) {
        self(mesh);
    }
}

/// Supplies the tool tip pose, sampled once per tick.
///
/// `None` means the pose is unavailable this tick; the tick does nothing.
pub trait TransformProvider {
    /// Current world pose of the tool tip.
    fn current_tip_pose(&self) -> Option<TipPose>;
}

impl<F: Fn() -> Option<TipPose>> TransformProvider for F {
    fn current_tip_pose(&self) -> Option<TipPose> {
        self()
    }
}

/// Host permission check consulted on every welding tick.
///
/// Typically answers whether the torch is held and triggered. A closed gate
/// skips the tick without touching the samples.
pub trait WeldGate {
    /// True if material may be deposited at this pose.
    fn allows_deposit(&self, pose: &TipPose) -> bool;
}

impl<F: Fn(&TipPose) -> bool> WeldGate for F {
    fn allows_deposit(&self, pose: &TipPose) -> bool {
        self(pose)
    }
}

/// Boxed render sink.
pub type BoxedMeshSink = Box<dyn MeshSink>;

/// Boxed collision sink.
pub type BoxedCollisionSink = Box<dyn CollisionSink>;

/// Boxed transform provider.
pub type BoxedTransformProvider = Box<dyn TransformProvider>;

/// Boxed weld gate.
pub type BoxedWeldGate = Box<dyn WeldGate>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    struct CountingSink {
        calls: usize,
    }

    impl MeshSink for CountingSink {
        fn publish(&mut self, _mesh: &BeadMesh) {
            self.calls += 1;
        }
    }

    fn publish_twice(sink: &mut dyn MeshSink) {
        sink.publish(&BeadMesh::new());
        sink.publish(&BeadMesh::new());
    }

    #[test]
    fn struct_sink_through_trait_object() {
        let mut sink = CountingSink { calls: 0 };
        publish_twice(&mut sink);
        assert_eq!(sink.calls, 2);

        let mut boxed: BoxedMeshSink = Box::new(CountingSink { calls: 0 });
        publish_twice(boxed.as_mut());
    }

    #[test]
    fn closure_gate() {
        let gate: BoxedWeldGate = Box::new(|pose: &TipPose| pose.position.z > 0.0);
        assert!(gate.allows_deposit(&TipPose::from_position(Point3::new(0.0, 0.0, 0.1))));
        assert!(!gate.allows_deposit(&TipPose::from_position(Point3::new(0.0, 0.0, -0.1))));
    }

    #[test]
    fn closure_collision_sink() {
        let mut triangles = 0;
        {
            let mut sink = |mesh: &BeadMesh| triangles += mesh.triangle_count();
            let mut mesh = BeadMesh::new();
            mesh.push_vertex(Point3::origin(), nalgebra::Vector3::z(), [0.0, 0.0]);
            mesh.push_triangle([0, 0, 0]);
            CollisionSink::replace(&mut sink, &mesh);
        }
        assert_eq!(triangles, 1);
    }
}
