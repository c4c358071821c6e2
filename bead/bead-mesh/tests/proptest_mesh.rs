//! Property-based tests for bead extrusion and triangulation.
//!
//! Run with: cargo test -p bead-mesh -- proptest

#![allow(clippy::unwrap_used)]

use bead_mesh::{CrossSection, MeshAssembler, SampleBuffer};
use bead_types::{Frame, Sample, UvLengthPolicy};
use nalgebra::{Point3, Vector3};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// A random unit vector, rejecting near-zero draws.
fn arb_unit() -> impl Strategy<Value = Vector3<f64>> {
    prop::array::uniform3(-1.0..1.0f64)
        .prop_filter("non-degenerate", |v| Vector3::from(*v).norm() > 1e-3)
        .prop_map(|v| Vector3::from(v).normalize())
}

fn arb_section() -> impl Strategy<Value = CrossSection> {
    (0.001..0.05f64, 0.001..0.05f64, 3usize..=64)
        .prop_map(|(w, h, s)| CrossSection::new(w, h, s).unwrap())
}

/// A buffer of `n` samples along a random planar walk.
fn arb_buffer(max_len: usize) -> impl Strategy<Value = SampleBuffer> {
    let step = (0.0..std::f64::consts::TAU, 0.002..0.02f64);
    prop::collection::vec(step, 0..max_len).prop_map(|steps| {
        let mut buffer = SampleBuffer::new(0, UvLengthPolicy::Continuous);
        let mut p = Point3::origin();
        let mut length = 0.0;
        let mut prev: Option<Point3<f64>> = None;
        for (angle, len) in steps {
            if let Some(q) = prev {
                length += nalgebra::distance(&p, &q);
            }
            let tangent = Vector3::new(angle.cos(), angle.sin(), 0.0);
            buffer.push(Sample::new(p, Vector3::z(), length).with_tangent(tangent));
            prev = Some(p);
            p += tangent * len;
        }
        buffer
    })
}

// =============================================================================
// Property Tests: Topology
// =============================================================================

proptest! {
    /// Vertex, triangle, and index counts follow the ring/segment formula.
    #[test]
    fn counts_follow_formula(section in arb_section(), buffer in arb_buffer(30)) {
        let s = section.segments();
        let n = buffer.len();
        let mesh = MeshAssembler::new(section, 0.05).unwrap().assemble(&buffer);

        if n < 2 {
            prop_assert!(mesh.is_empty());
            prop_assert_eq!(mesh.vertex_count(), 0);
        } else {
            prop_assert_eq!(mesh.vertex_count(), n * s);
            prop_assert_eq!(mesh.triangle_count(), (n - 1) * s * 2);
            prop_assert_eq!(mesh.index_count(), (n - 1) * s * 6);
        }
        prop_assert!(mesh.is_consistent());
    }

    /// Every vertex normal is unit length and every UV is finite.
    #[test]
    fn attributes_are_well_formed(section in arb_section(), buffer in arb_buffer(20)) {
        let mesh = MeshAssembler::new(section, 0.05).unwrap().assemble(&buffer);
        for n in &mesh.normals {
            prop_assert!((n.norm() - 1.0).abs() < 1e-9);
        }
        for uv in &mesh.uvs {
            prop_assert!((0.0..1.0).contains(&uv[0]));
            prop_assert!(uv[1].is_finite() && uv[1] >= 0.0);
        }
    }
}

// =============================================================================
// Property Tests: Cross-section
// =============================================================================

proptest! {
    /// Opposite ring vertices are antiparallel with equal magnitude.
    #[test]
    fn opposite_offsets_antiparallel(
        w in 0.001..0.05f64,
        h in 0.001..0.05f64,
        half in 2usize..=32,
        tangent in arb_unit(),
        surface in arb_unit(),
    ) {
        let section = CrossSection::new(w, h, half * 2).unwrap();
        let frame = Frame::from_surface(tangent, surface);

        let a = section.offset(&frame, 0);
        let b = section.offset(&frame, half);

        prop_assert!((a.norm() - b.norm()).abs() < 1e-12);
        prop_assert!((a + b).norm() < 1e-12);
        prop_assert!((a.norm() - w / 2.0).abs() < 1e-12);
    }

    /// Ring vertices stay within the oval's bounding radius of the center.
    #[test]
    fn offsets_bounded(section in arb_section(), tangent in arb_unit(), surface in arb_unit()) {
        let frame = Frame::from_surface(tangent, surface);
        let bound = section.width().max(section.height()) / 2.0 + 1e-12;
        for j in 0..section.segments() {
            prop_assert!(section.offset(&frame, j).norm() <= bound);
        }
    }
}
