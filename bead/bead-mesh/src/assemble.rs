//! Tube triangulation over the full sample history.

use bead_path::SampleBuffer;
use bead_types::{BeadConfig, BeadError, BeadMesh, BeadResult};
use tracing::warn;

use crate::ring::CrossSection;

/// Largest vertex count addressable with `u32` indices.
const MAX_VERTICES: usize = u32::MAX as usize;

/// Stitches cross-section rings into a tube mesh.
///
/// Every call regenerates the complete buffers from the current samples;
/// nothing is patched incrementally. With `n` rings of `s` segments the
/// result has `n * s` vertices and `(n - 1) * s * 2` triangles. Fewer than
/// two samples give an empty mesh.
///
/// # Example
///
/// ```
/// use bead_mesh::{CrossSection, MeshAssembler};
/// use bead_path::SampleBuffer;
/// use bead_types::{Sample, UvLengthPolicy};
/// use nalgebra::{Point3, Vector3};
///
/// let section = CrossSection::new(0.008, 0.003, 4).unwrap();
/// let assembler = MeshAssembler::new(section, 0.05).unwrap();
///
/// let mut buffer = SampleBuffer::new(0, UvLengthPolicy::Continuous);
/// for i in 0..3 {
///     let x = f64::from(i) * 0.01;
///     let s = Sample::new(Point3::new(x, 0.0, 0.0), Vector3::z(), x).with_tangent(Vector3::x());
///     buffer.push(s);
/// }
///
/// let mesh = assembler.assemble(&buffer);
/// assert_eq!(mesh.vertex_count(), 12);
/// assert_eq!(mesh.triangle_count(), 16);
/// assert_eq!(mesh.index_count(), 48);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MeshAssembler {
    section: CrossSection,
    uv_length_scale: f64,
}

impl MeshAssembler {
    /// Create an assembler.
    ///
    /// # Errors
    ///
    /// Returns [`BeadError::InvalidUvScale`] if `uv_length_scale` is not
    /// positive and finite.
    pub fn new(section: CrossSection, uv_length_scale: f64) -> BeadResult<Self> {
        if !(uv_length_scale.is_finite() && uv_length_scale > 0.0) {
            return Err(BeadError::InvalidUvScale(uv_length_scale));
        }
        Ok(Self {
            section,
            uv_length_scale,
        })
    }

    /// Create an assembler from an already clamped configuration.
    #[must_use]
    pub fn from_config(config: &BeadConfig) -> Self {
        Self {
            section: CrossSection::from_config(config),
            uv_length_scale: config.uv_length_scale(),
        }
    }

    /// The swept cross-section.
    #[must_use]
    pub const fn section(&self) -> &CrossSection {
        &self.section
    }

    /// Path length per unit of V.
    #[must_use]
    pub const fn uv_length_scale(&self) -> f64 {
        self.uv_length_scale
    }

    /// Expected `(vertices, triangles)` for `rings` rings.
    #[must_use]
    pub fn counts_for(&self, rings: usize) -> (usize, usize) {
        if rings < 2 {
            return (0, 0);
        }
        let s = self.section.segments();
        (rings * s, (rings - 1) * s * 2)
    }

    /// Build the tube mesh for every retained sample, oldest first.
    #[must_use]
    pub fn assemble(&self, buffer: &SampleBuffer) -> BeadMesh {
        let s = self.section.segments();
        let mut rings = buffer.len();
        if rings < 2 {
            return BeadMesh::new();
        }

        // Oldest rings are dropped if the index range would overflow.
        let max_rings = MAX_VERTICES / s;
        if rings > max_rings {
            warn!(rings, max_rings, "bead exceeds u32 index range, truncating oldest rings");
            rings = max_rings;
        }
        let skip = buffer.len() - rings;

        let (vertex_count, triangle_count) = self.counts_for(rings);
        let mut mesh = BeadMesh::with_capacity(vertex_count, triangle_count);

        for sample in buffer.iter().skip(skip) {
            let v = buffer.uv_length(sample) / self.uv_length_scale;
            self.section.push_ring(&mut mesh, sample, v);
        }

        #[allow(clippy::cast_possible_truncation)]
        let (s32, rings32) = (s as u32, rings as u32);
        for i in 0..rings32 - 1 {
            let ring = i * s32;
            let next = ring + s32;
            for j in 0..s32 {
                let k = (j + 1) % s32;
                mesh.push_triangle([ring + j, next + j, next + k]);
                mesh.push_triangle([ring + j, next + k, ring + k]);
            }
        }

        mesh
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
    use bead_types::{Sample, UvLengthPolicy};
    use nalgebra::{Point3, Vector3};

    fn straight_buffer(count: usize, capacity: usize, policy: UvLengthPolicy) -> SampleBuffer {
        let mut buffer = SampleBuffer::new(capacity, policy);
        for i in 0..count {
            let x = i as f64 * 0.01;
            buffer.push(
                Sample::new(Point3::new(x, 0.0, 0.0), Vector3::z(), x).with_tangent(Vector3::x()),
            );
        }
        buffer
    }

    fn assembler(segments: usize) -> MeshAssembler {
        MeshAssembler::new(CrossSection::new(0.008, 0.003, segments).unwrap(), 0.05).unwrap()
    }

    #[test]
    fn rejects_bad_uv_scale() {
        let section = CrossSection::new(0.008, 0.003, 8).unwrap();
        assert_eq!(
            MeshAssembler::new(section.clone(), 0.0),
            Err(BeadError::InvalidUvScale(0.0))
        );
        assert!(MeshAssembler::new(section, f64::INFINITY).is_err());
    }

    #[test]
    fn fewer_than_two_samples_is_empty() {
        let a = assembler(8);
        assert!(a.assemble(&straight_buffer(0, 0, UvLengthPolicy::Continuous)).is_empty());
        let mesh = a.assemble(&straight_buffer(1, 0, UvLengthPolicy::Continuous));
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.index_count(), 0);
    }

    #[test]
    fn counts_match_formula() {
        let a = assembler(4);
        let mesh = a.assemble(&straight_buffer(3, 0, UvLengthPolicy::Continuous));
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 16);
        assert_eq!(mesh.index_count(), 48);
        assert_eq!(a.counts_for(3), (12, 16));
        assert!(mesh.is_consistent());
    }

    #[test]
    fn winding_faces_outward() {
        let mesh = assembler(12).assemble(&straight_buffer(4, 0, UvLengthPolicy::Continuous));
        for tri in mesh.triangles() {
            let face = mesh.face_normal(tri).unwrap();
            let vertex = mesh.normals[tri[0] as usize];
            assert!(face.dot(&vertex) > 0.0, "triangle {tri:?} faces inward");
        }
    }

    #[test]
    fn v_follows_cumulative_length() {
        let mesh = assembler(4).assemble(&straight_buffer(3, 0, UvLengthPolicy::Continuous));
        // Ring 2 sits at cumulative length 0.02 with scale 0.05.
        assert_relative_eq!(mesh.uvs[8][1], 0.4, epsilon = 1e-12);
        assert_eq!(mesh.uvs[0][1], 0.0);
    }

    #[test]
    fn uv_policy_after_eviction() {
        let a = assembler(4);

        let continuous = a.assemble(&straight_buffer(7, 5, UvLengthPolicy::Continuous));
        assert_relative_eq!(continuous.uvs[0][1], 0.4, epsilon = 1e-12);

        let rebased = a.assemble(&straight_buffer(7, 5, UvLengthPolicy::RebaseOnEvict));
        assert_relative_eq!(rebased.uvs[0][1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(rebased.uvs[4][1], 0.2, epsilon = 1e-12);
    }
}
