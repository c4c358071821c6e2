//! Renderable bead mesh buffers.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle mesh laid out as parallel vertex attribute buffers.
///
/// This is the form handed to mesh and collision sinks: positions, normals,
/// and UVs share one index space, and `indices` holds three entries per
/// triangle.
///
/// # Winding Order
///
/// Triangles use **counter-clockwise (CCW) winding** when viewed from
/// outside the tube, so face normals point outward by the right-hand rule.
///
/// # Example
///
/// ```
/// use bead_types::BeadMesh;
/// use nalgebra::{Point3, Vector3};
///
/// let mut mesh = BeadMesh::new();
/// for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
///     mesh.push_vertex(Point3::from(p), Vector3::z(), [0.0, 0.0]);
/// }
/// mesh.push_triangle([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BeadMesh {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,
    /// Unit vertex normals, one per position.
    pub normals: Vec<Vector3<f64>>,
    /// Texture coordinates `[u, v]`, one per position.
    pub uvs: Vec<[f64; 2]>,
    /// Triangle vertex indices, three per triangle.
    pub indices: Vec<u32>,
    /// Publication counter assigned by the generator; 0 for unpublished meshes.
    pub generation: u64,
}

impl BeadMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
            generation: 0,
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count),
            normals: Vec::with_capacity(vertex_count),
            uvs: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(triangle_count * 3),
            generation: 0,
        }
    }

    /// Append one vertex with all of its attributes.
    pub fn push_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>, uv: [f64; 2]) {
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
    }

    /// Append one triangle.
    pub fn push_triangle(&mut self, triangle: [u32; 3]) {
        self.indices.extend_from_slice(&triangle);
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of triangle indices.
    #[inline]
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// True when the mesh holds no vertices or no triangles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    /// Drop all geometry, keeping allocations and the generation counter.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.indices.clear();
    }

    /// Iterate over triangles as vertex index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
    }

    /// Geometric normal of a triangle (unnormalized, length = 2 × area).
    ///
    /// Returns `None` if any index is out of range.
    #[must_use]
    pub fn face_normal(&self, triangle: [u32; 3]) -> Option<Vector3<f64>> {
        let a = self.positions.get(triangle[0] as usize)?;
        let b = self.positions.get(triangle[1] as usize)?;
        let c = self.positions.get(triangle[2] as usize)?;
        Some((b - a).cross(&(c - a)))
    }

    /// Axis-aligned bounds `(min, max)`, or `None` for an empty mesh.
    #[must_use]
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.positions.first()?;
        let init = (first.coords, first.coords);
        let (min, max) = self.positions.iter().fold(init, |(min, max), p| {
            (min.inf(&p.coords), max.sup(&p.coords))
        });
        Some((Point3::from(min), Point3::from(max)))
    }

    /// Check that all buffers agree in length and every index is in range.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let n = self.positions.len();
        self.normals.len() == n
            && self.uvs.len() == n
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < n)
    }
}
