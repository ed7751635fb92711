//! Triangle mesh geometry.
//!
//! Meshes are plain indexed triangle lists tagged with one [`SurfaceId`] per
//! triangle. Whatever builds the intersection structure reads them; the
//! integrator itself never touches vertex data.

use penumbra_math::{Aabb, Vec3};

use crate::material::SurfaceId;
use crate::scene::SceneError;

/// An indexed triangle mesh.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Surface id per triangle
    pub surface_ids: Vec<SurfaceId>,

    /// Axis-aligned bounding box
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a mesh whose triangles all share one surface.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, surface: SurfaceId) -> Self {
        let surface_ids = vec![surface; indices.len() / 3];
        Self::with_surface_ids(positions, indices, surface_ids)
    }

    /// Create a mesh with an explicit surface id per triangle.
    pub fn with_surface_ids(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        surface_ids: Vec<SurfaceId>,
    ) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            indices,
            surface_ids,
            bounds,
        }
    }

    /// Planar quad `a, b, c, d` (in winding order) split into two triangles.
    pub fn quad(a: Vec3, b: Vec3, c: Vec3, d: Vec3, surface: SurfaceId) -> Self {
        Self::new(vec![a, b, c, d], vec![0, 1, 2, 0, 2, 3], surface)
    }

    /// Merge several quads that share a surface into one mesh.
    pub fn quads(faces: &[[Vec3; 4]], surface: SurfaceId) -> Self {
        let mut positions = Vec::with_capacity(faces.len() * 4);
        let mut indices = Vec::with_capacity(faces.len() * 6);
        for face in faces {
            let base = positions.len() as u32;
            positions.extend_from_slice(face);
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self::new(positions, indices, surface)
    }

    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        if positions.is_empty() {
            return Aabb::EMPTY;
        }

        let (min, max) = positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        );
        Aabb::from_points(min, max)
    }

    /// Check the index buffer and surface table are consistent.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.indices.len() % 3 != 0 {
            return Err(SceneError::IndexCount(self.indices.len()));
        }

        if let Some(&index) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= self.positions.len())
        {
            return Err(SceneError::IndexOutOfRange {
                index,
                vertex_count: self.positions.len(),
            });
        }

        if self.surface_ids.len() != self.triangle_count() {
            return Err(SceneError::SurfaceCount {
                surfaces: self.surface_ids.len(),
                triangles: self.triangle_count(),
            });
        }

        Ok(())
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Iterate triangles as vertex triplets with their surface id.
    ///
    /// Assumes [`Mesh::validate`] passed.
    pub fn triangles(&self) -> impl Iterator<Item = ([Vec3; 3], SurfaceId)> + '_ {
        self.indices
            .chunks_exact(3)
            .zip(self.surface_ids.iter())
            .map(|(tri, &surface)| {
                (
                    [
                        self.positions[tri[0] as usize],
                        self.positions[tri[1] as usize],
                        self.positions[tri[2] as usize],
                    ],
                    surface,
                )
            })
    }
}
