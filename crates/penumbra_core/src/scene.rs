//! Scene container: geometry plus the material table it references.

use penumbra_math::Aabb;
use thiserror::Error;

use crate::material::{Material, SurfaceId};
use crate::mesh::Mesh;

/// Errors raised while assembling a scene.
#[derive(Error, Debug, PartialEq)]
pub enum SceneError {
    #[error("Index buffer length {0} is not a multiple of 3")]
    IndexCount(usize),

    #[error("Triangle index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("Mesh has {surfaces} surface ids for {triangles} triangles")]
    SurfaceCount { surfaces: usize, triangles: usize },
}

pub type SceneResult<T> = Result<T, SceneError>;

static ERROR_MATERIAL: Material = Material::ERROR;

/// Geometry and materials for one render session.
///
/// Meshes refer to materials by [`SurfaceId`], which is simply the position
/// of the material in the table.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a material and return the id that resolves to it.
    pub fn add_material(&mut self, material: Material) -> SurfaceId {
        let id = SurfaceId(self.materials.len() as u32);
        self.materials.push(material);
        id
    }

    /// Add a mesh after checking its index buffer.
    ///
    /// Surface ids are not required to exist in the material table; unknown
    /// ids resolve to [`Material::ERROR`] at render time.
    pub fn add_mesh(&mut self, mesh: Mesh) -> SceneResult<()> {
        mesh.validate()?;
        if let Some(id) = mesh
            .surface_ids
            .iter()
            .find(|id| id.index() >= self.materials.len())
        {
            log::warn!("Mesh references {id} with no material; it will render as the error color");
        }
        self.meshes.push(mesh);
        Ok(())
    }

    /// Look up a material, if the id is known.
    pub fn material(&self, id: SurfaceId) -> Option<&Material> {
        self.materials.get(id.index())
    }

    /// Look up a material, falling back to the sentinel for unknown ids.
    pub fn resolve(&self, id: SurfaceId) -> &Material {
        self.material(id).unwrap_or(&ERROR_MATERIAL)
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Total triangle count across all meshes.
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }

    /// Bounds of all geometry.
    pub fn bounds(&self) -> Aabb {
        self.meshes
            .iter()
            .fold(Aabb::EMPTY, |acc, mesh| Aabb::surrounding(&acc, &mesh.bounds))
    }
}
