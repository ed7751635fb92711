//! Penumbra Core - scene data for the path tracer.
//!
//! This crate provides:
//!
//! - **Materials**: `Material` (diffuse, specular, emissive) and the
//!   `SurfaceId` handles geometry uses to refer to them
//! - **Geometry**: `Mesh`, an indexed triangle list tagged per triangle
//! - **Scene**: the owned material table and meshes, with sentinel
//!   resolution for unknown ids, plus a built-in Cornell box
//!
//! # Example
//!
//! ```
//! use penumbra_core::{Material, Mesh, Scene};
//! use penumbra_math::Vec3;
//!
//! let mut scene = Scene::new();
//! let grey = scene.add_material(Material::diffuse("grey", Vec3::splat(0.5)));
//! scene
//!     .add_mesh(Mesh::quad(Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y, grey))
//!     .unwrap();
//! assert_eq!(scene.triangle_count(), 2);
//! ```

mod cornell;
pub mod material;
pub mod mesh;
pub mod scene;

// Re-export commonly used types
pub use material::{Color, Material, SurfaceId};
pub use mesh::Mesh;
pub use scene::{Scene, SceneError, SceneResult};
