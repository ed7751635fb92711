//! Built-in Cornell box.
//!
//! Classic measured Cornell box data, rotated 180 degrees about +Y so the
//! room extends into -X/-Z and a camera on +Z looks into the open side.

use penumbra_math::Vec3;

use crate::material::{Color, Material};
use crate::mesh::Mesh;
use crate::scene::{Scene, SceneResult};

/// Rotate measured coordinates into scene space.
fn p(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(-x, y, -z)
}

/// Height of the emitter panel; just under the ceiling to avoid coplanar faces.
const LIGHT_PANEL_Y: f32 = 548.7;

impl Scene {
    /// Build the Cornell box with its ceiling light panel.
    pub fn cornell_box() -> SceneResult<Self> {
        let mut scene = Scene::new();

        let white = scene.add_material(Material::diffuse("white", Color::new(0.725, 0.71, 0.68)));
        let red = scene.add_material(Material::diffuse("red", Color::new(0.63, 0.065, 0.05)));
        let green = scene.add_material(Material::diffuse("green", Color::new(0.14, 0.45, 0.091)));
        let glossy = scene.add_material(
            Material::diffuse("glossy_white", Color::new(0.725, 0.71, 0.68))
                .with_specular(Color::splat(0.25)),
        );
        let light = scene.add_material(
            Material::diffuse("light", Color::splat(0.78)).with_emissive(Color::new(1.0, 0.92, 0.8)),
        );

        // Floor, ceiling, back wall.
        scene.add_mesh(Mesh::quads(
            &[
                [p(552.8, 0.0, 0.0), p(0.0, 0.0, 0.0), p(0.0, 0.0, 559.2), p(549.6, 0.0, 559.2)],
                [p(556.0, 548.8, 0.0), p(556.0, 548.8, 559.2), p(0.0, 548.8, 559.2), p(0.0, 548.8, 0.0)],
                [p(549.6, 0.0, 559.2), p(0.0, 0.0, 559.2), p(0.0, 548.8, 559.2), p(556.0, 548.8, 559.2)],
            ],
            white,
        ))?;

        scene.add_mesh(Mesh::quad(
            p(552.8, 0.0, 0.0),
            p(549.6, 0.0, 559.2),
            p(556.0, 548.8, 559.2),
            p(556.0, 548.8, 0.0),
            red,
        ))?;

        scene.add_mesh(Mesh::quad(
            p(0.0, 0.0, 559.2),
            p(0.0, 0.0, 0.0),
            p(0.0, 548.8, 0.0),
            p(0.0, 548.8, 559.2),
            green,
        ))?;

        scene.add_mesh(Mesh::quad(
            p(343.0, LIGHT_PANEL_Y, 227.0),
            p(343.0, LIGHT_PANEL_Y, 332.0),
            p(213.0, LIGHT_PANEL_Y, 332.0),
            p(213.0, LIGHT_PANEL_Y, 227.0),
            light,
        ))?;

        scene.add_mesh(Mesh::quads(
            &[
                [p(130.0, 165.0, 65.0), p(82.0, 165.0, 225.0), p(240.0, 165.0, 272.0), p(290.0, 165.0, 114.0)],
                [p(290.0, 0.0, 114.0), p(290.0, 165.0, 114.0), p(240.0, 165.0, 272.0), p(240.0, 0.0, 272.0)],
                [p(130.0, 0.0, 65.0), p(130.0, 165.0, 65.0), p(290.0, 165.0, 114.0), p(290.0, 0.0, 114.0)],
                [p(82.0, 0.0, 225.0), p(82.0, 165.0, 225.0), p(130.0, 165.0, 65.0), p(130.0, 0.0, 65.0)],
                [p(240.0, 0.0, 272.0), p(240.0, 165.0, 272.0), p(82.0, 165.0, 225.0), p(82.0, 0.0, 225.0)],
            ],
            white,
        ))?;

        scene.add_mesh(Mesh::quads(
            &[
                [p(423.0, 330.0, 247.0), p(265.0, 330.0, 296.0), p(314.0, 330.0, 456.0), p(472.0, 330.0, 406.0)],
                [p(423.0, 0.0, 247.0), p(423.0, 330.0, 247.0), p(472.0, 330.0, 406.0), p(472.0, 0.0, 406.0)],
                [p(472.0, 0.0, 406.0), p(472.0, 330.0, 406.0), p(314.0, 330.0, 456.0), p(314.0, 0.0, 456.0)],
                [p(314.0, 0.0, 456.0), p(314.0, 330.0, 456.0), p(265.0, 330.0, 296.0), p(265.0, 0.0, 296.0)],
                [p(265.0, 0.0, 296.0), p(265.0, 330.0, 296.0), p(423.0, 330.0, 247.0), p(423.0, 0.0, 247.0)],
            ],
            glossy,
        ))?;

        log::debug!(
            "Built Cornell box: {} meshes, {} triangles, {} materials",
            scene.meshes().len(),
            scene.triangle_count(),
            scene.materials().len()
        );

        Ok(scene)
    }
}
