//! Bounding Volume Hierarchy over scene triangles.
//!
//! The reference [`Intersector`] backend: a binary tree built by median
//! split on the longest centroid axis. Good enough to drive the integrator
//! and its tests; production scenes would plug in a dedicated ray tracing
//! library behind the same trait.

use penumbra_core::Scene;
use penumbra_math::{Aabb, Interval, Ray};

use crate::intersect::{Hit, Intersector};
use crate::triangle::Triangle;

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with primitives.
enum BvhNode {
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    Leaf {
        triangles: Vec<Triangle>,
        bbox: Aabb,
    },
    Empty,
}

impl BvhNode {
    fn build(mut triangles: Vec<Triangle>) -> Self {
        if triangles.is_empty() {
            return BvhNode::Empty;
        }

        let bbox = triangles
            .iter()
            .fold(Aabb::EMPTY, |acc, t| Aabb::surrounding(&acc, &t.bounding_box()));

        if triangles.len() <= LEAF_MAX_SIZE {
            return BvhNode::Leaf { triangles, bbox };
        }

        // Split along the axis with the widest centroid spread
        let centroid_bounds = triangles.iter().fold(Aabb::EMPTY, |acc, t| {
            let c = t.bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        triangles.sort_unstable_by(|a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val.total_cmp(&b_val)
        });

        let right = triangles.split_off(triangles.len() / 2);

        BvhNode::Branch {
            left: Box::new(Self::build(triangles)),
            right: Box::new(Self::build(right)),
            bbox,
        }
    }

    fn closest(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { triangles, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let mut closest: Option<Hit> = None;
                for triangle in triangles {
                    let max = closest.map_or(ray_t.max, |h| h.t);
                    if let Some(hit) = triangle.hit(ray, ray_t.with_max(max)) {
                        closest = Some(hit);
                    }
                }
                closest
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.closest(ray, ray_t);

                // Only check right up to closest hit
                let right_max = hit_left.map_or(ray_t.max, |h| h.t);
                right.closest(ray, ray_t.with_max(right_max)).or(hit_left)
            }
        }
    }

    fn any(&self, ray: &Ray, ray_t: Interval) -> bool {
        match self {
            BvhNode::Empty => false,
            BvhNode::Leaf { triangles, bbox } => {
                bbox.hit(ray, ray_t) && triangles.iter().any(|t| t.hit(ray, ray_t).is_some())
            }
            BvhNode::Branch { left, right, bbox } => {
                bbox.hit(ray, ray_t) && (left.any(ray, ray_t) || right.any(ray, ray_t))
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } | BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

/// Triangle BVH built from a [`Scene`].
pub struct SceneBvh {
    root: BvhNode,
    triangle_count: usize,
}

impl SceneBvh {
    /// Build the hierarchy over every triangle in the scene.
    pub fn build(scene: &Scene) -> Self {
        let triangles: Vec<Triangle> = scene
            .meshes()
            .iter()
            .flat_map(|mesh| mesh.triangles())
            .map(|([v0, v1, v2], surface)| Triangle::new(v0, v1, v2, surface))
            .collect();
        let triangle_count = triangles.len();

        let start = std::time::Instant::now();
        let root = BvhNode::build(triangles);
        log::info!("Built BVH over {} triangles in {:?}", triangle_count, start.elapsed());

        Self {
            root,
            triangle_count,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    pub fn bounds(&self) -> Aabb {
        self.root.bounding_box()
    }
}

impl Intersector for SceneBvh {
    fn intersect(&self, ray: &Ray) -> Option<Hit> {
        self.root.closest(ray, ray.t)
    }

    fn occluded(&self, ray: &Ray) -> bool {
        self.root.any(ray, ray.t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use penumbra_core::{Material, Mesh, SurfaceId};
    use penumbra_math::Vec3;

    /// Row of unit quads facing +Z at z = -5, one material each.
    fn quad_row(count: usize) -> Scene {
        let mut scene = Scene::new();
        for i in 0..count {
            let id = scene.add_material(Material::default());
            let x = i as f32 * 2.0;
            scene
                .add_mesh(Mesh::quad(
                    Vec3::new(x - 0.5, -0.5, -5.0),
                    Vec3::new(x + 0.5, -0.5, -5.0),
                    Vec3::new(x + 0.5, 0.5, -5.0),
                    Vec3::new(x - 0.5, 0.5, -5.0),
                    id,
                ))
                .unwrap();
        }
        scene
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = SceneBvh::build(&Scene::new());
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, Interval::from_min(0.001));
        assert_eq!(bvh.triangle_count(), 0);
        assert!(bvh.intersect(&ray).is_none());
        assert!(!bvh.occluded(&ray));
    }

    #[test]
    fn test_bvh_finds_the_right_quad() {
        let bvh = SceneBvh::build(&quad_row(10));
        assert_eq!(bvh.triangle_count(), 20);

        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), -Vec3::Z, Interval::from_min(0.001));
        let hit = bvh.intersect(&ray).unwrap();
        assert!((hit.t - 5.0).abs() < 1e-4);
        assert_eq!(hit.surface, SurfaceId(5));
    }

    #[test]
    fn test_bvh_returns_closest_of_stacked_surfaces() {
        let mut scene = quad_row(1);
        let near = scene.add_material(Material::default());
        scene
            .add_mesh(Mesh::quad(
                Vec3::new(-1.0, -1.0, -2.0),
                Vec3::new(1.0, -1.0, -2.0),
                Vec3::new(1.0, 1.0, -2.0),
                Vec3::new(-1.0, 1.0, -2.0),
                near,
            ))
            .unwrap();
        let bvh = SceneBvh::build(&scene);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, Interval::from_min(0.001));
        let hit = bvh.intersect(&ray).unwrap();
        assert_eq!(hit.surface, near);
        assert!((hit.t - 2.0).abs() < 1e-4);

        // Clipping the segment short of the near quad leaves nothing.
        let clipped = Ray::new(Vec3::ZERO, -Vec3::Z, Interval::new(0.001, 1.5));
        assert!(bvh.intersect(&clipped).is_none());
        assert!(!bvh.occluded(&clipped));
    }

    #[test]
    fn test_bvh_occluded_matches_intersect() {
        let bvh = SceneBvh::build(&quad_row(6));
        for i in 0..12 {
            let ray = Ray::new(
                Vec3::new(i as f32, 0.0, 0.0),
                -Vec3::Z,
                Interval::from_min(0.001),
            );
            assert_eq!(bvh.occluded(&ray), bvh.intersect(&ray).is_some(), "x = {i}");
        }
    }
}
