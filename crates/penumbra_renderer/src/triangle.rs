//! Triangle primitive for the reference intersection backend.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use penumbra_core::SurfaceId;
use penumbra_math::{Aabb, Interval, Ray, Vec3};

use crate::intersect::Hit;

/// A single triangle with precomputed edges.
#[derive(Debug, Clone)]
pub struct Triangle {
    v0: Vec3,
    edge1: Vec3,
    edge2: Vec3,
    /// Unnormalized face normal (edge1 x edge2)
    normal: Vec3,
    surface: SurfaceId,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, surface: SurfaceId) -> Self {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let bbox = Aabb::from_points(v0.min(v1).min(v2), v0.max(v1).max(v2));

        Self {
            v0,
            edge1,
            edge2,
            normal: edge1.cross(edge2),
            surface,
            bbox,
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Intersect within `ray_t` (which may be narrower than the ray's own).
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        let h = ray.direction.cross(self.edge2);
        let a = self.edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(self.edge1);
        let v = f * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * self.edge2.dot(q);
        if !ray_t.contains(t) {
            return None;
        }

        Some(Hit {
            t,
            normal: self.normal,
            surface: self.surface,
        })
    }
}
