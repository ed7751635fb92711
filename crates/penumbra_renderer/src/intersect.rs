//! Contracts the integrator needs from the outside world.
//!
//! Geometry is reached only through [`Intersector`] and surface properties
//! only through [`MaterialResolver`]; any acceleration structure (the
//! bundled [`SceneBvh`](crate::SceneBvh), Embree, a GPU backend) can sit
//! behind them.

use penumbra_core::{Material, Scene, SurfaceId};
use penumbra_math::{Ray, Vec3};

/// Closest-hit result of an intersection query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Ray parameter of the hit, inside the ray's `[tmin, tmax]`
    pub t: f32,
    /// Geometric normal, not necessarily unit length or facing the ray
    pub normal: Vec3,
    /// Surface the hit landed on
    pub surface: SurfaceId,
}

/// Ray queries against committed scene geometry.
///
/// Implementations must honor the ray's parametric interval and be safe to
/// query from many threads at once.
pub trait Intersector: Send + Sync {
    /// Closest hit within the ray segment, if any.
    fn intersect(&self, ray: &Ray) -> Option<Hit>;

    /// Whether anything blocks the ray segment.
    ///
    /// Backends with a cheaper any-hit query should override this.
    fn occluded(&self, ray: &Ray) -> bool {
        self.intersect(ray).is_some()
    }
}

/// Maps surface ids to materials.
///
/// Never fails: ids that resolve to nothing return a sentinel material so a
/// modeling error shows up as a color instead of aborting the frame.
pub trait MaterialResolver: Send + Sync {
    fn resolve(&self, id: SurfaceId) -> &Material;
}

impl MaterialResolver for Scene {
    fn resolve(&self, id: SurfaceId) -> &Material {
        Scene::resolve(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use penumbra_math::Interval;

    struct Wall {
        z: f32,
    }

    impl Intersector for Wall {
        fn intersect(&self, ray: &Ray) -> Option<Hit> {
            if ray.direction.z.abs() < 1e-8 {
                return None;
            }
            let t = (self.z - ray.origin.z) / ray.direction.z;
            ray.t.contains(t).then_some(Hit {
                t,
                normal: Vec3::Z,
                surface: SurfaceId(0),
            })
        }
    }

    #[test]
    fn test_default_occluded_uses_intersect() {
        let wall = Wall { z: -5.0 };
        let toward = Ray::new(Vec3::ZERO, -Vec3::Z, Interval::new(0.0, 10.0));
        let short = Ray::new(Vec3::ZERO, -Vec3::Z, Interval::new(0.0, 4.0));
        assert!(wall.occluded(&toward));
        assert!(!wall.occluded(&short));
    }

    #[test]
    fn test_scene_resolver_falls_back_to_sentinel() {
        let scene = Scene::new();
        let resolver: &dyn MaterialResolver = &scene;
        assert_eq!(resolver.resolve(SurfaceId(9)), &Material::ERROR);
    }
}
