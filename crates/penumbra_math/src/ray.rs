use crate::{Interval, Vec3};

/// A ray segment in 3D space.
///
/// The direction is expected to be unit length; `t` is the valid parametric
/// range handed to intersection queries (`tnear`/`tfar`).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub t: Interval,
}

impl Ray {
    /// Create a ray from an already-normalized direction.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3, t: Interval) -> Self {
        debug_assert!(
            (direction.length_squared() - 1.0).abs() < 1e-3,
            "ray direction must be unit length, got {direction}"
        );
        Self { origin, direction, t }
    }

    /// Create a ray pointing along `direction`, normalizing it.
    ///
    /// Returns `None` when the direction is too short to normalize (or is not
    /// finite), so callers never build a ray with a NaN direction.
    #[inline]
    pub fn towards(origin: Vec3, direction: Vec3, t: Interval) -> Option<Self> {
        direction
            .try_normalize()
            .map(|direction| Self { origin, direction, t })
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the unit direction of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Lower bound of the valid segment.
    #[inline]
    pub fn t_min(&self) -> f32 {
        self.t.min
    }

    /// Upper bound of the valid segment.
    #[inline]
    pub fn t_max(&self) -> f32 {
        self.t.max
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
