//! Recursive path integrator.
//!
//! Each hit combines four terms:
//!
//! - emission of the surface
//! - direct lighting from the area light (ambient + shadowed Lambert)
//! - one cosine-weighted diffuse bounce, scaled by `diffuse_weight`
//! - one mirror bounce, scaled by the specular color and `specular_weight`
//!
//! Recursion stops at depth zero or when a ray escapes the scene.

use penumbra_core::Color;
use penumbra_math::{reflect, Interval, Ray, Vec2, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::intersect::{Hit, Intersector, MaterialResolver};
use crate::light::AreaLight;
use crate::lighting::direct_lighting;
use crate::sampling::sample_cosine_direction;
use crate::settings::SettingsError;
use crate::visibility::{ShadowSettings, VisibilityEstimator};

/// Everything shading needs to read during a frame.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub intersector: &'a dyn Intersector,
    pub materials: &'a dyn MaterialResolver,
    pub light: &'a AreaLight,
    pub offsets: &'a [Vec2],
    pub shadow: &'a ShadowSettings,
    /// Ambient strength, multiplied by the diffuse color
    pub ambient: f32,
}

impl<'a> RenderContext<'a> {
    pub fn visibility(&self) -> VisibilityEstimator<'a> {
        VisibilityEstimator::new(self.intersector, self.light, self.offsets, self.shadow)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorSettings {
    pub max_depth: u32,
    pub diffuse_weight: f32,
    pub specular_weight: f32,
    /// Secondary ray origin offset along the normal
    pub bias: f32,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            max_depth: 3,
            diffuse_weight: 0.8,
            specular_weight: 0.5,
            bias: 1e-3,
        }
    }
}

impl IntegratorSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        let weight_ok = |w: f32| w.is_finite() && w >= 0.0;
        if !weight_ok(self.diffuse_weight) || !weight_ok(self.specular_weight) {
            return Err(SettingsError::Integrator(format!(
                "bounce weights must be non-negative, got diffuse {} specular {}",
                self.diffuse_weight, self.specular_weight
            )));
        }
        if !(self.bias.is_finite() && self.bias >= 0.0) {
            return Err(SettingsError::Integrator(format!(
                "bias must be non-negative, got {}",
                self.bias
            )));
        }
        Ok(())
    }
}

/// Radiance of one camera ray plus first-hit surface data for denoising.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PixelSample {
    pub radiance: Color,
    pub albedo: Color,
    pub normal: Vec3,
}

impl PixelSample {
    /// Radiance ready to be written to a frame buffer.
    ///
    /// Non-finite channels become 0; with `clamp` set, channels are limited
    /// to [0, 1].
    pub fn finished_radiance(&self, clamp: bool) -> Color {
        let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
        let r = self.radiance;
        let c = Color::new(finite(r.x), finite(r.y), finite(r.z));
        if clamp {
            c.clamp(Color::ZERO, Color::ONE)
        } else {
            c
        }
    }
}

pub struct PathIntegrator<'a> {
    ctx: RenderContext<'a>,
    settings: IntegratorSettings,
}

impl<'a> PathIntegrator<'a> {
    pub fn new(ctx: RenderContext<'a>, settings: IntegratorSettings) -> Self {
        Self { ctx, settings }
    }

    /// Trace a camera ray at full depth, keeping first-hit albedo and normal.
    pub fn trace_primary(&self, ray: &Ray, rng: &mut dyn RngCore) -> PixelSample {
        let depth = self.settings.max_depth;
        if depth == 0 {
            return PixelSample::default();
        }

        let Some(hit) = self.ctx.intersector.intersect(ray) else {
            return PixelSample::default();
        };

        let material = self.ctx.materials.resolve(hit.surface);
        PixelSample {
            radiance: self.shade(ray, &hit, depth, rng),
            albedo: material.diffuse,
            normal: facing_normal(hit.normal, ray.direction).unwrap_or(Vec3::ZERO),
        }
    }

    /// Radiance arriving along `ray` with `depth` bounces left.
    pub fn radiance(&self, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
        if depth == 0 {
            return Color::ZERO;
        }

        match self.ctx.intersector.intersect(ray) {
            Some(hit) => self.shade(ray, &hit, depth, rng),
            None => Color::ZERO,
        }
    }

    fn shade(&self, ray: &Ray, hit: &Hit, depth: u32, rng: &mut dyn RngCore) -> Color {
        let material = self.ctx.materials.resolve(hit.surface);

        let Some(normal) = facing_normal(hit.normal, ray.direction) else {
            return material.emissive;
        };

        let point = ray.at(hit.t);
        let direct = direct_lighting(&self.ctx, point, normal, material.diffuse, rng);

        let origin = point + normal * self.settings.bias;
        let secondary_t = Interval::from_min(self.settings.bias);

        let mut indirect = Color::ZERO;
        if self.settings.diffuse_weight != 0.0 {
            let dir = sample_cosine_direction(normal, rng);
            if let Some(bounce) = Ray::towards(origin, dir, secondary_t) {
                indirect = self.radiance(&bounce, depth - 1, rng);
            }
        }

        let specular_scale = material.specular * self.settings.specular_weight;
        let mut specular = Color::ZERO;
        if specular_scale != Color::ZERO {
            let dir = reflect(ray.direction, normal);
            if let Some(mirror) = Ray::towards(origin, dir, secondary_t) {
                specular = self.radiance(&mirror, depth - 1, rng);
            }
        }

        material.emissive + direct + self.settings.diffuse_weight * indirect + specular_scale * specular
    }
}

/// Unit geometric normal flipped to face against `incoming`.
///
/// Returns `None` for a degenerate normal.
pub fn facing_normal(geometric: Vec3, incoming: Vec3) -> Option<Vec3> {
    let n = geometric.try_normalize()?;
    Some(if n.dot(incoming) > 0.0 { -n } else { n })
}
