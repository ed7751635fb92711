//! Soft-shadow visibility estimation against the area light.
//!
//! The estimator answers "what fraction of the light rectangle can this point
//! see?" by casting shadow rays toward points of the shared
//! [`StratifiedOffsets`](crate::StratifiedOffsets) list. Occluders that sit
//! close to the light only partially block a sample: the contribution of a
//! blocked ray fades with `1 - smoothstep(0, falloff * dist, dist - hit_t)`,
//! which softens contact with the emitter.

use penumbra_math::{smoothstep, Interval, Ray, Vec2, Vec3};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::intersect::Intersector;
use crate::light::AreaLight;
use crate::settings::SettingsError;

/// Upper bound on the visibility of a blocked ray, and of any estimate
/// that saw one.
const MAX_OCCLUDED: f32 = 1.0 - f32::EPSILON;

/// How shadow samples are spent per shading point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowMode {
    /// Always cast every sample.
    Stratified,
    /// Stop early once the running variance settles.
    #[default]
    Adaptive,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSettings {
    pub mode: ShadowMode,
    /// Offset count, and the maximum number of rays per estimate
    pub samples: u32,
    /// Adaptive mode never stops before this many rays
    pub min_samples: u32,
    pub variance_threshold: f32,
    /// Shadow ray origin offset along the normal, also trimmed off both ends
    pub bias: f32,
    /// Penetration falloff distance as a fraction of the light distance
    pub falloff: f32,
    /// Test the light center first and skip sampling if it is blocked
    pub center_precheck: bool,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            mode: ShadowMode::Adaptive,
            samples: 16,
            min_samples: 4,
            variance_threshold: 0.005,
            bias: 1e-3,
            falloff: 0.05,
            center_precheck: false,
        }
    }
}

impl ShadowSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.samples == 0 {
            return Err(SettingsError::Shadow("sample count must be at least 1".into()));
        }
        if self.mode == ShadowMode::Adaptive && self.min_samples > self.samples {
            return Err(SettingsError::Shadow(format!(
                "min_samples ({}) exceeds samples ({})",
                self.min_samples, self.samples
            )));
        }
        if self.variance_threshold.is_nan() || self.variance_threshold < 0.0 {
            return Err(SettingsError::Shadow(format!(
                "variance threshold must be non-negative, got {}",
                self.variance_threshold
            )));
        }
        if !(self.bias >= 0.0 && self.bias.is_finite()) {
            return Err(SettingsError::Shadow(format!(
                "bias must be non-negative, got {}",
                self.bias
            )));
        }
        if !(self.falloff >= 0.0 && self.falloff.is_finite()) {
            return Err(SettingsError::Shadow(format!(
                "falloff must be non-negative, got {}",
                self.falloff
            )));
        }
        Ok(())
    }
}

/// Result of one visibility estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowEstimate {
    /// Unoccluded fraction of the light, in [0, 1]
    pub factor: f32,
    /// Shadow rays actually cast
    pub samples: u32,
}

impl ShadowEstimate {
    const LIT: Self = Self {
        factor: 1.0,
        samples: 0,
    };

    const BLOCKED: Self = Self {
        factor: 0.0,
        samples: 0,
    };
}

/// Shadow ray caster for one frame's worth of shading.
#[derive(Clone, Copy)]
pub struct VisibilityEstimator<'a> {
    intersector: &'a dyn Intersector,
    light: &'a AreaLight,
    offsets: &'a [Vec2],
    settings: &'a ShadowSettings,
}

impl<'a> VisibilityEstimator<'a> {
    pub fn new(
        intersector: &'a dyn Intersector,
        light: &'a AreaLight,
        offsets: &'a [Vec2],
        settings: &'a ShadowSettings,
    ) -> Self {
        Self {
            intersector,
            light,
            offsets,
            settings,
        }
    }

    /// Estimate light visibility from `point` with unit surface `normal`.
    pub fn estimate(&self, point: Vec3, normal: Vec3, rng: &mut dyn RngCore) -> ShadowEstimate {
        if self.offsets.is_empty() {
            return ShadowEstimate::LIT;
        }

        let origin = point + normal * self.settings.bias;

        if self.settings.center_precheck && self.sample(origin, self.light.position) < 1.0 {
            return ShadowEstimate::BLOCKED;
        }

        let count = self.offsets.len();
        let start = rng.gen_range(0..count);
        let targets = (0..count).map(|i| self.light.point_at(self.offsets[(start + i) % count]));

        // Any blocked ray keeps the estimate below 1 even when rounding would not.
        let mut blocked = false;

        let estimate = match self.settings.mode {
            ShadowMode::Stratified => {
                let total: f32 = targets
                    .map(|target| {
                        let x = self.sample(origin, target);
                        blocked |= x < 1.0;
                        x
                    })
                    .sum();
                ShadowEstimate {
                    factor: total / count as f32,
                    samples: count as u32,
                }
            }
            ShadowMode::Adaptive => {
                let min = (self.settings.min_samples as usize).clamp(1, count);

                // Welford running mean and sum of squared deviations
                let mut mean = 0.0f32;
                let mut m2 = 0.0f32;
                let mut n = 0usize;

                for target in targets {
                    let x = self.sample(origin, target);
                    blocked |= x < 1.0;
                    n += 1;
                    let delta = x - mean;
                    mean += delta / n as f32;
                    m2 += delta * (x - mean);

                    if n >= min && n >= 2 && m2 / ((n - 1) as f32) < self.settings.variance_threshold {
                        break;
                    }
                }

                ShadowEstimate {
                    factor: mean.clamp(0.0, 1.0),
                    samples: n as u32,
                }
            }
        };

        if blocked {
            ShadowEstimate {
                factor: estimate.factor.min(MAX_OCCLUDED),
                ..estimate
            }
        } else {
            estimate
        }
    }

    /// Visibility contribution of one shadow ray, in [0, 1].
    fn sample(&self, origin: Vec3, target: Vec3) -> f32 {
        let to_light = target - origin;
        let dist = to_light.length();
        let bias = self.settings.bias;

        let Some(ray) = Ray::towards(origin, to_light, Interval::new(bias, dist - bias)) else {
            return 1.0;
        };
        if ray.t.is_empty() {
            return 1.0;
        }

        let falloff = self.settings.falloff * dist;
        if falloff <= 0.0 {
            return if self.intersector.occluded(&ray) { 0.0 } else { 1.0 };
        }

        match self.intersector.intersect(&ray) {
            None => 1.0,
            Some(hit) => (1.0 - smoothstep(0.0, falloff, dist - hit.t)).min(MAX_OCCLUDED),
        }
    }
}
