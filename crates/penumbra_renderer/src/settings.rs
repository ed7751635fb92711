//! Render configuration.
//!
//! Every field has a default, so a JSON file only needs to name what it
//! changes:
//!
//! ```json
//! { "width": 256, "height": 256, "shadow": { "samples": 36 } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bucket::DEFAULT_BUCKET_SIZE;
use crate::camera::CameraSettings;
use crate::integrator::IntegratorSettings;
use crate::light::AreaLight;
use crate::visibility::ShadowSettings;

/// Errors that can occur while loading or validating settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Resolution must be at least 2x2, got {width}x{height}")]
    Resolution { width: u32, height: u32 },

    #[error("Bucket size must be at least 1")]
    BucketSize,

    #[error("Ambient strength must be non-negative, got {0}")]
    Ambient(f32),

    #[error("Invalid camera: {0}")]
    Camera(String),

    #[error("Invalid light: {0}")]
    Light(String),

    #[error("Invalid shadow sampling: {0}")]
    Shadow(String),

    #[error("Invalid integrator settings: {0}")]
    Integrator(String),
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    /// Ambient strength, multiplied by each surface's diffuse color
    pub ambient: f32,
    /// Base seed for every per-bucket RNG
    pub seed: u64,
    /// Clamp pixel radiance to [0, 1] before accumulation
    pub clamp_radiance: bool,
    /// Jitter primary rays within the pixel each frame
    pub jitter_primary: bool,
    pub bucket_size: u32,
    pub camera: CameraSettings,
    pub light: AreaLight,
    pub integrator: IntegratorSettings,
    pub shadow: ShadowSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            ambient: 0.1,
            seed: 0,
            clamp_radiance: true,
            jitter_primary: false,
            bucket_size: DEFAULT_BUCKET_SIZE,
            camera: CameraSettings::default(),
            light: AreaLight::default(),
            integrator: IntegratorSettings::default(),
            shadow: ShadowSettings::default(),
        }
    }
}

impl RenderSettings {
    /// Load settings from a JSON file and validate them.
    pub fn load(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json_str(&text)?;
        log::info!("Loaded render settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Parse settings from JSON and validate them.
    pub fn from_json_str(json: &str) -> SettingsResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_shadow_samples(mut self, samples: u32) -> Self {
        self.shadow.samples = samples;
        self.shadow.min_samples = self.shadow.min_samples.min(samples);
        self
    }

    pub fn validate(&self) -> SettingsResult<()> {
        if self.width < 2 || self.height < 2 {
            return Err(SettingsError::Resolution {
                width: self.width,
                height: self.height,
            });
        }
        if self.bucket_size == 0 {
            return Err(SettingsError::BucketSize);
        }
        if !(self.ambient.is_finite() && self.ambient >= 0.0) {
            return Err(SettingsError::Ambient(self.ambient));
        }
        self.light.validate()?;
        self.shadow.validate()?;
        self.integrator.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use penumbra_math::Vec3;

    #[test]
    fn test_defaults_are_valid() {
        let settings = RenderSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.light.position, Vec3::new(-278.0, 548.0, -279.6));
        assert_eq!(settings.shadow.samples, 16);
        assert_eq!(settings.integrator.max_depth, 3);
        assert_eq!(settings.bucket_size, DEFAULT_BUCKET_SIZE);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = RenderSettings::from_json_str(
            r#"{ "width": 64, "shadow": { "mode": "stratified", "samples": 9 }, "light": { "intensity": 5.0 } }"#,
        )
        .unwrap();
        assert_eq!(settings.width, 64);
        assert_eq!(settings.height, 512);
        assert_eq!(settings.shadow.mode, crate::ShadowMode::Stratified);
        assert_eq!(settings.shadow.samples, 9);
        assert_eq!(settings.shadow.falloff, 0.05);
        assert_eq!(settings.light.intensity, 5.0);
        assert_eq!(settings.light.width, 100.0);
    }

    #[test]
    fn test_json_roundtrip_through_serde() {
        let settings = RenderSettings::default().with_resolution(32, 16);
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(RenderSettings::from_json_str(&json).unwrap(), settings);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            RenderSettings::from_json_str(r#"{ "width": 1 }"#),
            Err(SettingsError::Resolution { .. })
        ));
        assert!(matches!(
            RenderSettings::from_json_str(r#"{ "ambient": -0.5 }"#),
            Err(SettingsError::Ambient(_))
        ));
        assert!(matches!(
            RenderSettings::from_json_str(r#"{ "light": { "width": 0.0 } }"#),
            Err(SettingsError::Light(_))
        ));
        assert!(matches!(
            RenderSettings::from_json_str(r#"{ "shadow": { "samples": 0 } }"#),
            Err(SettingsError::Shadow(_))
        ));
        assert!(matches!(
            RenderSettings::from_json_str("{ not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_zero_depth_is_allowed() {
        let settings = RenderSettings::from_json_str(r#"{ "integrator": { "max_depth": 0 } }"#).unwrap();
        assert_eq!(settings.integrator.max_depth, 0);
    }

    #[test]
    fn test_with_shadow_samples_keeps_min_in_range() {
        let settings = RenderSettings::default().with_shadow_samples(2);
        assert_eq!(settings.shadow.min_samples, 2);
        assert!(settings.validate().is_ok());
    }
}
