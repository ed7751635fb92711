//! Rectangular area light.

use penumbra_core::Color;
use penumbra_math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::settings::SettingsError;

/// A horizontal light rectangle centered at `position`.
///
/// `width` spans x and `height` spans z. The light itself is not geometry:
/// camera rays never see it, only the shading terms do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaLight {
    pub position: Vec3,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    pub intensity: f32,
}

impl Default for AreaLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(-278.0, 548.0, -279.6),
            width: 100.0,
            height: 100.0,
            color: Color::ONE,
            intensity: 25.0,
        }
    }
}

impl AreaLight {
    pub fn new(position: Vec3, width: f32, height: f32) -> Self {
        Self {
            position,
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let extent_ok = |v: f32| v.is_finite() && v > 0.0;
        if !extent_ok(self.width) || !extent_ok(self.height) {
            return Err(SettingsError::Light(format!(
                "extents must be positive and finite, got {} x {}",
                self.width, self.height
            )));
        }
        if !(self.intensity.is_finite() && self.intensity >= 0.0) {
            return Err(SettingsError::Light(format!(
                "intensity must be non-negative, got {}",
                self.intensity
            )));
        }
        if !self.position.is_finite() || !self.color.is_finite() {
            return Err(SettingsError::Light("position and color must be finite".into()));
        }
        Ok(())
    }

    /// Point on the rectangle for a unit-square offset; (0.5, 0.5) is the center.
    #[inline]
    pub fn point_at(&self, offset: Vec2) -> Vec3 {
        self.position
            + Vec3::new(
                (offset.x - 0.5) * self.width,
                0.0,
                (offset.y - 0.5) * self.height,
            )
    }
}
