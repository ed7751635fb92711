//! Surface materials and the handles that resolve to them.

use penumbra_math::Vec3;
use serde::{Deserialize, Serialize};

/// Linear RGB color.
pub type Color = Vec3;

/// Stable handle into a scene's material table.
///
/// Every triangle carries one; the integrator never sees the material
/// storage, only this id and whatever the resolver returns for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(pub u32);

impl SurfaceId {
    /// Index into the material table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Per-surface reflectance and emission, all in linear RGB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Material name (for logs and debugging)
    pub name: String,

    /// Lambertian albedo
    pub diffuse: Color,

    /// Mirror reflectance
    pub specular: Color,

    /// Emitted radiance
    pub emissive: Color,
}

impl Material {
    /// Sentinel returned for ids that resolve to nothing.
    ///
    /// Bright magenta so modeling errors show up in the image instead of
    /// aborting the render.
    pub const ERROR: Material = Material {
        name: String::new(),
        diffuse: Vec3::new(1.0, 0.0, 1.0),
        specular: Vec3::ZERO,
        emissive: Vec3::ZERO,
    };

    /// Create a purely diffuse material.
    pub fn diffuse(name: impl Into<String>, diffuse: Color) -> Self {
        Self {
            name: name.into(),
            diffuse,
            ..Default::default()
        }
    }

    /// Add a mirror component.
    pub fn with_specular(mut self, specular: Color) -> Self {
        self.specular = specular;
        self
    }

    /// Add emission.
    pub fn with_emissive(mut self, emissive: Color) -> Self {
        self.emissive = emissive;
        self
    }

    /// Check if this material is emissive.
    pub fn is_emissive(&self) -> bool {
        self.emissive.max_element() > 0.0
    }

    /// Check if this material has a mirror component.
    pub fn is_specular(&self) -> bool {
        self.specular.max_element() > 0.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            diffuse: Color::splat(0.5),
            specular: Color::ZERO,
            emissive: Color::ZERO,
        }
    }
}
