//! Pinhole camera for primary ray generation.

use penumbra_math::{Interval, Ray, Vec3, RAY_EPSILON};
use serde::{Deserialize, Serialize};

use crate::settings::SettingsError;

/// Camera placement, as loaded from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub origin: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub vfov_degrees: f32,
}

impl Default for CameraSettings {
    /// Looking into the open side of the built-in Cornell box.
    fn default() -> Self {
        Self {
            origin: Vec3::new(-278.0, 274.4, 800.0),
            look_at: Vec3::new(-278.0, 274.4, -279.6),
            up: Vec3::Y,
            vfov_degrees: 45.0,
        }
    }
}

/// Camera with a precomputed viewport.
///
/// Pixel `(0, 0)` maps to the lower-left corner of the viewport, so row 0 of
/// the image is the bottom row.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    right: Vec3,
    up: Vec3,
    view_dir: Vec3,
    viewport_width: f32,
    viewport_height: f32,
    lower_left: Vec3,
    image_width: u32,
    image_height: u32,
}

impl Camera {
    /// Build the camera for a `width` x `height` image.
    pub fn new(settings: &CameraSettings, width: u32, height: u32) -> Result<Self, SettingsError> {
        if width < 2 || height < 2 {
            return Err(SettingsError::Resolution { width, height });
        }

        let vfov = settings.vfov_degrees;
        if !(vfov > 0.0 && vfov < 180.0) {
            return Err(SettingsError::Camera(format!(
                "vertical field of view must be in (0, 180) degrees, got {vfov}"
            )));
        }

        let to_target = settings.look_at - settings.origin;
        let focal = to_target.length();
        let view_dir = to_target
            .try_normalize()
            .ok_or_else(|| SettingsError::Camera("origin and look_at coincide".into()))?;
        let right = view_dir
            .cross(settings.up)
            .try_normalize()
            .ok_or_else(|| SettingsError::Camera("up vector is parallel to the view direction".into()))?;
        let up = right.cross(view_dir);

        let viewport_height = 2.0 * focal * (vfov.to_radians() / 2.0).tan();
        let viewport_width = viewport_height * (width as f32 / height as f32);

        let lower_left = settings.origin + view_dir * focal
            - right * (viewport_width / 2.0)
            - up * (viewport_height / 2.0);

        Ok(Self {
            origin: settings.origin,
            right,
            up,
            view_dir,
            viewport_width,
            viewport_height,
            lower_left,
            image_width: width,
            image_height: height,
        })
    }

    /// Primary ray through the (possibly fractional) pixel coordinate.
    pub fn ray_for_pixel(&self, x: f32, y: f32) -> Option<Ray> {
        let u = x / (self.image_width - 1) as f32;
        let v = y / (self.image_height - 1) as f32;

        let target = self.lower_left
            + self.right * (u * self.viewport_width)
            + self.up * (v * self.viewport_height);

        Ray::towards(self.origin, target - self.origin, Interval::from_min(RAY_EPSILON))
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn view_dir(&self) -> Vec3 {
        self.view_dir
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn looking_down_z() -> CameraSettings {
        CameraSettings {
            origin: Vec3::new(0.0, 0.0, 10.0),
            look_at: Vec3::ZERO,
            up: Vec3::Y,
            vfov_degrees: 90.0,
        }
    }

    #[test]
    fn test_camera_basis() {
        let camera = Camera::new(&looking_down_z(), 100, 50).unwrap();
        assert!(camera.view_dir().abs_diff_eq(-Vec3::Z, 1e-6));
        assert!(camera.right().abs_diff_eq(Vec3::X, 1e-6));
        assert!(camera.up().abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn test_center_pixel_looks_at_target() {
        let camera = Camera::new(&CameraSettings::default(), 9, 9).unwrap();
        let ray = camera.ray_for_pixel(4.0, 4.0).unwrap();
        assert!(ray.direction().abs_diff_eq(-Vec3::Z, 1e-5));
        assert_eq!(ray.t_min(), RAY_EPSILON);
        assert_eq!(ray.t_max(), f32::INFINITY);
    }

    #[test]
    fn test_row_zero_is_bottom() {
        let camera = Camera::new(&looking_down_z(), 11, 11).unwrap();
        let bottom_left = camera.ray_for_pixel(0.0, 0.0).unwrap();
        let top_right = camera.ray_for_pixel(10.0, 10.0).unwrap();
        assert!(bottom_left.direction().x < 0.0 && bottom_left.direction().y < 0.0);
        assert!(top_right.direction().x > 0.0 && top_right.direction().y > 0.0);

        // 90 degree fov: the corner of the viewport sits at 45 degrees per axis.
        let d = top_right.direction();
        assert!((d.x / -d.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_aspect_ratio_widens_viewport() {
        let camera = Camera::new(&looking_down_z(), 20, 10).unwrap();
        let right_edge = camera.ray_for_pixel(19.0, 4.5).unwrap().direction();
        assert!((right_edge.x / -right_edge.z - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_settings_rejected() {
        let mut settings = looking_down_z();
        settings.look_at = settings.origin;
        assert!(matches!(Camera::new(&settings, 8, 8), Err(SettingsError::Camera(_))));

        let mut settings = looking_down_z();
        settings.up = Vec3::Z;
        assert!(matches!(Camera::new(&settings, 8, 8), Err(SettingsError::Camera(_))));

        let mut settings = looking_down_z();
        settings.vfov_degrees = 180.0;
        assert!(matches!(Camera::new(&settings, 8, 8), Err(SettingsError::Camera(_))));

        assert!(matches!(
            Camera::new(&looking_down_z(), 1, 8),
            Err(SettingsError::Resolution { width: 1, height: 8 })
        ));
    }
}
