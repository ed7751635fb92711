//! Random sampling helpers.

use penumbra_math::{Vec2, Vec3};
use rand::{Rng, RngCore};

/// Uniform f32 in [0, 1) from a type-erased RNG.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform point in the unit square [0, 1)^2.
#[inline]
pub fn gen_vec2(rng: &mut dyn RngCore) -> Vec2 {
    Vec2::new(gen_f32(rng), gen_f32(rng))
}

// Shirley-Chiu concentric mapping, see PBR 3rd ed. 13.6.2

/// Map a point of the unit square onto the unit disk, preserving strata.
pub fn concentric_sample_disk(u: Vec2) -> Vec2 {
    let offset = u * 2.0 - Vec2::ONE;
    if offset == Vec2::ZERO {
        return Vec2::ZERO;
    }

    let (theta, r) = if offset.x.abs() > offset.y.abs() {
        (std::f32::consts::FRAC_PI_4 * (offset.y / offset.x), offset.x)
    } else {
        (
            std::f32::consts::FRAC_PI_2 - std::f32::consts::FRAC_PI_4 * (offset.x / offset.y),
            offset.y,
        )
    };

    Vec2::new(theta.cos(), theta.sin()) * r
}

/// Cosine-weighted direction on the +Z hemisphere (Malley's method).
pub fn cosine_sample_hemisphere(u: Vec2) -> Vec3 {
    let d = concentric_sample_disk(u);
    let z = (1.0 - d.x * d.x - d.y * d.y).max(0.0).sqrt();
    Vec3::new(d.x, d.y, z)
}

/// Cosine-weighted direction around `normal` (unit length).
pub fn sample_cosine_direction(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let local = cosine_sample_hemisphere(gen_vec2(rng));
    let (tangent, bitangent) = normal.any_orthonormal_pair();
    tangent * local.x + bitangent * local.y + normal * local.z
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_concentric_disk_stays_inside() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let d = concentric_sample_disk(gen_vec2(&mut rng));
            assert!(d.length() <= 1.0 + 1e-5);
        }
        assert_eq!(concentric_sample_disk(Vec2::splat(0.5)), Vec2::ZERO);
    }

    #[test]
    fn test_concentric_disk_corners_map_to_rim() {
        let d = concentric_sample_disk(Vec2::new(1.0, 0.5));
        assert!((d - Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_cosine_direction_is_unit_and_in_hemisphere() {
        let mut rng = StdRng::seed_from_u64(42);
        let normal = Vec3::new(1.0, 2.0, -0.5).normalize();
        for _ in 0..1000 {
            let dir = sample_cosine_direction(normal, &mut rng);
            assert!((dir.length() - 1.0).abs() < 1e-4);
            assert!(dir.dot(normal) >= -1e-5);
        }
    }

    #[test]
    fn test_cosine_direction_mean_cosine() {
        // E[cos] under a cosine-weighted pdf is 2/3.
        let mut rng = StdRng::seed_from_u64(3);
        let n = 20_000;
        let sum: f32 = (0..n)
            .map(|_| sample_cosine_direction(Vec3::Y, &mut rng).y)
            .sum();
        let mean = sum / n as f32;
        assert!((mean - 2.0 / 3.0).abs() < 0.02, "mean cos = {mean}");
    }
}
