//! Direct lighting from the area light.

use penumbra_core::Color;
use penumbra_math::Vec3;
use rand::RngCore;

use crate::integrator::RenderContext;

/// Ambient term plus shadowed Lambert contribution of the area light.
///
/// The light is treated as a point at its center for the cosine term; its
/// extent only enters through the visibility estimate. Points facing away
/// from the light get the ambient term and cast no shadow rays. The result is
/// not clamped.
pub fn direct_lighting(
    ctx: &RenderContext<'_>,
    point: Vec3,
    normal: Vec3,
    diffuse: Color,
    rng: &mut dyn RngCore,
) -> Color {
    let ambient = diffuse * ctx.ambient;

    let Some(to_light) = (ctx.light.position - point).try_normalize() else {
        return ambient;
    };

    let n_dot_l = normal.dot(to_light);
    if n_dot_l <= 0.0 {
        return ambient;
    }

    let shadow = ctx.visibility().estimate(point, normal, rng).factor;
    ambient + shadow * diffuse * ctx.light.color * (n_dot_l * ctx.light.intensity)
}
