//! ACES filmic tonemapping.

use penumbra_core::Color;

use crate::framebuffer::FrameBuffer;

/// Narkowicz's fit of the ACES filmic curve, clamped to [0, 1].
///
/// Negative input, NaN and -inf map to 0; +inf maps to 1.
#[inline]
pub fn aces(x: f32) -> f32 {
    if !x.is_finite() {
        return if x == f32::INFINITY { 1.0 } else { 0.0 };
    }
    const A: f64 = 2.51;
    const B: f64 = 0.03;
    const C: f64 = 2.43;
    const D: f64 = 0.59;
    const E: f64 = 0.14;
    // f64 so x^2 cannot overflow for any finite f32
    let x = x.max(0.0) as f64;
    ((x * (A * x + B)) / (x * (C * x + D) + E)).clamp(0.0, 1.0) as f32
}

pub fn aces_color(c: Color) -> Color {
    Color::new(aces(c.x), aces(c.y), aces(c.z))
}

/// Tonemap a whole (accumulated) buffer.
pub fn tonemap(buffer: &FrameBuffer) -> FrameBuffer {
    buffer.map(aces_color)
}
