//! Denoiser contract.
//!
//! Denoising is an external service: the renderer hands over the accumulated
//! linear radiance and first-hit aux buffers and expects a buffer of the same
//! shape back.

use thiserror::Error;

use crate::framebuffer::{AuxBuffers, FrameBuffer};

/// Errors a denoiser can report.
#[derive(Error, Debug)]
pub enum DenoiseError {
    #[error("Aux buffer '{name}' is {got:?}, color buffer is {expected:?}")]
    AuxShape {
        name: &'static str,
        expected: (u32, u32),
        got: (u32, u32),
    },

    #[error("Denoiser failed: {0}")]
    Failed(String),
}

/// Filters a noisy radiance buffer.
pub trait Denoiser: Send + Sync {
    fn denoise(&self, color: &FrameBuffer, aux: &AuxBuffers<'_>) -> Result<FrameBuffer, DenoiseError>;

    fn name(&self) -> &str;
}

/// Identity denoiser; still checks the inputs agree in shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Denoiser for Passthrough {
    fn denoise(&self, color: &FrameBuffer, aux: &AuxBuffers<'_>) -> Result<FrameBuffer, DenoiseError> {
        check_aux(color, aux)?;
        Ok(color.clone())
    }

    fn name(&self) -> &str {
        "passthrough"
    }
}

/// Verify both aux buffers match the color buffer.
pub fn check_aux(color: &FrameBuffer, aux: &AuxBuffers<'_>) -> Result<(), DenoiseError> {
    for (name, buffer) in [("albedo", aux.albedo), ("normal", aux.normal)] {
        if !buffer.same_shape(color) {
            return Err(DenoiseError::AuxShape {
                name,
                expected: color.dimensions(),
                got: buffer.dimensions(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use penumbra_core::Color;

    #[test]
    fn test_passthrough_is_identity() {
        let mut color = FrameBuffer::new(4, 4);
        color.set(1, 2, Color::new(0.3, 0.6, 0.9));
        let albedo = FrameBuffer::new(4, 4);
        let normal = FrameBuffer::new(4, 4);

        let out = Passthrough
            .denoise(&color, &AuxBuffers { albedo: &albedo, normal: &normal })
            .unwrap();
        assert_eq!(out, color);
    }

    #[test]
    fn test_passthrough_rejects_mismatched_aux() {
        let color = FrameBuffer::new(4, 4);
        let albedo = FrameBuffer::new(4, 4);
        let normal = FrameBuffer::new(2, 2);

        let err = Passthrough
            .denoise(&color, &AuxBuffers { albedo: &albedo, normal: &normal })
            .unwrap_err();
        assert!(matches!(err, DenoiseError::AuxShape { name: "normal", .. }));
    }
}
