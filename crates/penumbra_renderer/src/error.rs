use thiserror::Error;

use crate::denoise::DenoiseError;
use crate::settings::SettingsError;

/// Errors raised while rendering or writing results.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Frame is {got:?}, expected {expected:?}")]
    FrameShape { expected: (u32, u32), got: (u32, u32) },

    #[error("Denoiser '{name}' failed: {source}")]
    Denoise {
        name: String,
        #[source]
        source: DenoiseError,
    },

    #[error("Denoiser '{name}' returned {got:?}, expected {expected:?}")]
    DenoisedShape {
        name: String,
        expected: (u32, u32),
        got: (u32, u32),
    },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
