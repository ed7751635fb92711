//! Progressive frame averaging.

use crate::error::{RenderError, RenderResult};
use crate::framebuffer::FrameBuffer;

/// Running per-pixel mean over the frames rendered so far.
#[derive(Debug, Clone)]
pub struct Accumulator {
    buffer: FrameBuffer,
    frames: u32,
}

impl Accumulator {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: FrameBuffer::new(width, height),
            frames: 0,
        }
    }

    /// Fold `frame` into the mean; returns the new frame count.
    pub fn add(&mut self, frame: &FrameBuffer) -> RenderResult<u32> {
        if !self.buffer.same_shape(frame) {
            return Err(RenderError::FrameShape {
                expected: self.buffer.dimensions(),
                got: frame.dimensions(),
            });
        }

        self.frames += 1;
        let n = self.frames as f32;
        for (acc, &sample) in self.buffer.pixels_mut().iter_mut().zip(frame.pixels()) {
            *acc += (sample - *acc) / n;
        }

        Ok(self.frames)
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.frames = 0;
    }

    /// Frames folded in since the last reset.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }
}
