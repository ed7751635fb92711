//! Progressive render session.
//!
//! Owns the camera, the light offset cache and the accumulation buffers, and
//! renders frames in parallel over buckets. The scene is borrowed through the
//! [`Intersector`] and [`MaterialResolver`] contracts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::accumulator::Accumulator;
use crate::bucket::{generate_buckets, Bucket, BucketResult, FrameJob};
use crate::camera::Camera;
use crate::denoise::Denoiser;
use crate::error::{RenderError, RenderResult};
use crate::framebuffer::{AuxBuffers, FrameBuffer};
use crate::integrator::{PathIntegrator, RenderContext};
use crate::intersect::{Intersector, MaterialResolver};
use crate::offsets::StratifiedOffsets;
use crate::settings::RenderSettings;
use crate::tonemap::tonemap;

/// Keeps the offset stream apart from the per-bucket streams.
const OFFSET_SEED_SALT: u64 = 0x6C8E_9CF5_7093_2BD5;

pub struct RenderSession<'a> {
    settings: RenderSettings,
    intersector: &'a dyn Intersector,
    materials: &'a dyn MaterialResolver,
    camera: Camera,
    offsets: StratifiedOffsets,
    offset_rng: StdRng,
    buckets: Vec<Bucket>,

    frame: FrameBuffer,
    frame_albedo: FrameBuffer,
    frame_normal: FrameBuffer,

    color: Accumulator,
    albedo: Accumulator,
    normal: Accumulator,

    /// Frames rendered over the session's lifetime; feeds the bucket seeds
    frame_index: u64,
}

impl<'a> RenderSession<'a> {
    /// Validate settings and set up camera, offsets and buffers.
    pub fn new(
        settings: RenderSettings,
        intersector: &'a dyn Intersector,
        materials: &'a dyn MaterialResolver,
    ) -> RenderResult<Self> {
        settings.validate()?;

        let (width, height) = (settings.width, settings.height);
        let camera = Camera::new(&settings.camera, width, height)?;

        let mut offset_rng = StdRng::seed_from_u64(settings.seed ^ OFFSET_SEED_SALT);
        let offsets = StratifiedOffsets::new(settings.shadow.samples as usize, &mut offset_rng);

        let buckets = generate_buckets(width, height, settings.bucket_size);

        log::info!(
            "Render session: {}x{}, {} buckets of {}px, depth {}, {:?} shadows with {} samples",
            width,
            height,
            buckets.len(),
            settings.bucket_size,
            settings.integrator.max_depth,
            settings.shadow.mode,
            settings.shadow.samples
        );

        Ok(Self {
            camera,
            offsets,
            offset_rng,
            buckets,
            frame: FrameBuffer::new(width, height),
            frame_albedo: FrameBuffer::new(width, height),
            frame_normal: FrameBuffer::new(width, height),
            color: Accumulator::new(width, height),
            albedo: Accumulator::new(width, height),
            normal: Accumulator::new(width, height),
            frame_index: 0,
            settings,
            intersector,
            materials,
        })
    }

    /// Render one frame and fold it into the accumulation buffers.
    ///
    /// Returns the number of frames accumulated so far.
    pub fn render_frame(&mut self) -> RenderResult<u32> {
        let start = Instant::now();

        let ctx = RenderContext {
            intersector: self.intersector,
            materials: self.materials,
            light: &self.settings.light,
            offsets: self.offsets.offsets(),
            shadow: &self.settings.shadow,
            ambient: self.settings.ambient,
        };
        let integrator = PathIntegrator::new(ctx, self.settings.integrator);
        let job = FrameJob {
            camera: &self.camera,
            integrator: &integrator,
            seed: self.settings.seed,
            frame: self.frame_index,
            jitter: self.settings.jitter_primary,
            clamp: self.settings.clamp_radiance,
        };

        let results: Vec<BucketResult> = self
            .buckets
            .par_iter()
            .map(|bucket| job.render_bucket(bucket))
            .collect();

        for result in &results {
            for (i, sample) in result.pixels.iter().enumerate() {
                let (x, y) = result.bucket.pixel(i);
                self.frame.set(x, y, sample.radiance);
                self.frame_albedo.set(x, y, sample.albedo);
                self.frame_normal.set(x, y, sample.normal);
            }
        }

        let count = self.color.add(&self.frame)?;
        self.albedo.add(&self.frame_albedo)?;
        self.normal.add(&self.frame_normal)?;
        self.frame_index += 1;

        log::info!(
            "Frame {} rendered in {:.2?} ({} buckets)",
            count,
            start.elapsed(),
            results.len()
        );

        Ok(count)
    }

    /// Render up to `frames` frames, stopping early once `cancel` is set.
    ///
    /// The flag is only checked between frames. Returns the number of frames
    /// rendered by this call.
    pub fn run(&mut self, frames: u32, cancel: &AtomicBool) -> RenderResult<u32> {
        let start = Instant::now();
        let mut rendered = 0;

        for _ in 0..frames {
            if cancel.load(Ordering::Relaxed) {
                log::info!("Render cancelled after {} of {} frames", rendered, frames);
                break;
            }
            self.render_frame()?;
            rendered += 1;
        }

        log::info!("Rendered {} frames in {:.2?}", rendered, start.elapsed());
        Ok(rendered)
    }

    /// Change the shadow sample count, regenerating the offsets if it differs.
    ///
    /// Accumulation continues across the change; call [`reset`](Self::reset)
    /// to start over. Returns whether the offsets were regenerated.
    pub fn set_shadow_samples(&mut self, samples: u32) -> RenderResult<bool> {
        let mut shadow = self.settings.shadow;
        shadow.samples = samples;
        shadow.min_samples = shadow.min_samples.min(samples);
        shadow.validate()?;

        self.settings.shadow = shadow;
        Ok(self.offsets.ensure(samples as usize, &mut self.offset_rng))
    }

    /// Discard accumulated frames.
    pub fn reset(&mut self) {
        self.color.reset();
        self.albedo.reset();
        self.normal.reset();
        log::debug!("Accumulation reset");
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn offsets(&self) -> &StratifiedOffsets {
        &self.offsets
    }

    /// Frames accumulated since the last reset.
    pub fn frame_count(&self) -> u32 {
        self.color.frames()
    }

    /// Radiance of the most recent frame.
    pub fn last_frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Running mean of all frames since the last reset.
    pub fn accumulated(&self) -> &FrameBuffer {
        self.color.buffer()
    }

    pub fn aux(&self) -> AuxBuffers<'_> {
        AuxBuffers {
            albedo: self.albedo.buffer(),
            normal: self.normal.buffer(),
        }
    }

    /// Accumulated radiance mapped to display range.
    pub fn tonemapped(&self) -> FrameBuffer {
        tonemap(self.accumulated())
    }

    /// Accumulated radiance run through `denoiser`.
    ///
    /// The output must match the accumulation buffer in shape.
    pub fn denoised(&self, denoiser: &dyn Denoiser) -> RenderResult<FrameBuffer> {
        let color = self.accumulated();
        let out = denoiser
            .denoise(color, &self.aux())
            .map_err(|source| RenderError::Denoise {
                name: denoiser.name().to_string(),
                source,
            })?;

        if !out.same_shape(color) {
            return Err(RenderError::DenoisedShape {
                name: denoiser.name().to_string(),
                expected: color.dimensions(),
                got: out.dimensions(),
            });
        }
        Ok(out)
    }
}
