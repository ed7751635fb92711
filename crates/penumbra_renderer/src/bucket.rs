//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon. Every bucket seeds its own RNG
//! from the frame and its position in the render order, so a frame renders
//! the same no matter how rayon schedules the work.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::Camera;
use crate::integrator::{PathIntegrator, PixelSample};
use crate::sampling::gen_f32;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's lower-left corner
    pub x: u32,
    /// Y coordinate of bucket's lower-left corner (row 0 is the bottom)
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self { x, y, width, height, index }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Image coordinate of the `i`-th pixel in bucket row-major order.
    #[inline]
    pub fn pixel(&self, i: usize) -> (u32, u32) {
        let i = i as u32;
        (self.x + i % self.width, self.y + i / self.width)
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Buckets are rendered from the center outward so the most important part
/// of the image resolves first.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();
    let mut index = 0;

    // Generate grid of buckets
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    // Sort by distance from center (spiral order)
    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center (spiral order).
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let dist = |b: &Bucket| {
        let cx = b.x as f32 + b.width as f32 / 2.0;
        let cy = b.y as f32 + b.height as f32 / 2.0;
        (cx - center_x).powi(2) + (cy - center_y).powi(2)
    };

    // Stable sort keeps equidistant buckets in scanline order
    buckets.sort_by(|a, b| dist(a).total_cmp(&dist(b)));
}

/// Mix the session seed, frame index and bucket index into one RNG seed.
///
/// The result goes through `StdRng::seed_from_u64`, which scrambles it further.
pub fn bucket_seed(seed: u64, frame: u64, bucket: usize) -> u64 {
    seed ^ frame.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (bucket as u64).wrapping_mul(0xD1B5_4A32_D192_ED03)
}

/// Everything needed to render buckets of one frame.
pub struct FrameJob<'a> {
    pub camera: &'a Camera,
    pub integrator: &'a PathIntegrator<'a>,
    pub seed: u64,
    pub frame: u64,
    pub jitter: bool,
    pub clamp: bool,
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel samples in bucket row-major order, radiance already finished
    pub pixels: Vec<PixelSample>,
}

impl FrameJob<'_> {
    /// Render a single bucket.
    pub fn render_bucket(&self, bucket: &Bucket) -> BucketResult {
        let mut rng = StdRng::seed_from_u64(bucket_seed(self.seed, self.frame, bucket.index));
        let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

        for i in 0..bucket.pixel_count() as usize {
            let (x, y) = bucket.pixel(i);
            let (mut fx, mut fy) = (x as f32, y as f32);
            if self.jitter {
                fx += gen_f32(&mut rng) - 0.5;
                fy += gen_f32(&mut rng) - 0.5;
            }

            let sample = match self.camera.ray_for_pixel(fx, fy) {
                Some(ray) => self.integrator.trace_primary(&ray, &mut rng),
                None => PixelSample::default(),
            };

            pixels.push(PixelSample {
                radiance: sample.finished_radiance(self.clamp),
                ..sample
            });
        }

        BucketResult {
            bucket: *bucket,
            pixels,
        }
    }
}
