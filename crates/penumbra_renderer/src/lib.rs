//! Penumbra Renderer - progressive CPU path tracing
//!
//! A Monte Carlo path tracer built around soft area-light shadows:
//!
//! - **Integrator**: recursive diffuse and mirror bounces on top of direct
//!   lighting from a rectangular area light
//! - **Visibility**: stratified or adaptive shadow sampling over a cached,
//!   shuffled jittered grid of light offsets
//! - **Session**: bucketed rendering on the rayon pool with per-frame
//!   accumulation, ACES tonemapping and a pluggable denoiser
//!
//! Geometry and materials are consumed through the [`Intersector`] and
//! [`MaterialResolver`] traits; [`SceneBvh`] is the bundled CPU backend.

mod accumulator;
mod bucket;
mod bvh;
mod camera;
mod denoise;
mod error;
mod framebuffer;
mod integrator;
mod intersect;
mod light;
mod lighting;
mod offsets;
mod output;
mod sampling;
mod session;
mod settings;
mod tonemap;
mod triangle;
mod visibility;

pub use accumulator::Accumulator;
pub use bucket::{bucket_seed, generate_buckets, Bucket, BucketResult, FrameJob, DEFAULT_BUCKET_SIZE};
pub use bvh::SceneBvh;
pub use camera::{Camera, CameraSettings};
pub use denoise::{check_aux, DenoiseError, Denoiser, Passthrough};
pub use error::{RenderError, RenderResult};
pub use framebuffer::{AuxBuffers, FrameBuffer};
pub use integrator::{facing_normal, IntegratorSettings, PathIntegrator, PixelSample, RenderContext};
pub use intersect::{Hit, Intersector, MaterialResolver};
pub use light::AreaLight;
pub use lighting::direct_lighting;
pub use offsets::StratifiedOffsets;
pub use output::write_image;
pub use sampling::{concentric_sample_disk, cosine_sample_hemisphere, gen_f32, sample_cosine_direction};
pub use session::RenderSession;
pub use settings::{RenderSettings, SettingsError, SettingsResult};
pub use tonemap::{aces, aces_color, tonemap};
pub use triangle::Triangle;
pub use visibility::{ShadowEstimate, ShadowMode, ShadowSettings, VisibilityEstimator};

/// Re-export common math types from penumbra_math
pub use penumbra_math::{Aabb, Interval, Ray, Vec2, Vec3};
pub use penumbra_core::Color;
