use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use penumbra_core::Scene;
use penumbra_renderer::{tonemap, write_image, Passthrough, RenderSession, RenderSettings, SceneBvh};

/// Render the Cornell box with soft area-light shadows.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON render settings; unspecified fields keep their defaults.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of frames to accumulate.
    #[arg(long, short = 'f', value_name = "NUM", default_value_t = 16)]
    frames: u32,

    /// Image width, overriding the config.
    #[arg(long, value_name = "PIXELS")]
    width: Option<u32>,

    /// Image height, overriding the config.
    #[arg(long, value_name = "PIXELS")]
    height: Option<u32>,

    /// Shadow rays per shading point (the adaptive maximum), overriding the config.
    #[arg(long, value_name = "NUM")]
    shadow_samples: Option<u32>,

    /// Base RNG seed, overriding the config.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Stop accumulating after this many seconds, finishing the current frame.
    #[arg(long, value_name = "SECONDS")]
    time_limit: Option<f64>,

    /// Worker threads; defaults to one per core.
    #[arg(long, short = 't', value_name = "NUM")]
    threads: Option<usize>,

    /// Output image; the format follows the extension.
    #[arg(long, short = 'o', value_name = "FILE", default_value = "render.png")]
    output: PathBuf,

    /// Run the accumulated image through the denoiser before tonemapping.
    #[arg(long)]
    denoise: bool,

    /// Log debug output.
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Args {
    fn settings(&self) -> Result<RenderSettings> {
        let mut settings = match &self.config {
            Some(path) => RenderSettings::load(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => RenderSettings::default(),
        };

        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(samples) = self.shadow_samples {
            settings = settings.with_shadow_samples(samples);
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }

        settings.validate()?;
        Ok(settings)
    }
}

/// Raise `cancel` once `limit` has passed.
fn spawn_watchdog(limit: Duration, cancel: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        std::thread::sleep(limit);
        log::info!("Time limit of {:?} reached", limit);
        cancel.store(true, Ordering::Relaxed);
    });
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env().filter_level(level).init();

    log::info!("Starting penumbra");

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the thread pool")?;
    }

    let settings = args.settings()?;

    let start = Instant::now();
    let scene = Scene::cornell_box()?;
    let bvh = SceneBvh::build(&scene);
    log::info!("Scene ready in {:?} ({} triangles)", start.elapsed(), bvh.triangle_count());

    let mut session = RenderSession::new(settings, &bvh, &scene)?;

    let cancel = Arc::new(AtomicBool::new(false));
    if let Some(seconds) = args.time_limit {
        let limit = Duration::try_from_secs_f64(seconds)
            .with_context(|| format!("Invalid time limit: {seconds}"))?;
        spawn_watchdog(limit, cancel.clone());
    }

    let rendered = session.run(args.frames, &cancel)?;
    if rendered == 0 {
        log::warn!("No frames rendered; writing a black image");
    }

    let image = if args.denoise {
        match session.denoised(&Passthrough) {
            Ok(denoised) => tonemap(&denoised),
            Err(err) => {
                log::warn!("Denoising failed, writing the raw image: {err:#}");
                session.tonemapped()
            }
        }
    } else {
        session.tonemapped()
    };

    write_image(&args.output, &image)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}
