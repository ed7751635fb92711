//! Simple path tracer example.
//!
//! Renders the built-in Cornell box twice, once per shadow mode, and reports
//! how long each took. Saves both as PNG.

use std::sync::atomic::AtomicBool;

use penumbra_core::Scene;
use penumbra_renderer::{write_image, RenderSession, RenderSettings, SceneBvh, ShadowMode};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    println!("Penumbra - Simple Example");
    println!("=========================");

    // Build the scene
    let start = std::time::Instant::now();
    let scene = Scene::cornell_box()?;
    let bvh = SceneBvh::build(&scene);
    println!("Scene built in {:?} ({} triangles)", start.elapsed(), bvh.triangle_count());

    for mode in [ShadowMode::Stratified, ShadowMode::Adaptive] {
        let mut settings = RenderSettings::default().with_resolution(256, 256);
        settings.shadow.mode = mode;

        let mut session = RenderSession::new(settings, &bvh, &scene)?;

        let start = std::time::Instant::now();
        session.run(8, &AtomicBool::new(false))?;
        println!("{:?}: 8 frames in {:?}", mode, start.elapsed());

        let filename = format!("cornell_{:?}.png", mode).to_lowercase();
        write_image(&filename, &session.tonemapped())?;
        println!("Saved to {}", filename);
    }

    Ok(())
}
