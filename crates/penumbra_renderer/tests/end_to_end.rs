//! Whole-pipeline checks: scene -> BVH -> session -> buffers.

use std::sync::atomic::AtomicBool;

use penumbra_core::{Material, Mesh, Scene};
use penumbra_renderer::{
    AreaLight, CameraSettings, Color, IntegratorSettings, RenderSession, RenderSettings, SceneBvh,
    Vec3,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const SIZE: u32 = 9;
const CENTER: u32 = SIZE / 2;

/// A quad around the origin facing +Z. Slightly lopsided so the center ray
/// does not land on the shared diagonal.
fn quad_scene(diffuse: Color) -> Scene {
    let mut scene = Scene::new();
    let surface = scene.add_material(Material::diffuse("quad", diffuse));
    scene
        .add_mesh(Mesh::quad(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.2, -1.0, 0.0),
            Vec3::new(1.2, 1.3, 0.0),
            Vec3::new(-1.0, 1.3, 0.0),
            surface,
        ))
        .unwrap();
    scene
}

fn quad_settings(intensity: f32) -> RenderSettings {
    RenderSettings {
        ambient: 0.0,
        bucket_size: 4,
        camera: CameraSettings {
            origin: Vec3::new(0.0, 0.0, 10.0),
            look_at: Vec3::ZERO,
            up: Vec3::Y,
            // Viewport corners land outside the quad.
            vfov_degrees: 20.0,
        },
        light: AreaLight::new(Vec3::new(0.0, 0.0, 5.0), 1.0, 1.0).with_intensity(intensity),
        ..RenderSettings::default().with_resolution(SIZE, SIZE)
    }
}

#[test]
fn quad_center_converges_to_lambert_term() {
    init_logging();
    let diffuse = Color::new(0.5, 0.4, 0.3);
    let scene = quad_scene(diffuse);
    let bvh = SceneBvh::build(&scene);
    let mut session = RenderSession::new(quad_settings(1.5), &bvh, &scene).unwrap();

    assert_eq!(session.run(4, &AtomicBool::new(false)).unwrap(), 4);

    // Light straight along the normal: cos = 1, fully visible.
    let expected = diffuse * 1.5;
    let center = session.accumulated().get(CENTER, CENTER);
    assert!(center.abs_diff_eq(expected, 1e-4), "center = {center}, expected {expected}");

    let aux = session.aux();
    assert!(aux.albedo.get(CENTER, CENTER).abs_diff_eq(diffuse, 1e-6));
    assert!(aux.normal.get(CENTER, CENTER).abs_diff_eq(Vec3::Z, 1e-6));
}

#[test]
fn misses_are_exactly_black() {
    init_logging();
    let scene = quad_scene(Color::splat(0.5));
    let bvh = SceneBvh::build(&scene);
    let mut session = RenderSession::new(quad_settings(1.0), &bvh, &scene).unwrap();
    session.run(2, &AtomicBool::new(false)).unwrap();

    for (x, y) in [(0, 0), (SIZE - 1, 0), (0, SIZE - 1), (SIZE - 1, SIZE - 1)] {
        assert_eq!(session.accumulated().get(x, y), Color::ZERO, "pixel ({x}, {y})");
        assert_eq!(session.last_frame().get(x, y), Color::ZERO);
        assert_eq!(session.aux().albedo.get(x, y), Color::ZERO);
    }
}

#[test]
fn radiance_is_clamped_before_accumulation() {
    let scene = quad_scene(Color::ONE);
    let bvh = SceneBvh::build(&scene);

    let mut clamped = RenderSession::new(quad_settings(10.0), &bvh, &scene).unwrap();
    clamped.render_frame().unwrap();
    assert_eq!(clamped.accumulated().get(CENTER, CENTER), Color::ONE);

    let settings = RenderSettings {
        clamp_radiance: false,
        ..quad_settings(10.0)
    };
    let mut unclamped = RenderSession::new(settings, &bvh, &scene).unwrap();
    unclamped.render_frame().unwrap();
    assert!(unclamped.accumulated().get(CENTER, CENTER).x > 1.0);
}

#[test]
fn zero_depth_renders_black() {
    let scene = Scene::cornell_box().unwrap();
    let bvh = SceneBvh::build(&scene);
    let settings = RenderSettings {
        integrator: IntegratorSettings {
            max_depth: 0,
            ..Default::default()
        },
        bucket_size: 8,
        ..RenderSettings::default().with_resolution(16, 16)
    };
    let mut session = RenderSession::new(settings, &bvh, &scene).unwrap();
    session.render_frame().unwrap();
    assert!(session.accumulated().as_floats().iter().all(|&v| v == 0.0));
}

#[test]
fn frames_do_not_depend_on_thread_scheduling() {
    let scene = Scene::cornell_box().unwrap();
    let bvh = SceneBvh::build(&scene);
    let settings = RenderSettings {
        seed: 7,
        bucket_size: 8,
        jitter_primary: true,
        ..RenderSettings::default().with_resolution(24, 24)
    };

    let render = || {
        let mut session = RenderSession::new(settings.clone(), &bvh, &scene).unwrap();
        session.run(2, &AtomicBool::new(false)).unwrap();
        session.accumulated().clone()
    };

    let single = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap()
        .install(render);
    let parallel = render();
    assert_eq!(single, parallel);
}

#[test]
fn cornell_box_renders_something() {
    init_logging();
    let scene = Scene::cornell_box().unwrap();
    let bvh = SceneBvh::build(&scene);
    let settings = RenderSettings {
        bucket_size: 8,
        ..RenderSettings::default().with_resolution(16, 16)
    };
    let mut session = RenderSession::new(settings, &bvh, &scene).unwrap();
    session.run(2, &AtomicBool::new(false)).unwrap();

    let image = session.tonemapped();
    assert!(image.as_floats().iter().all(|v| (0.0..=1.0).contains(v)));
    // Whatever the center ray hits gets at least the ambient term.
    assert!(image.get(8, 8).length() > 0.0);
}

#[test]
fn offset_cache_regenerates_once_per_count_change() {
    let scene = quad_scene(Color::splat(0.5));
    let bvh = SceneBvh::build(&scene);
    let mut session = RenderSession::new(quad_settings(1.0), &bvh, &scene).unwrap();
    session.render_frame().unwrap();
    assert_eq!(session.offsets().regenerations(), 1);

    assert!(session.set_shadow_samples(36).unwrap());
    session.render_frame().unwrap();
    assert!(!session.set_shadow_samples(36).unwrap());
    session.render_frame().unwrap();

    assert_eq!(session.offsets().regenerations(), 2);
    assert_eq!(session.offsets().len(), 36);
    assert_eq!(session.frame_count(), 3);
}
