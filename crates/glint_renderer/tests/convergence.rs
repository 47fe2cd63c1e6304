//! End-to-end check: a diffuse floor lit by a small emissive quad converges
//! to the expected direct lighting estimate.

use glint_renderer::{
    Color, ConstantMaterial, PathIntegrator, Prng, Quad, Ray, RayCounter, Scene, Sky, Surface,
    Tracer, TracerConfig, Vec3,
};
use std::f32::consts::{FRAC_PI_2, PI};

const ALBEDO: f32 = 0.5;
const EMISSION: f32 = 4.0;
const LIGHT_HEIGHT: f32 = 1.0;

/// Black sky, a large grey floor at y = 0 and a 1x1 light facing down,
/// centered above the origin.
fn floor_and_light() -> Scene {
    let mut scene = Scene::new();
    scene.sky = Sky::Uniform(Color::ZERO);
    scene.add(Surface::new(
        Quad::new(
            Vec3::new(-10.0, 0.0, -10.0),
            Vec3::new(0.0, 0.0, 20.0),
            Vec3::new(20.0, 0.0, 0.0),
        ),
        ConstantMaterial::diffuse(Color::splat(ALBEDO)),
    ));
    scene
        .add_light(Surface::new(
            Quad::new(Vec3::new(-0.5, LIGHT_HEIGHT, -0.5), Vec3::X, Vec3::Z),
            ConstantMaterial::emissive(Color::ZERO, Color::splat(EMISSION)),
        ))
        .expect("quads can be lights");
    scene
}

/// Expected radiance leaving the floor at the origin: the light sample
/// weight `emission · cosθ / (1 + d²) · area / π` averaged over the light,
/// by midpoint quadrature.
fn expected_radiance() -> f32 {
    let n = 400;
    let step = 1.0 / n as f32;
    let mut sum = 0.0f64;
    for i in 0..n {
        for j in 0..n {
            let x = -0.5 + (i as f32 + 0.5) * step;
            let z = -0.5 + (j as f32 + 0.5) * step;
            let d2 = x * x + z * z + LIGHT_HEIGHT * LIGHT_HEIGHT;
            let cos_theta = LIGHT_HEIGHT / d2.sqrt();
            sum += (cos_theta / (1.0 + d2)) as f64;
        }
    }
    let mean = (sum / (n * n) as f64) as f32;
    ALBEDO * EMISSION * mean / PI
}

#[test]
fn test_integrator_converges_to_direct_lighting() {
    let scene = floor_and_light();
    let integrator = PathIntegrator::default();
    let mut prng = Prng::new(2024);
    let mut rays = RayCounter::new();
    let ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), -Vec3::Y);

    let samples = 100_000;
    let mut total = Color::ZERO;
    for _ in 0..samples {
        total += integrator.trace(&scene, ray, &mut prng, &mut rays);
    }
    let estimate = total / samples as f32;
    let expected = expected_radiance();

    for channel in estimate.to_array() {
        let error = (channel - expected).abs() / expected;
        assert!(error < 0.01, "estimate {channel} vs expected {expected}");
    }
}

#[test]
fn test_tracer_converges_to_direct_lighting() {
    let config = TracerConfig {
        width: 1,
        height: 1,
        workers: 1,
        seed: Some(77),
        ..TracerConfig::default()
    };
    let mut tracer = Tracer::new(config, floor_and_light()).expect("tracer");

    // Narrow camera looking straight down at the origin from below the light
    let camera = tracer.camera_mut();
    camera.position = Vec3::new(0.0, 0.5, 0.0);
    camera.pitch = -FRAC_PI_2;
    camera.horizontal_fov = 0.001;
    tracer.clear();

    for _ in 0..4000 {
        tracer.sample();
    }
    assert_eq!(tracer.sample_count(), 4000);

    let estimate = tracer.accumulator().average(0, 0);
    let expected = expected_radiance();
    for channel in estimate.to_array() {
        let error = (channel - expected).abs() / expected;
        assert!(error < 0.03, "estimate {channel} vs expected {expected}");
    }
}
