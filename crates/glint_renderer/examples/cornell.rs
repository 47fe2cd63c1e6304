//! Cornell box render.
//!
//! Usage: `cargo run --release --example cornell -- [passes] [output.png] [config.json]`
//!
//! Renders the given number of passes (default 64) and writes a gamma
//! corrected PNG.

use anyhow::{Context, Result};
use glint_renderer::{
    Color, ConstantMaterial, MaterialProperties, Quad, Scene, Sphere, Surface, Tracer,
    TracerConfig, Vec3,
};
use std::sync::Arc;
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let passes: u32 = match args.next() {
        Some(arg) => arg.parse().context("passes must be a number")?,
        None => 64,
    };
    let output = args.next().unwrap_or_else(|| "cornell.png".to_string());
    let config = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing config {path}"))?
        }
        None => TracerConfig::default(),
    };

    let mut tracer = Tracer::new(config, build_scene()?)?;

    let start = Instant::now();
    let mut rays = 0;
    for _ in 0..passes {
        tracer.sample();
        rays += tracer.rays_last_pass();
    }
    log::info!(
        "Rendered {} passes ({} rays) in {:?}",
        passes,
        rays,
        start.elapsed()
    );

    to_rgb8(&tracer.accumulator().to_image())
        .save(&output)
        .with_context(|| format!("writing {output}"))?;
    log::info!("Saved to {}", output);

    Ok(())
}

fn build_scene() -> Result<Scene> {
    let white = Color::splat(0.9);
    let red = Color::new(0.9, 0.2, 0.2);
    let green = Color::new(0.2, 0.9, 0.2);

    let mut scene = Scene::new();

    // Walls: left, right, ceiling, floor, back
    scene.add(Surface::new(
        Quad::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 0.0, 2.0)),
        ConstantMaterial::diffuse(red),
    ));
    scene.add(Surface::new(
        Quad::new(Vec3::new(1.0, -1.0, -1.0), Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 0.0, 2.0)),
        ConstantMaterial::diffuse(green),
    ));
    scene.add(Surface::new(
        Quad::new(Vec3::new(-1.0, 1.0, -1.0), Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0)),
        ConstantMaterial::diffuse(white),
    ));
    scene.add(Surface::new(
        Quad::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0)),
        ConstantMaterial::diffuse(white),
    ));
    scene.add(Surface::new(
        Quad::new(Vec3::new(-1.0, -1.0, 1.0), Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0)),
        ConstantMaterial::diffuse(white),
    ));

    // Ceiling light, just below the ceiling
    scene.add_light(Surface::new(
        Quad::new(Vec3::new(0.0, 0.99999, -0.5), Vec3::new(0.5, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.5)),
        ConstantMaterial::emissive(white, white * 10.0),
    ))?;

    // Partition and a tilted mirror
    scene.add(Surface::new(
        Quad::new(Vec3::new(-0.2, -0.5, -1.0), Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.0, 0.0, 2.0)),
        ConstantMaterial::diffuse(white),
    ));
    let mirror = MaterialProperties::diffuse(white).with_metallic(1.0).with_roughness(0.0);
    scene.add(Surface::new(
        Quad::new(Vec3::new(0.0, -1.0, -0.5), Vec3::new(0.7, 0.7, 0.0), Vec3::new(-0.5, 0.0, 1.0)),
        Arc::new(ConstantMaterial::new(mirror)),
    ));

    // Distant sun
    let sun_center = Vec3::new(0.0, 1000.0, 0.0);
    scene.add_light(Surface::new(
        Sphere::new(sun_center, 50.0),
        ConstantMaterial::emissive(Color::ZERO, Color::new(1.0, 1.0, 0.7) * 200.0),
    ))?;
    scene.set_sun(sun_center, Color::new(1.0, 1.0, 0.8));

    Ok(scene)
}

/// Gamma 2 encode and quantize to 8 bits.
fn to_rgb8(image: &image::Rgb32FImage) -> image::RgbImage {
    image::RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        image::Rgb([encode(r), encode(g), encode(b)])
    })
}

fn encode(linear: f32) -> u8 {
    (255.0 * linear.max(0.0).sqrt().clamp(0.0, 1.0)) as u8
}
