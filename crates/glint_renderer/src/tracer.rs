//! Parallel progressive sampling.
//!
//! Every call to [`Tracer::sample`] adds one path sample per pixel to the
//! accumulator. Rows are dealt out round-robin to a fixed set of workers, so
//! worker `i` owns rows `i, i + n, i + 2n, ...` and writes to them without
//! locking. The call returns once every worker has finished its rows.

use crate::{Accumulator, Camera, PathIntegrator, Prng, RayCounter, Scene, TracerConfig};
use glint_math::{Color, Ray};
use std::time::Instant;
use thiserror::Error;

/// Errors that can occur while setting up a tracer.
#[derive(Error, Debug)]
pub enum TracerError {
    #[error("tracer needs at least one worker")]
    NoWorkers,

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type TracerResult<T> = Result<T, TracerError>;

/// Owns a scene, a camera and the accumulated image, and renders passes on a
/// dedicated thread pool.
pub struct Tracer {
    config: TracerConfig,
    scene: Scene,
    camera: Camera,
    integrator: PathIntegrator,
    accumulator: Accumulator,
    pool: rayon::ThreadPool,
    /// One generator per worker, created on the first pass
    prngs: Vec<Prng>,
    rays_last_pass: u64,
}

impl std::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracer")
            .field("config", &self.config)
            .field("camera", &self.camera)
            .field("passes", &self.accumulator.passes())
            .field("rays_last_pass", &self.rays_last_pass)
            .finish_non_exhaustive()
    }
}

impl Tracer {
    pub fn new(config: TracerConfig, scene: Scene) -> TracerResult<Self> {
        if config.workers == 0 {
            return Err(TracerError::NoWorkers);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|i| format!("glint-worker-{i}"))
            .build()?;

        log::info!(
            "Tracer ready: {}x{}, {} workers, {} surfaces ({} lights)",
            config.width,
            config.height,
            config.workers,
            scene.surfaces().len(),
            scene.lights().len()
        );

        Ok(Self {
            accumulator: Accumulator::new(config.width, config.height),
            integrator: PathIntegrator::new(config.integrator),
            camera: Camera::new(),
            config,
            scene,
            pool,
            prngs: Vec::new(),
            rays_last_pass: 0,
        })
    }

    /// Replace the image with a black one of the new size.
    pub fn resize(&mut self, width: u32, height: u32) {
        log::info!("Resizing to {}x{}", width, height);
        self.config.width = width;
        self.config.height = height;
        self.accumulator = Accumulator::new(width, height);
    }

    /// Discard every accumulated sample.
    pub fn clear(&mut self) {
        self.accumulator.clear();
    }

    /// Render one pass: one new sample for every pixel.
    ///
    /// A panic inside a worker is re-raised here once all workers stop.
    pub fn sample(&mut self) {
        let start = Instant::now();
        self.camera.update_basis();

        if self.prngs.is_empty() {
            self.prngs = (0..self.config.workers as u64)
                .map(|i| match self.config.seed {
                    Some(seed) => Prng::new(seed.wrapping_add(i)),
                    None => Prng::from_entropy(),
                })
                .collect();
        }

        let width = self.accumulator.width();
        let height = self.accumulator.height();
        let mut rays = RayCounter::new();
        if width > 0 && height > 0 {
            let workers = self.prngs.len();
            let mut lanes: Vec<Vec<(u32, &mut [Color])>> = (0..workers).map(|_| Vec::new()).collect();
            for (y, row) in self.accumulator.sums_mut().chunks_mut(width as usize).enumerate() {
                lanes[y % workers].push((y as u32, row));
            }

            let scene = &self.scene;
            let camera = &self.camera;
            let integrator = &self.integrator;
            let tan_half_fov = camera.tan_half_fov();
            let mut counters = vec![RayCounter::new(); workers];

            self.pool.scope(|s| {
                let work = lanes.into_iter().zip(self.prngs.iter_mut()).zip(counters.iter_mut());
                for ((rows, prng), counter) in work {
                    s.spawn(move |_| {
                        for (y, row) in rows {
                            for (x, pixel) in row.iter_mut().enumerate() {
                                let ray =
                                    camera.pixel_to_ray(x as u32, y, width, height, tan_half_fov, prng);
                                *pixel += integrator.trace(scene, ray, prng, counter);
                            }
                        }
                    });
                }
            });

            for counter in counters {
                rays += counter;
            }
        }

        self.rays_last_pass = rays.count();
        self.accumulator.finish_pass();
        let elapsed = start.elapsed();
        log::debug!(
            "Pass {} took {:.2?}, {} rays ({:.2} Mrays/s)",
            self.accumulator.passes(),
            elapsed,
            self.rays_last_pass,
            self.rays_last_pass as f64 / elapsed.as_secs_f64().max(1e-9) / 1e6
        );
    }

    /// Primary ray through pixel (x, y) of the current image.
    pub fn pixel_to_ray(&self, x: u32, y: u32, tan_half_fov: f32, prng: &mut Prng) -> Ray {
        self.camera.pixel_to_ray(
            x,
            y,
            self.accumulator.width(),
            self.accumulator.height(),
            tan_half_fov,
            prng,
        )
    }

    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    /// Rays cast during the most recent pass, shadow rays included.
    pub fn rays_last_pass(&self) -> u64 {
        self.rays_last_pass
    }

    /// Number of passes accumulated since the last clear.
    pub fn sample_count(&self) -> u32 {
        self.accumulator.passes()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera access. Call [`Tracer::clear`] after moving it, or old
    /// samples blend with new ones.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access. Call [`Tracer::clear`] after editing.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConstantMaterial, Material, MaterialProperties, Quad, Sky, Surface};
    use glint_math::Vec3;
    use std::sync::Arc;

    fn config(width: u32, height: u32) -> TracerConfig {
        TracerConfig {
            width,
            height,
            workers: 3,
            seed: Some(11),
            ..TracerConfig::default()
        }
    }

    fn lit_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add(Surface::new(
            Quad::new(Vec3::new(-2.0, -1.0, -2.0), Vec3::new(0.0, 0.0, 6.0), Vec3::new(4.0, 0.0, 0.0)),
            ConstantMaterial::diffuse(Color::splat(0.6)),
        ));
        scene
            .add_light(Surface::new(
                Quad::new(Vec3::new(-0.5, 1.0, 0.0), Vec3::X, Vec3::Z),
                ConstantMaterial::emissive(Color::ZERO, Color::splat(5.0)),
            ))
            .expect("light");
        scene
    }

    #[test]
    fn test_zero_workers_rejected() {
        let result = Tracer::new(
            TracerConfig {
                workers: 0,
                ..TracerConfig::default()
            },
            Scene::new(),
        );
        assert!(matches!(result, Err(TracerError::NoWorkers)));
    }

    #[test]
    fn test_uniform_sky_fills_every_pixel() {
        let mut scene = Scene::new();
        scene.sky = Sky::Uniform(Color::splat(0.5));
        let mut tracer = Tracer::new(config(7, 5), scene).expect("tracer");

        tracer.sample();
        tracer.sample();
        assert_eq!(tracer.sample_count(), 2);

        let acc = tracer.accumulator();
        for y in 0..5 {
            for x in 0..7 {
                assert_eq!(acc.average(x, y), Color::splat(0.5));
            }
        }
    }

    #[test]
    fn test_clear_zeroes_buffer_and_count() {
        let mut tracer = Tracer::new(config(8, 8), lit_scene()).expect("tracer");
        tracer.sample();
        assert!(tracer.accumulator().sums().iter().any(|c| c.max_element() > 0.0));

        tracer.clear();
        assert_eq!(tracer.sample_count(), 0);
        assert!(tracer.accumulator().sums().iter().all(|c| *c == Color::ZERO));
    }

    #[test]
    fn test_resize_discards_and_bounds_passes() {
        let mut tracer = Tracer::new(config(8, 8), lit_scene()).expect("tracer");
        tracer.sample();

        tracer.resize(5, 3);
        assert_eq!(tracer.sample_count(), 0);
        assert_eq!(tracer.accumulator().width(), 5);
        assert_eq!(tracer.accumulator().height(), 3);
        assert_eq!(tracer.accumulator().sums().len(), 15);
        assert!(tracer.accumulator().sums().iter().all(|c| *c == Color::ZERO));

        tracer.sample();
        assert_eq!(tracer.sample_count(), 1);
        assert_eq!(tracer.accumulator().sums().len(), 15);
    }

    #[test]
    fn test_empty_image_pass_still_counts() {
        let mut tracer = Tracer::new(config(0, 4), Scene::new()).expect("tracer");
        tracer.sample();
        assert_eq!(tracer.sample_count(), 1);
        assert!(tracer.accumulator().sums().is_empty());
    }

    #[test]
    fn test_pass_counts_every_camera_ray() {
        let mut tracer = Tracer::new(config(9, 7), lit_scene()).expect("tracer");
        assert_eq!(tracer.rays_last_pass(), 0);

        // A path ray and at most one shadow ray per bounce
        let most = 9 * 7 * 2 * u64::from(tracer.config().integrator.max_bounces);
        for _ in 0..2 {
            tracer.sample();
            let rays = tracer.rays_last_pass();
            assert!(rays >= 9 * 7, "only {rays} rays for 63 pixels");
            assert!(rays <= most, "{rays} rays is more than one pass can cast");
        }
    }

    #[test]
    fn test_empty_image_casts_no_rays() {
        let mut tracer = Tracer::new(config(0, 4), Scene::new()).expect("tracer");
        tracer.sample();
        assert_eq!(tracer.rays_last_pass(), 0);
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let mut a = Tracer::new(config(6, 6), lit_scene()).expect("tracer");
        let mut b = Tracer::new(config(6, 6), lit_scene()).expect("tracer");
        for _ in 0..3 {
            a.sample();
            b.sample();
        }
        assert_eq!(a.accumulator(), b.accumulator());
    }

    #[test]
    fn test_pixel_to_ray_uses_current_size() {
        let tracer = Tracer::new(config(10, 10), Scene::new()).expect("tracer");
        let mut prng = Prng::new(0);
        let tan = tracer.camera().tan_half_fov();
        let ray = tracer.pixel_to_ray(5, 5, tan, &mut prng);
        assert!(ray.direction().z > 0.99);
    }

    struct Exploding;

    impl Material for Exploding {
        fn sample(&self, _position: Vec3, _uvw: Vec3) -> MaterialProperties {
            panic!("material failure");
        }
    }

    #[test]
    #[should_panic]
    fn test_worker_panic_propagates() {
        let mut scene = Scene::new();
        scene.add(Surface::new(
            Quad::new(Vec3::new(-10.0, -10.0, 5.0), Vec3::new(20.0, 0.0, 0.0), Vec3::new(0.0, 20.0, 0.0)),
            Arc::new(Exploding),
        ));
        let mut tracer = Tracer::new(config(4, 4), scene).expect("tracer");
        tracer.sample();
    }
}
