//! Unidirectional path tracing with next-event estimation.
//!
//! Each bounce picks one of four lobes at random: Fresnel mirror reflection
//! (optional), rough metal reflection, diffuse scattering with direct light
//! sampling, or rough refraction. Paths are cut short by Russian roulette on
//! the throughput.

use crate::{initial_range, IntegratorConfig, Prng, RayCounter, Scene, SurfaceId};
use glint_math::{fresnel, reflect, refract, Color, Ray};

/// Roughness below which a metal bounce is treated as a perfect mirror and
/// no specular light sample is taken.
const SPECULAR_SAMPLING_MIN_ROUGHNESS: f32 = 0.001;

/// Path tracing estimator for the radiance arriving along a ray.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathIntegrator {
    config: IntegratorConfig,
}

impl PathIntegrator {
    pub fn new(config: IntegratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    /// One-sample estimate of the radiance arriving along `ray`.
    ///
    /// Emission of light surfaces is skipped right after a bounce that
    /// already sampled the lights directly, so it is not counted twice.
    /// Every ray cast, shadow rays included, is recorded in `rays`.
    pub fn trace(&self, scene: &Scene, ray: Ray, prng: &mut Prng, rays: &mut RayCounter) -> Color {
        let mut emission = Color::ZERO;
        let mut transmission = Color::ONE;
        let mut ray = ray;
        let mut include_lights = true;
        let mut last_medium: Option<SurfaceId> = None;
        let mut ior = 1.0;

        for _ in 0..self.config.max_bounces {
            let Some(hit) = scene.cast(&ray, initial_range(), rays) else {
                emission += scene.sky(ray.direction()) * transmission;
                break;
            };

            let position = ray.at(hit.distance);
            let mut normal = hit.normal;
            if normal.dot(ray.direction()) > 0.0 {
                normal = -normal;
            }
            let material = hit.material.sample(position, hit.uvw);
            if include_lights || !hit.is_light {
                emission += material.emission * transmission;
            }

            let ior_out = if last_medium == Some(hit.surface) {
                1.0
            } else {
                material.ior
            };

            let reflectivity = if self.config.fresnel_reflection {
                fresnel(ray.direction(), normal, ior, ior_out)
            } else {
                0.0
            };

            let direction = if reflectivity > prng.next_f32() {
                let mirrored = reflect(ray.direction(), normal);
                include_lights = true;
                prng.lobe(mirrored, material.roughness)
            } else if material.metallic > prng.next_f32() {
                let mirrored = reflect(ray.direction(), normal);
                transmission *= material.color;
                if self.config.specular_light_sampling
                    && material.roughness > SPECULAR_SAMPLING_MIN_ROUGHNESS
                    && scene.has_lights()
                {
                    emission += transmission
                        * scene.light_sample_specular(
                            hit.surface,
                            position,
                            mirrored,
                            material.roughness,
                            prng,
                            rays,
                        );
                    include_lights = false;
                } else {
                    include_lights = true;
                }
                prng.lobe(mirrored, material.roughness)
            } else if material.opacity > prng.next_f32() {
                transmission *= material.color;
                if scene.has_lights() {
                    emission += transmission
                        * scene.light_sample_diffuse(hit.surface, position, normal, prng, rays);
                    include_lights = false;
                } else {
                    include_lights = true;
                }
                prng.hemisphere_cosine(normal)
            } else {
                let bent = refract(ray.direction(), normal, ior, ior_out);
                ior = ior_out;
                last_medium = Some(hit.surface);
                transmission *= material.color;
                include_lights = true;
                prng.lobe(bent, material.roughness)
            };
            ray = Ray::new(position, direction);

            // Russian roulette
            let p = transmission.max_element();
            if p <= 0.0 || prng.next_f32() > p {
                break;
            }
            transmission /= p;
        }

        emission
    }
}
