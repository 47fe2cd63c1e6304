//! Scene description: surfaces, lights and the sky.

use crate::{initial_range, EnvironmentMap, Hit, Prng, Shape, Surface, SurfaceId};
use glint_math::{Color, Interval, Ray, Vec3};
use std::f32::consts::PI;
use std::ops::AddAssign;
use thiserror::Error;

/// Errors raised while assembling a scene.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    #[error("{0} surfaces cannot be sampled and so cannot be lights")]
    UnsampleableLight(&'static str),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Radiance arriving from directions that escape the scene.
#[derive(Debug, Clone, Default)]
pub enum Sky {
    /// Bluish vertical gradient plus a glow around the sun.
    #[default]
    Gradient,
    /// The same color in every direction.
    Uniform(Color),
    /// Equirectangular image lookup.
    Environment(EnvironmentMap),
}

/// Number of rays cast against a scene.
///
/// Each worker owns one and passes it down by `&mut`; the tracer sums them
/// once a pass is over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RayCounter(u64);

impl RayCounter {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn count(&self) -> u64 {
        self.0
    }

    pub fn record(&mut self) {
        self.0 += 1;
    }
}

impl AddAssign for RayCounter {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Exponent shaping the glow around the sun in [`Sky::Gradient`].
const SUN_GLOW_EXPONENT: i32 = 16;

/// Exponent range of the specular light lobe; smoother surfaces get
/// narrower lobes.
const SPECULAR_LOBE_SHARPNESS: f32 = 1000.0;

/// Everything a ray can hit, plus the lights among it.
#[derive(Debug, Clone)]
pub struct Scene {
    surfaces: Vec<Surface>,
    lights: Vec<SurfaceId>,
    pub sky: Sky,
    /// Direction the sunlight travels in (unit length)
    pub sun_direction: Vec3,
    pub sun_color: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// An empty scene under the gradient sky with the sun straight overhead.
    pub fn new() -> Self {
        Self {
            surfaces: Vec::new(),
            lights: Vec::new(),
            sky: Sky::Gradient,
            sun_direction: -Vec3::Y,
            sun_color: Color::new(1.0, 1.0, 0.8),
        }
    }

    /// Point the sun glow away from `position`, e.g. the center of a
    /// spherical sun light.
    pub fn set_sun(&mut self, position: Vec3, color: Color) {
        self.sun_direction = (-position).try_normalize().unwrap_or(-Vec3::Y);
        self.sun_color = color;
    }

    /// Add a surface that does not take part in light sampling.
    pub fn add(&mut self, surface: Surface) -> SurfaceId {
        let id = SurfaceId(self.surfaces.len());
        self.surfaces.push(surface);
        id
    }

    /// Add a surface and register it as a light.
    pub fn add_light(&mut self, mut surface: Surface) -> SceneResult<SurfaceId> {
        match surface.shape {
            Shape::Plane(_) => return Err(SceneError::UnsampleableLight("plane")),
            Shape::Mesh(_) => return Err(SceneError::UnsampleableLight("mesh")),
            Shape::Sphere(_) | Shape::Cuboid(_) | Shape::Quad(_) => {}
        }
        surface.is_light = true;
        let id = self.add(surface);
        self.lights.push(id);
        Ok(id)
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id.0)
    }

    pub fn lights(&self) -> &[SurfaceId] {
        &self.lights
    }

    pub fn has_lights(&self) -> bool {
        !self.lights.is_empty()
    }

    /// Nearest hit within `range` over every surface, in insertion order.
    pub fn intersect(&self, ray: &Ray, range: Interval) -> Option<Hit<'_>> {
        let mut range = range;
        let mut nearest = None;

        for (index, surface) in self.surfaces.iter().enumerate() {
            if let Some(found) = surface.intersect(ray, range) {
                range = range.with_max(found.distance);
                nearest = Some(Hit {
                    distance: found.distance,
                    normal: found.normal,
                    uvw: found.uvw,
                    material: found.material.unwrap_or(surface.material.as_ref()),
                    surface: SurfaceId(index),
                    is_light: surface.is_light,
                });
            }
        }
        nearest
    }

    /// Nearest hit anywhere ahead of the ray origin.
    pub fn nearest(&self, ray: &Ray) -> Option<Hit<'_>> {
        self.intersect(ray, initial_range())
    }

    /// [`Scene::intersect`], recording the ray in `rays`.
    pub fn cast(&self, ray: &Ray, range: Interval, rays: &mut RayCounter) -> Option<Hit<'_>> {
        rays.record();
        self.intersect(ray, range)
    }

    /// Direct lighting estimate for a diffuse surface at `position`.
    ///
    /// One light is picked uniformly and a point on it sampled; the result is
    /// scaled by the light count to stay unbiased over the choice. `exclude`
    /// is the surface being shaded, which never lights itself.
    pub fn light_sample_diffuse(
        &self,
        exclude: SurfaceId,
        position: Vec3,
        normal: Vec3,
        prng: &mut Prng,
        rays: &mut RayCounter,
    ) -> Color {
        let Some((light, id, point)) = self.pick_light(exclude, prng) else {
            return Color::ZERO;
        };

        let to_light = point - position;
        let distance = to_light.length();
        if distance <= 0.0 {
            return Color::ZERO;
        }
        let direction = to_light / distance;
        let cos_theta = direction.dot(normal);
        if cos_theta < 0.0 {
            return Color::ZERO;
        }

        let shadow = Ray::new(position, direction);
        match self.cast(&shadow, initial_range(), rays) {
            Some(hit) if hit.surface != id => return Color::ZERO,
            _ => {}
        }

        let Some(area) = light.surface_area() else {
            return Color::ZERO;
        };
        let emission = light.material.sample(point, Vec3::ZERO).emission;
        emission * cos_theta / (1.0 + distance * distance) * area / PI * self.lights.len() as f32
    }

    /// Direct lighting estimate for a glossy reflection around `reflected`.
    ///
    /// Only occluders nearer than the sampled light point block it.
    pub fn light_sample_specular(
        &self,
        exclude: SurfaceId,
        position: Vec3,
        reflected: Vec3,
        roughness: f32,
        prng: &mut Prng,
        rays: &mut RayCounter,
    ) -> Color {
        let Some((light, id, point)) = self.pick_light(exclude, prng) else {
            return Color::ZERO;
        };

        let to_light = point - position;
        let distance = to_light.length();
        if distance <= 0.0 {
            return Color::ZERO;
        }
        let direction = to_light / distance;
        let cos_theta = direction.dot(reflected);
        if cos_theta < 0.0 {
            return Color::ZERO;
        }

        let shadow = Ray::new(position, direction);
        match self.cast(&shadow, initial_range().with_max(distance), rays) {
            Some(hit) if hit.surface != id => return Color::ZERO,
            _ => {}
        }

        let emission = light.material.sample(point, Vec3::ZERO).emission;
        let lobe = cos_theta.powf(1.0 + (1.0 - roughness) * SPECULAR_LOBE_SHARPNESS)
            / (1.0 + roughness * 10.0);
        emission * lobe * self.lights.len() as f32
    }

    /// Uniformly chosen light and a point on it, `None` when there are no
    /// lights or the choice lands on `exclude`.
    fn pick_light(&self, exclude: SurfaceId, prng: &mut Prng) -> Option<(&Surface, SurfaceId, Vec3)> {
        if self.lights.is_empty() {
            return None;
        }
        let id = self.lights[prng.index(self.lights.len())];
        if id == exclude {
            return None;
        }
        let light = self.surface(id)?;
        let point = light.random_point(prng)?;
        Some((light, id, point))
    }

    /// Radiance seen along an escaping ray.
    pub fn sky(&self, direction: Vec3) -> Color {
        match &self.sky {
            Sky::Gradient => {
                let glow = direction.dot(-self.sun_direction).max(0.0).powi(SUN_GLOW_EXPONENT);
                Color::ONE + Color::new(-0.25, -0.25, 0.5) * direction.y + self.sun_color * glow
            }
            Sky::Uniform(color) => *color,
            Sky::Environment(map) => map.sample(direction),
        }
    }
}
