//! Sphere primitive.

use crate::{Intersection, Prng};
use glint_math::{Interval, Ray, Vec3};
use std::f32::consts::PI;

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Both ray parameters at which the ray crosses the sphere, `near <= far`.
    ///
    /// Either root may be negative (behind the origin).
    pub fn roots(&self, ray: &Ray) -> Option<(f32, f32)> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 || a == 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        Some(((h - sqrtd) / a, (h + sqrtd) / a))
    }

    pub fn intersect(&self, ray: &Ray, range: Interval) -> Option<Intersection<'static>> {
        let (near, far) = self.roots(ray)?;

        // Prefer the near root unless it is behind the origin
        let distance = if near < 0.0 { far } else { near };
        if distance < 0.0 || !range.contains(distance) {
            return None;
        }

        let normal = (ray.at(distance) - self.center) / self.radius;
        Some(Intersection::new(distance, normal).with_uvw(Self::sphere_uv(normal)))
    }

    /// Spherical coordinates of a point on the unit sphere, both in [0, 1].
    fn sphere_uv(p: Vec3) -> Vec3 {
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;
        Vec3::new(phi / (2.0 * PI), theta / PI, 0.0)
    }

    pub fn random_point(&self, prng: &mut Prng) -> Vec3 {
        self.center + prng.unit_sphere() * self.radius
    }

    pub fn surface_area(&self) -> f32 {
        4.0 * PI * self.radius * self.radius
    }
}
