//! Parallelogram primitive.

use crate::{Intersection, Prng};
use glint_math::{Interval, Ray, Vec3};

/// Parallelogram spanned by two edges from a corner: `origin + s·u + t·v`
/// with `s` and `t` in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    origin: Vec3,
    u: Vec3,
    v: Vec3,
    normal: Vec3,
}

impl Quad {
    const PARALLEL_EPSILON: f32 = 1e-6;

    pub fn new(origin: Vec3, u: Vec3, v: Vec3) -> Self {
        Self {
            origin,
            u,
            v,
            normal: u.cross(v).normalize_or_zero(),
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Möller-Trumbore adapted to a parallelogram.
    pub fn intersect(&self, ray: &Ray, range: Interval) -> Option<Intersection<'static>> {
        let h = ray.direction().cross(self.v);
        let det = self.u.dot(h);

        // Ray is parallel to the quad
        if det.abs() < Self::PARALLEL_EPSILON {
            return None;
        }

        let f = 1.0 / det;
        let offset = ray.origin() - self.origin;
        let s = f * offset.dot(h);
        if !(0.0..=1.0).contains(&s) {
            return None;
        }

        let q = offset.cross(self.u);
        let t = f * ray.direction().dot(q);
        if !(0.0..=1.0).contains(&t) {
            return None;
        }

        let distance = f * self.v.dot(q);
        if distance < Self::PARALLEL_EPSILON || !range.contains(distance) {
            return None;
        }

        Some(Intersection::new(distance, self.normal).with_uvw(Vec3::new(s, t, 0.0)))
    }

    pub fn random_point(&self, prng: &mut Prng) -> Vec3 {
        let s = prng.next_f32();
        let t = prng.next_f32();
        self.origin + self.u * s + self.v * t
    }

    pub fn surface_area(&self) -> f32 {
        self.u.cross(self.v).length()
    }
}
