//! Axis-aligned box primitive.

use crate::{Intersection, Prng};
use glint_math::{box_normal, Aabb, Interval, Ray, Vec3};

/// An axis-aligned box given by its center and full edge lengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    center: Vec3,
    size: Vec3,
}

impl Cuboid {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self {
            center,
            size: size.abs(),
        }
    }

    pub fn bounds(&self) -> Aabb {
        let half = self.size * 0.5;
        Aabb::from_corners(self.center - half, self.center + half)
    }

    /// Slab intersection. A ray starting strictly inside reports the face it
    /// leaves through, so the box can be looked out of from within. A ray
    /// starting on a face and heading in does the same.
    pub fn intersect(&self, ray: &Ray, range: Interval) -> Option<Intersection<'static>> {
        let bounds = self.bounds();
        let span = bounds.slab(ray)?;

        let distance = if bounds.contains_strictly(ray.origin()) || span.min < range.min {
            span.max
        } else {
            span.min
        };
        if distance < 0.0 || !range.contains(distance) {
            return None;
        }

        let local = (ray.at(distance) - self.center) / self.size;
        Some(Intersection::new(distance, box_normal(local)).with_uvw(local + 0.5))
    }

    /// Uniform point on the surface: a face is picked in proportion to its
    /// area, then a point on it.
    pub fn random_point(&self, prng: &mut Prng) -> Vec3 {
        let s = self.size;
        let areas = [s.y * s.z, s.x * s.z, s.x * s.y];
        let total = areas[0] + areas[1] + areas[2];

        let mut pick = prng.uniform(0.0, total);
        let mut axis = 2;
        for (i, area) in areas.iter().enumerate() {
            if pick < *area {
                axis = i;
                break;
            }
            pick -= area;
        }

        let mut local = prng.unit_cube() * 0.5;
        let side = if prng.next_f32() < 0.5 { -0.5 } else { 0.5 };
        local[axis] = side;
        self.center + local * s
    }

    pub fn surface_area(&self) -> f32 {
        let s = self.size;
        2.0 * (s.x * s.y + s.x * s.z + s.y * s.z)
    }
}
