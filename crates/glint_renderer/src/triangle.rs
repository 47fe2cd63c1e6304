//! Triangle primitive for meshes.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{Intersection, Material};
use glint_math::{Aabb, Color, Interval, Ray, Vec3};
use std::sync::Arc;

/// A mesh vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Color,
    /// Surface coordinate interpolated across the triangle
    pub uv: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_uv(mut self, uv: Vec3) -> Self {
        self.uv = uv;
        self
    }
}

/// A triangle owning its three vertices and a material.
#[derive(Clone)]
pub struct Triangle {
    pub a: Vertex,
    pub b: Vertex,
    pub c: Vertex,
    pub material: Arc<dyn Material>,
}

impl std::fmt::Debug for Triangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Triangle")
            .field("a", &self.a)
            .field("b", &self.b)
            .field("c", &self.c)
            .finish_non_exhaustive()
    }
}

impl Triangle {
    const PARALLEL_EPSILON: f32 = 1e-6;

    pub fn new(a: Vertex, b: Vertex, c: Vertex, material: Arc<dyn Material>) -> Self {
        Self { a, b, c, material }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points([self.a.position, self.b.position, self.c.position])
    }

    /// Barycentric blend of the vertex surface coordinates.
    pub fn interpolate_uv(&self, u: f32, v: f32) -> Vec3 {
        self.a.uv * (1.0 - u - v) + self.b.uv * u + self.c.uv * v
    }

    /// Möller-Trumbore ray-triangle intersection algorithm.
    ///
    /// The reported material is the triangle's own.
    pub fn intersect(&self, ray: &Ray, range: Interval) -> Option<Intersection<'_>> {
        let edge1 = self.b.position - self.a.position;
        let edge2 = self.c.position - self.a.position;

        let h = ray.direction().cross(edge2);
        let det = edge1.dot(h);

        // Ray is parallel to triangle
        if det.abs() < Self::PARALLEL_EPSILON {
            return None;
        }

        let f = 1.0 / det;
        let s = ray.origin() - self.a.position;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let distance = f * edge2.dot(q);
        if !range.contains(distance) {
            return None;
        }

        Some(
            Intersection::new(distance, edge1.cross(edge2).normalize())
                .with_uvw(self.interpolate_uv(u, v))
                .with_material(self.material.as_ref()),
        )
    }
}
