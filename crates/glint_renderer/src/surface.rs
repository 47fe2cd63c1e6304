//! Scene surfaces: a shape paired with its material.

use crate::{Cuboid, Intersection, Material, Mesh, Plane, Prng, Quad, Sphere};
use glint_math::{Interval, Ray, Vec3};
use std::sync::Arc;

/// Every kind of geometry a scene can hold.
#[derive(Debug, Clone)]
pub enum Shape {
    Plane(Plane),
    Sphere(Sphere),
    Cuboid(Cuboid),
    Quad(Quad),
    Mesh(Mesh),
}

impl Shape {
    /// Intersection within `range`; see [`crate::hit`] for the contract.
    pub fn intersect(&self, ray: &Ray, range: Interval) -> Option<Intersection<'_>> {
        match self {
            Shape::Plane(plane) => plane.intersect(ray, range),
            Shape::Sphere(sphere) => sphere.intersect(ray, range),
            Shape::Cuboid(cuboid) => cuboid.intersect(ray, range),
            Shape::Quad(quad) => quad.intersect(ray, range),
            Shape::Mesh(mesh) => mesh.intersect(ray, range),
        }
    }

    /// Whether points can be drawn from this shape for light sampling.
    pub fn is_sampleable(&self) -> bool {
        matches!(self, Shape::Sphere(_) | Shape::Cuboid(_) | Shape::Quad(_))
    }

    /// Uniform point on the surface, `None` for unbounded or mesh shapes.
    pub fn random_point(&self, prng: &mut Prng) -> Option<Vec3> {
        match self {
            Shape::Sphere(sphere) => Some(sphere.random_point(prng)),
            Shape::Cuboid(cuboid) => Some(cuboid.random_point(prng)),
            Shape::Quad(quad) => Some(quad.random_point(prng)),
            Shape::Plane(_) | Shape::Mesh(_) => None,
        }
    }

    /// Surface area, `None` where [`Shape::random_point`] is unsupported.
    pub fn surface_area(&self) -> Option<f32> {
        match self {
            Shape::Sphere(sphere) => Some(sphere.surface_area()),
            Shape::Cuboid(cuboid) => Some(cuboid.surface_area()),
            Shape::Quad(quad) => Some(quad.surface_area()),
            Shape::Plane(_) | Shape::Mesh(_) => None,
        }
    }
}

impl From<Plane> for Shape {
    fn from(plane: Plane) -> Self {
        Shape::Plane(plane)
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<Cuboid> for Shape {
    fn from(cuboid: Cuboid) -> Self {
        Shape::Cuboid(cuboid)
    }
}

impl From<Quad> for Shape {
    fn from(quad: Quad) -> Self {
        Shape::Quad(quad)
    }
}

impl From<Mesh> for Shape {
    fn from(mesh: Mesh) -> Self {
        Shape::Mesh(mesh)
    }
}

/// A shape with the material it is rendered with.
///
/// Mesh triangles carry their own materials, which take precedence.
#[derive(Clone)]
pub struct Surface {
    pub shape: Shape,
    pub material: Arc<dyn Material>,
    pub(crate) is_light: bool,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("shape", &self.shape)
            .field("is_light", &self.is_light)
            .finish_non_exhaustive()
    }
}

impl Surface {
    pub fn new(shape: impl Into<Shape>, material: Arc<dyn Material>) -> Self {
        Self {
            shape: shape.into(),
            material,
            is_light: false,
        }
    }

    /// Whether this surface was registered as a light of its scene.
    pub fn is_light(&self) -> bool {
        self.is_light
    }

    pub fn intersect(&self, ray: &Ray, range: Interval) -> Option<Intersection<'_>> {
        self.shape.intersect(ray, range)
    }

    /// Does the ray hit this surface anywhere ahead of its origin?
    pub fn hits(&self, ray: &Ray) -> bool {
        self.shape.intersect(ray, crate::initial_range()).is_some()
    }

    pub fn random_point(&self, prng: &mut Prng) -> Option<Vec3> {
        self.shape.random_point(prng)
    }

    pub fn surface_area(&self) -> Option<f32> {
        self.shape.surface_area()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{initial_range, ConstantMaterial};
    use glint_math::Color;

    #[test]
    fn test_sampleable_shapes() {
        let grey = ConstantMaterial::diffuse(Color::splat(0.5));
        let sphere = Surface::new(Sphere::new(Vec3::ZERO, 1.0), grey.clone());
        let plane = Surface::new(Plane::new(Vec3::ZERO, Vec3::Y), grey.clone());
        let mesh = Surface::new(Mesh::new(Vec::new()), grey);

        assert!(sphere.shape.is_sampleable());
        assert!(!plane.shape.is_sampleable());
        assert!(!mesh.shape.is_sampleable());

        let mut prng = Prng::new(1);
        assert!(sphere.random_point(&mut prng).is_some());
        assert!(plane.random_point(&mut prng).is_none());
        assert_eq!(plane.surface_area(), None);
    }

    #[test]
    fn test_hits_ignores_committed_distance() {
        let surface = Surface::new(
            Sphere::new(Vec3::new(0.0, 0.0, 10.0), 1.0),
            ConstantMaterial::diffuse(Color::ONE),
        );
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        assert!(surface.intersect(&ray, initial_range().with_max(5.0)).is_none());
        assert!(surface.hits(&ray));
        assert!(!surface.hits(&Ray::new(Vec3::ZERO, -Vec3::Z)));
    }
}
