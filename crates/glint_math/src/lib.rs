//! Vector and geometry math shared by the Glint renderer.
//!
//! Vectors come straight from glam; this crate adds the ray, interval and
//! bounding-box types plus the reflection/refraction formulas the integrator
//! needs.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod optics;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use optics::{box_normal, fresnel, reflect, refract};
pub use ray::Ray;

/// RGB radiance triple. Channels are linear and unbounded.
pub type Color = Vec3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_color_is_componentwise() {
        let a = Color::new(0.5, 1.0, 2.0);
        let b = Color::new(2.0, 0.5, 0.25);
        assert_eq!(a * b, Color::new(1.0, 0.5, 0.5));
    }
}
