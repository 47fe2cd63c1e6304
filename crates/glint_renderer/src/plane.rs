//! Infinite plane primitive.

use crate::Intersection;
use glint_math::{Interval, Ray, Vec3};

/// An infinite plane through `origin` with a fixed normal.
///
/// The normal is reported as-is for hits from either side; the integrator
/// flips it to face the incoming ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    origin: Vec3,
    normal: Vec3,
}

impl Plane {
    pub fn new(origin: Vec3, normal: Vec3) -> Self {
        Self {
            origin,
            normal: normal.normalize(),
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn intersect(&self, ray: &Ray, range: Interval) -> Option<Intersection<'static>> {
        let ddn = ray.direction().dot(self.normal);
        let distance = (self.origin - ray.origin()).dot(self.normal) / ddn;

        // Parallel rays produce an infinite or NaN distance
        if !(distance >= 0.0) || !range.contains(distance) {
            return None;
        }
        Some(Intersection::new(distance, self.normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initial_range;

    fn floor() -> Plane {
        Plane::new(Vec3::ZERO, Vec3::Y)
    }

    #[test]
    fn test_plane_hit_from_either_side() {
        let down = Ray::new(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y);
        let hit = floor().intersect(&down, initial_range()).expect("above");
        assert!((hit.distance - 2.0).abs() < 1e-6);
        assert_eq!(hit.normal, Vec3::Y);

        let up = Ray::new(Vec3::new(0.0, -3.0, 0.0), Vec3::Y);
        let hit = floor().intersect(&up, initial_range()).expect("below");
        assert!((hit.distance - 3.0).abs() < 1e-6);
        // Not flipped towards the ray
        assert_eq!(hit.normal, Vec3::Y);
    }

    #[test]
    fn test_plane_parallel_and_away() {
        let parallel = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert!(floor().intersect(&parallel, initial_range()).is_none());

        let away = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        assert!(floor().intersect(&away, initial_range()).is_none());
    }

    #[test]
    fn test_plane_no_self_hit() {
        let ray = Ray::new(Vec3::new(3.0, 0.0, -1.0), Vec3::new(0.3, 1.0, 0.0).normalize());
        assert!(floor().intersect(&ray, initial_range()).is_none());
    }
}
