//! Intersection records.
//!
//! Queries thread the current "best so far" through an [`Interval`]: a
//! primitive may only report a hit whose distance lies in
//! `[range.min, range.max]`, and the caller lowers `range.max` every time a
//! nearer hit is committed. That keeps the nearest-hit-wins contract without
//! a shared mutable record.

use crate::Material;
use glint_math::{Interval, Vec3};

/// Smallest distance a hit may be reported at. Prevents a surface from
/// shadowing itself when a ray starts on it.
pub const MIN_HIT_DISTANCE: f32 = 1e-4;

/// Sentinel upper bound of a fresh query.
pub const FAR_DISTANCE: f32 = f32::MAX;

/// The query window every fresh intersection starts with.
pub const fn initial_range() -> Interval {
    Interval::new(MIN_HIT_DISTANCE, FAR_DISTANCE)
}

/// Index of a surface in its [`Scene`](crate::Scene). Used as object identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub usize);

/// What a single shape reports for a successful intersection.
#[derive(Clone, Copy)]
pub struct Intersection<'a> {
    /// Distance along the ray direction
    pub distance: f32,
    /// Outward-facing surface normal (unit length)
    pub normal: Vec3,
    /// Surface parametric coordinate for material lookup
    pub uvw: Vec3,
    /// Material override for shapes that carry their own (mesh triangles)
    pub material: Option<&'a dyn Material>,
}

impl<'a> Intersection<'a> {
    pub fn new(distance: f32, normal: Vec3) -> Self {
        Self {
            distance,
            normal,
            uvw: Vec3::ZERO,
            material: None,
        }
    }

    pub fn with_uvw(mut self, uvw: Vec3) -> Self {
        self.uvw = uvw;
        self
    }

    pub fn with_material(mut self, material: &'a dyn Material) -> Self {
        self.material = Some(material);
        self
    }
}

/// Nearest intersection of a ray with a whole scene.
#[derive(Clone, Copy)]
pub struct Hit<'a> {
    pub distance: f32,
    pub normal: Vec3,
    pub uvw: Vec3,
    /// Material at the hit point
    pub material: &'a dyn Material,
    /// Surface that was hit
    pub surface: SurfaceId,
    /// Whether the hit surface is one of the scene's lights
    pub is_light: bool,
}

impl std::fmt::Debug for Hit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hit")
            .field("distance", &self.distance)
            .field("normal", &self.normal)
            .field("uvw", &self.uvw)
            .field("surface", &self.surface)
            .field("is_light", &self.is_light)
            .finish_non_exhaustive()
    }
}
