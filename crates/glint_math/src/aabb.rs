use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box described by its two extreme corners.
///
/// `Aabb::EMPTY` has inverted corners so that enclosing the first point
/// collapses it onto that point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// A box that contains nothing.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create an AABB from two corner points, in any order.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box enclosing every point of the iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut aabb = Self::EMPTY;
        for p in points {
            aabb.enclose(p);
        }
        aabb
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(a: &Aabb, b: &Aabb) -> Self {
        Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    /// Grow the box so it contains `p`.
    fn enclose(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// True when the two boxes touch or overlap (shared faces count).
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// True when `p` lies strictly inside the box.
    pub fn contains_strictly(&self, p: Vec3) -> bool {
        p.cmpgt(self.min).all() && p.cmplt(self.max).all()
    }

    /// Edge lengths along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Slab test: the parametric interval over which the ray is inside the box.
    ///
    /// Returns `None` when the ray misses or the box lies entirely behind the
    /// origin. The entry distance is negative when the origin is inside.
    /// Degenerate arithmetic (NaN from a zero direction component on a slab
    /// boundary) falls out as a miss.
    pub fn slab(&self, ray: &Ray) -> Option<Interval> {
        let inv = ray.direction.recip();
        let t0 = (self.min - ray.origin) * inv;
        let t1 = (self.max - ray.origin) * inv;

        let enter = t0.min(t1).max_element();
        let exit = t0.max(t1).min_element();

        if exit >= enter && exit >= 0.0 {
            Some(Interval::new(enter, exit))
        } else {
            None
        }
    }

    /// Distance at which the ray enters the box, zero when it starts inside.
    pub fn entry_distance(&self, ray: &Ray) -> Option<f32> {
        self.slab(ray).map(|span| span.min.max(0.0))
    }
}
