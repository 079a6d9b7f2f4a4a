use crate::{Ray, Vec3};

/// Axis-Aligned Bounding Box for primitives and the bounding volume tree.
///
/// Stored as two corners. The empty box (`min = +inf`, `max = -inf`) is the
/// identity for [`Aabb::surrounding`] and [`Aabb::add_point`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An empty box (contains nothing).
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Create a box from explicit corners. No reordering is done.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a degenerate box holding a single point.
    pub fn from_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    /// Create an AABB from two corner points in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            min: box0.min.min(box1.min),
            max: box0.max.max(box1.max),
        }
    }

    /// Grow the box to include a point.
    pub fn add_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Grow the box to include another box.
    pub fn add_box(&mut self, other: &Aabb) {
        *self = Aabb::surrounding(self, other);
    }

    /// True if the box contains no point at all.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Returns the center point of the bounding box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Expand every face outward by `delta`.
    ///
    /// Used for flat primitives so the slab test never sees a zero-width box.
    pub fn padded(&self, delta: f32) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        Aabb {
            min: self.min - Vec3::splat(delta),
            max: self.max + Vec3::splat(delta),
        }
    }

    /// Translate (move) the AABB by an offset vector.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Slab-method ray intersection.
    ///
    /// Returns the first non-negative boundary of the entry/exit interval: the
    /// entry distance when the origin is outside the box, the exit distance
    /// when it is inside. Returns `None` when the ray misses the box or the
    /// box lies entirely behind the origin.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        if self.is_empty() {
            return None;
        }

        let mut largest_min = f32::NEG_INFINITY;
        let mut smallest_max = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];

            if direction == 0.0 {
                // Parallel to this slab: either always inside it or never.
                if origin < self.min[axis] || origin > self.max[axis] {
                    return None;
                }
                continue;
            }

            let mut t0 = (self.min[axis] - origin) / direction;
            let mut t1 = (self.max[axis] - origin) / direction;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            largest_min = largest_min.max(t0);
            smallest_max = smallest_max.min(t1);
        }

        if largest_min > smallest_max || smallest_max < 0.0 {
            return None;
        }

        if largest_min > 0.0 {
            Some(largest_min)
        } else {
            Some(smallest_max)
        }
    }

    /// Cheap boolean form of [`Aabb::intersect`].
    #[inline]
    pub fn hit(&self, ray: &Ray) -> bool {
        self.intersect(ray).is_some()
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Aabb::EMPTY
    }
}
