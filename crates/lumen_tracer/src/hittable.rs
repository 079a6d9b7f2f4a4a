//! Hittable trait: the capability set every primitive shape provides.

use lumen_math::{Aabb, Ray, Vec3};

/// Trait for shapes that can be intersected by rays.
///
/// All queries are in the shape's own (object) space; model transforms are
/// applied by [`crate::Object`].
pub trait Hittable: Send + Sync {
    /// Smallest non-negative distance along `ray` at which it meets the
    /// surface, or `None` when there is no forward intersection.
    ///
    /// `t` is measured in units of `ray.direction`, which need not be
    /// normalized.
    fn intersect(&self, ray: &Ray) -> Option<f32>;

    /// Outward unit normal at a point known to lie on the surface.
    fn normal(&self, point: Vec3) -> Vec3;

    /// Object-space bounds, or `None` for unbounded shapes (planes).
    fn bounding_box(&self) -> Option<Aabb>;

    /// Human-readable kind name used in diagnostics.
    fn kind_name(&self) -> &'static str;
}
