//! Infinite plane primitive.

use crate::Hittable;
use lumen_math::{Aabb, Ray, Vec3};

/// The plane `dot(p, normal) = distance`.
///
/// Planes are unbounded, so they have no bounding box and are never placed in
/// the BVH.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    normal: Vec3,
    distance: f32,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }
}

impl Hittable for Plane {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let denominator = ray.direction().dot(self.normal);
        if denominator.abs() < f32::EPSILON {
            return None;
        }

        let t = (self.distance - ray.origin().dot(self.normal)) / denominator;
        (t >= 0.0).then_some(t)
    }

    fn normal(&self, _point: Vec3) -> Vec3 {
        self.normal.normalize_or_zero()
    }

    fn bounding_box(&self) -> Option<Aabb> {
        None
    }

    fn kind_name(&self) -> &'static str {
        "Plane"
    }
}
