//! Axis-aligned box primitive.

use crate::Hittable;
use lumen_math::{Aabb, Ray, Vec3};

/// A solid axis-aligned box. Rotated boxes come from an object transform.
#[derive(Debug, Clone, Copy)]
pub struct Cuboid {
    aabb: Aabb,
}

impl Cuboid {
    /// Create a box spanning two opposite corners (in any order).
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            aabb: Aabb::from_points(a, b),
        }
    }

    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }
}

impl Hittable for Cuboid {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        self.aabb.intersect(ray)
    }

    /// Normal of the face nearest to `point`.
    fn normal(&self, point: Vec3) -> Vec3 {
        let faces = [
            ((point.x - self.aabb.min.x).abs(), -Vec3::X),
            ((point.x - self.aabb.max.x).abs(), Vec3::X),
            ((point.y - self.aabb.min.y).abs(), -Vec3::Y),
            ((point.y - self.aabb.max.y).abs(), Vec3::Y),
            ((point.z - self.aabb.min.z).abs(), -Vec3::Z),
            ((point.z - self.aabb.max.z).abs(), Vec3::Z),
        ];

        faces
            .iter()
            .fold((f32::INFINITY, Vec3::ZERO), |best, &(distance, normal)| {
                if distance < best.0 {
                    (distance, normal)
                } else {
                    best
                }
            })
            .1
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.aabb)
    }

    fn kind_name(&self) -> &'static str {
        "Box"
    }
}
