// Transform utilities for Mat4
//
// Extends glam::Mat4 with the operations the tracer needs for model
// transforms. glam::Mat4 already provides transform_point3() and inverse().

use glam::{Mat4, Vec3, Vec4};
use crate::Aabb;

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform a vector in 3D space (applies rotation and scale, but NOT translation).
    /// Vectors have an implicit w=0 component.
    fn transform_vector3(&self, vector: Vec3) -> Vec3;

    /// Transform a surface normal by this matrix, which is expected to be the
    /// inverse-transpose of the model matrix. The result is renormalized.
    fn transform_normal3(&self, normal: Vec3) -> Vec3;

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_vector3(&self, vector: Vec3) -> Vec3 {
        // Transform as direction (w=0) - translation should not affect vectors
        let v4 = Vec4::new(vector.x, vector.y, vector.z, 0.0);
        let transformed = *self * v4;
        Vec3::new(transformed.x, transformed.y, transformed.z)
    }

    fn transform_normal3(&self, normal: Vec3) -> Vec3 {
        self.transform_vector3(normal).normalize_or_zero()
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return *aabb;
        }

        let mut result = Aabb::EMPTY;
        for corner in aabb.corners() {
            result.add_point(self.transform_point3(corner));
        }
        result
    }
}
