//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::Hittable;
use lumen_math::{Aabb, Ray, Vec3};

/// Determinants smaller than this are treated as parallel rays.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Barycentric slack at the 0/1 boundaries so shared edges do not leak.
const BARYCENTRIC_EPSILON: f32 = 1e-5;

/// Minimum bounding box padding so flat triangles keep a volume.
const BOUNDS_PADDING: f32 = 1e-4;

/// A triangle primitive.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Edges from v0
    edge1: Vec3,
    edge2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let normal = edge1.cross(edge2).normalize_or_zero();

        Self {
            v0,
            v1,
            v2,
            edge1,
            edge2,
            normal,
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }
}

impl Hittable for Triangle {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let h = ray.direction().cross(self.edge2);
        let det = self.edge1.dot(h);

        // Ray is parallel to the triangle plane (or the triangle is degenerate)
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin() - self.v0;
        let u = inv_det * s.dot(h);
        if !(-BARYCENTRIC_EPSILON..=1.0 + BARYCENTRIC_EPSILON).contains(&u) {
            return None;
        }

        let q = s.cross(self.edge1);
        let v = inv_det * ray.direction().dot(q);
        if v < -BARYCENTRIC_EPSILON || u + v > 1.0 + BARYCENTRIC_EPSILON {
            return None;
        }

        let t = inv_det * self.edge2.dot(q);
        (t >= 0.0).then_some(t)
    }

    fn normal(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    fn bounding_box(&self) -> Option<Aabb> {
        let mut bbox = Aabb::from_point(self.v0);
        bbox.add_point(self.v1);
        bbox.add_point(self.v2);

        // The barycentric slack reaches this far past the edges in world units
        let slack = BARYCENTRIC_EPSILON * (self.edge1.length() + self.edge2.length());
        Some(bbox.padded(BOUNDS_PADDING + slack))
    }

    fn kind_name(&self) -> &'static str {
        "Triangle"
    }
}
