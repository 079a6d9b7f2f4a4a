//! Sphere primitive for ray tracing.

use crate::Hittable;
use lumen_math::{Aabb, Ray, Vec3};

/// A sphere primitive.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Hittable for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let offset = ray.origin() - self.center;
        let direction = ray.direction();

        let a = direction.dot(direction);
        let b = 2.0 * direction.dot(offset);
        let c = offset.dot(offset) - self.radius * self.radius;

        if a == 0.0 {
            return None;
        }

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        // Stable form: q shares the sign of b so the sum never cancels.
        let q = -0.5 * (b + b.signum() * discriminant.sqrt());
        let (t0, t1) = if q == 0.0 {
            (0.0, 0.0)
        } else {
            let r0 = q / a;
            let r1 = c / q;
            (r0.min(r1), r0.max(r1))
        };

        if t0 >= 0.0 {
            Some(t0)
        } else if t1 >= 0.0 {
            Some(t1)
        } else {
            None
        }
    }

    fn normal(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize_or_zero()
    }

    fn bounding_box(&self) -> Option<Aabb> {
        let rvec = Vec3::splat(self.radius);
        Some(Aabb::new(self.center - rvec, self.center + rvec))
    }

    fn kind_name(&self) -> &'static str {
        "Sphere"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let t = sphere.intersect(&ray).unwrap();
        assert!((t - 0.5).abs() < 0.001); // Should hit at t=0.5
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5);

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.intersect(&ray).is_none());

        // Sphere entirely behind the origin
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(sphere.intersect(&ray).is_none());
    }

    #[test]
    fn test_sphere_from_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let t = sphere.intersect(&ray).unwrap();
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_unnormalized_direction() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 10.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0));

        let t = sphere.intersect(&ray).unwrap();
        assert!((t - 4.5).abs() < 1e-5);
    }

    #[test]
    fn test_hit_point_lies_on_surface() {
        let center = Vec3::new(0.5, -1.0, 6.0);
        let radius = 1.5;
        let sphere = Sphere::new(center, radius);
        let mut rng = StdRng::seed_from_u64(7);

        let mut hits = 0;
        for _ in 0..500 {
            let origin = Vec3::new(
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-3.0..0.0),
            );
            let target = center
                + Vec3::new(
                    rng.gen_range(-2.0..2.0),
                    rng.gen_range(-2.0..2.0),
                    rng.gen_range(-2.0..2.0),
                );
            let ray = Ray::new(origin, (target - origin).normalize());

            if let Some(t) = sphere.intersect(&ray) {
                hits += 1;
                let p = ray.at(t);
                assert!(((p - center).length() - radius).abs() < 1e-3);

                let n = sphere.normal(p);
                assert!((n - (p - center).normalize()).length() < 1e-5);
            }
        }
        assert!(hits > 0);
    }

    #[test]
    fn test_bounding_box() {
        let sphere = Sphere::new(Vec3::new(1.0, 2.0, 3.0), 0.5);
        let bbox = sphere.bounding_box().unwrap();
        assert_eq!(bbox.min, Vec3::new(0.5, 1.5, 2.5));
        assert_eq!(bbox.max, Vec3::new(1.5, 2.5, 3.5));
    }
}
