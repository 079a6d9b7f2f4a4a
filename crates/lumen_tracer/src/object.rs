//! Scene objects: a shape, its material and an optional model transform.

use std::fmt;

use crate::{Hittable, Material};
use lumen_math::{Aabb, Mat4, Mat4Ext, Ray, Vec3};

/// Model matrix with the inverses needed for intersection and shading.
#[derive(Debug, Clone, Copy)]
struct ModelTransform {
    model: Mat4,
    inverse: Mat4,
    /// Inverse-transpose of `model`, used for normals.
    normal_matrix: Mat4,
}

/// A primitive placed in the scene.
///
/// Identifiers are assigned by [`crate::Scene::add_object`] in insertion
/// order, starting at 1. The world-space bounding box is recomputed whenever
/// the transform changes.
pub struct Object {
    id: usize,
    shape: Box<dyn Hittable>,
    material: Material,
    transform: Option<ModelTransform>,
    world_bbox: Option<Aabb>,
}

impl Object {
    /// Create an untransformed object.
    pub fn new(shape: impl Hittable + 'static, material: Material) -> Self {
        Self::from_boxed(Box::new(shape), material)
    }

    pub fn from_boxed(shape: Box<dyn Hittable>, material: Material) -> Self {
        let world_bbox = shape.bounding_box();
        Self {
            id: 0,
            shape,
            material,
            transform: None,
            world_bbox,
        }
    }

    /// Builder method to set the model transform.
    pub fn with_transform(mut self, model: Mat4) -> Self {
        self.set_transform(model);
        self
    }

    /// Set the model transform, refreshing the cached world bounds.
    ///
    /// Returns `false` (and leaves the object unchanged) for a singular
    /// matrix, which has no inverse to carry rays into object space.
    pub fn set_transform(&mut self, model: Mat4) -> bool {
        if model.determinant().abs() < f32::EPSILON {
            return false;
        }

        let inverse = model.inverse();
        self.transform = Some(ModelTransform {
            model,
            inverse,
            normal_matrix: inverse.transpose(),
        });
        self.world_bbox = self
            .shape
            .bounding_box()
            .map(|bbox| model.transform_aabb(&bbox));
        true
    }

    /// Remove the model transform.
    pub fn clear_transform(&mut self) {
        self.transform = None;
        self.world_bbox = self.shape.bounding_box();
    }

    /// Stable 1-based identifier (0 until added to a scene).
    pub fn id(&self) -> usize {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: usize) {
        self.id = id;
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    pub fn shape(&self) -> &dyn Hittable {
        self.shape.as_ref()
    }

    pub fn kind_name(&self) -> &'static str {
        self.shape.kind_name()
    }

    /// Model matrix (identity when untransformed).
    pub fn model_matrix(&self) -> Mat4 {
        self.transform.map_or(Mat4::IDENTITY, |t| t.model)
    }

    pub fn is_transformed(&self) -> bool {
        self.transform.is_some()
    }

    /// World-space bounds, or `None` for unbounded shapes.
    pub fn bounding_box(&self) -> Option<Aabb> {
        self.world_bbox
    }

    /// Intersect a world-space ray.
    ///
    /// The ray is carried into object space without renormalizing, so the
    /// returned `t` is valid along the original world ray.
    pub fn intersect_transformed(&self, ray: &Ray) -> Option<f32> {
        match &self.transform {
            Some(transform) => self.shape.intersect(&ray.transformed(&transform.inverse)),
            None => self.shape.intersect(ray),
        }
    }

    /// World-space unit normal at a world-space surface point.
    pub fn normal_transformed(&self, point: Vec3) -> Vec3 {
        match &self.transform {
            Some(transform) => {
                let local = transform.inverse.transform_point3(point);
                transform
                    .normal_matrix
                    .transform_normal3(self.shape.normal(local))
            }
            None => self.shape.normal(point),
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("id", &self.id)
            .field("kind", &self.kind_name())
            .field("material", &self.material)
            .field("transformed", &self.is_transformed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cuboid, Plane, Sphere};

    #[test]
    fn test_untransformed_matches_shape() {
        let object = Object::new(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0), Material::default());
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        assert_eq!(object.intersect_transformed(&ray), Some(4.0));
        assert_eq!(object.normal_transformed(Vec3::new(0.0, 0.0, 4.0)), -Vec3::Z);
        assert!(!object.is_transformed());
    }

    #[test]
    fn test_translated_sphere() {
        let object = Object::new(Sphere::new(Vec3::ZERO, 1.0), Material::default())
            .with_transform(Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0)));
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        let t = object.intersect_transformed(&ray).unwrap();
        assert!((t - 4.0).abs() < 1e-5);

        let n = object.normal_transformed(ray.at(t));
        assert!((n - -Vec3::Z).length() < 1e-5);

        let bbox = object.bounding_box().unwrap();
        assert!((bbox.min - Vec3::new(-1.0, -1.0, 4.0)).length() < 1e-5);
        assert!((bbox.max - Vec3::new(1.0, 1.0, 6.0)).length() < 1e-5);
    }

    #[test]
    fn test_scaled_sphere_normal_uses_inverse_transpose() {
        // Ellipsoid stretched 2x along x
        let object = Object::new(Sphere::new(Vec3::ZERO, 1.0), Material::default())
            .with_transform(Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0)));

        // Hit along the x axis lands at x = -2
        let ray = Ray::new(Vec3::new(-10.0, 0.0, 0.0), Vec3::X);
        let t = object.intersect_transformed(&ray).unwrap();
        assert!((t - 8.0).abs() < 1e-4);

        // A diagonal point on the ellipsoid: object-space (1,1,0)/sqrt2
        let s = std::f32::consts::FRAC_1_SQRT_2;
        let world = Vec3::new(2.0 * s, s, 0.0);
        let n = object.normal_transformed(world);

        // Gradient of x^2/4 + y^2 is (x/2, 2y) -> (s, 2s) normalized
        let expected = Vec3::new(1.0, 2.0, 0.0).normalize();
        assert!((n - expected).length() < 1e-4);
        assert!((n.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotated_box_bounds() {
        let object = Object::new(Cuboid::new(Vec3::splat(-1.0), Vec3::splat(1.0)), Material::default())
            .with_transform(Mat4::from_rotation_y(std::f32::consts::FRAC_PI_4));

        let bbox = object.bounding_box().unwrap();
        let half_diagonal = std::f32::consts::SQRT_2;
        assert!((bbox.max.x - half_diagonal).abs() < 1e-4);
        assert!((bbox.max.y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_singular_transform_is_rejected() {
        let mut object = Object::new(Sphere::new(Vec3::ZERO, 1.0), Material::default());
        assert!(!object.set_transform(Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0))));
        assert!(!object.is_transformed());
    }

    #[test]
    fn test_plane_stays_unbounded() {
        let object = Object::new(Plane::new(Vec3::Y, 0.0), Material::default())
            .with_transform(Mat4::from_translation(Vec3::Y));
        assert!(object.bounding_box().is_none());

        // Plane y = 0 moved up to y = 1
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), -Vec3::Y);
        let t = object.intersect_transformed(&ray).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
    }
}
