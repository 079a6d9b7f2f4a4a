//! Render-ready scene: objects, lights, camera and the optional BVH.

use std::fmt;

use crate::{BvhNode, Camera, Cuboid, Hittable, Iteration, Material, Object, Plane, ShadowRay, Sphere, Triangle};
use lumen_core::{Geometry, ObjectDescription, SceneDescription};
use lumen_math::{Color, Ray, Vec3};

/// Offset applied along the surface normal to secondary and shadow ray
/// origins so they do not re-hit the surface they leave.
pub const SURFACE_EPSILON: f32 = 1e-3;

/// A point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Color,
}

impl Light {
    pub fn new(position: Vec3, color: Color) -> Self {
        Self { position, color }
    }
}

/// Non-fatal problems found while building a scene from its description.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneWarning {
    /// The primitive kind has no renderer implementation; it was dropped.
    UnsupportedPrimitive { index: usize, kind: &'static str },
    /// The transform list collapses space; the object was kept untransformed.
    SingularTransform { index: usize, kind: &'static str },
}

impl fmt::Display for SceneWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneWarning::UnsupportedPrimitive { index, kind } => {
                write!(f, "{} objects not supported (object {} skipped)", kind, index)
            }
            SceneWarning::SingularTransform { index, kind } => {
                write!(f, "{} object {} has a singular transform (ignored)", kind, index)
            }
        }
    }
}

/// Result of a nearest-hit query.
#[derive(Debug, Clone, Copy)]
pub struct RayHitResults<'a> {
    /// Distance along the query ray (meaningless without an object)
    pub t: f32,
    /// World-space hit point
    pub point: Vec3,
    /// World-space unit normal at the hit point
    pub normal: Vec3,
    /// The object hit, or `None` for a miss
    pub object: Option<&'a Object>,
}

impl RayHitResults<'_> {
    pub fn miss() -> Self {
        Self {
            t: 0.0,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            object: None,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.object.is_some()
    }
}

/// The scene the tracer renders.
///
/// Objects get stable 1-based ids in insertion order. Any mutation of the
/// object list drops the BVH; call [`Scene::build_bvh`] again afterwards.
pub struct Scene {
    camera: Camera,
    objects: Vec<Object>,
    lights: Vec<Light>,
    bvh: Option<BvhNode>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            objects: Vec::new(),
            lights: Vec::new(),
            bvh: None,
        }
    }

    /// Build a scene from a parsed description.
    ///
    /// Unsupported primitives are dropped and reported as warnings; they never
    /// fail construction. The BVH is not built.
    pub fn from_description(description: &SceneDescription) -> (Self, Vec<SceneWarning>) {
        let mut scene = Self::new(Camera::from_description(&description.camera));
        let mut warnings = Vec::new();

        for (index, object) in description.objects.iter().enumerate() {
            if let Some(object) = build_object(index, object, &mut warnings) {
                scene.add_object(object);
            }
        }

        for light in &description.lights {
            scene.add_light(Light::new(light.position, light.color));
        }

        for warning in &warnings {
            log::warn!("{}", warning);
        }
        log::info!(
            "Scene built: {} objects, {} lights ({} skipped)",
            scene.objects.len(),
            scene.lights.len(),
            description.objects.len() - scene.objects.len()
        );

        (scene, warnings)
    }

    /// Append an object, assigning and returning its id.
    pub fn add_object(&mut self, mut object: Object) -> usize {
        let id = self.objects.len() + 1;
        object.set_id(id);
        self.objects.push(object);
        self.bvh = None;
        id
    }

    /// Append a light, returning its 1-based id.
    pub fn add_light(&mut self, light: Light) -> usize {
        self.lights.push(light);
        self.lights.len()
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Look up an object by id.
    pub fn object(&self, id: usize) -> Option<&Object> {
        id.checked_sub(1).and_then(|index| self.objects.get(index))
    }

    /// Mutable access to an object by id. Drops the BVH.
    pub fn object_mut(&mut self, id: usize) -> Option<&mut Object> {
        self.bvh = None;
        id.checked_sub(1).and_then(|index| self.objects.get_mut(index))
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Build (or rebuild) the BVH over all bounded objects.
    pub fn build_bvh(&mut self) {
        let bvh = BvhNode::new(&self.objects);
        log::info!(
            "BVH built: {} nodes, {} leaves, depth {}",
            bvh.node_count(),
            bvh.leaf_count(),
            bvh.depth()
        );
        self.bvh = Some(bvh);
    }

    pub fn clear_bvh(&mut self) {
        self.bvh = None;
    }

    pub fn bvh(&self) -> Option<&BvhNode> {
        self.bvh.as_ref()
    }

    /// Nearest forward hit, through the BVH when one is built.
    pub fn ray_hit_results(&self, ray: &Ray) -> RayHitResults<'_> {
        self.ray_hit_results_with(ray, true)
    }

    /// Nearest forward hit by exhaustive scan, ignoring any BVH.
    pub fn ray_hit_results_linear(&self, ray: &Ray) -> RayHitResults<'_> {
        self.ray_hit_results_with(ray, false)
    }

    /// Nearest forward hit. With `use_bvh` off a built tree is ignored.
    pub fn ray_hit_results_with(&self, ray: &Ray, use_bvh: bool) -> RayHitResults<'_> {
        self.hit_results(ray, self.nearest(ray, None, use_bvh))
    }

    /// The tree queries walk when `use_bvh` is set, if one is built.
    pub fn active_bvh(&self, use_bvh: bool) -> Option<&BvhNode> {
        self.bvh.as_ref().filter(|_| use_bvh)
    }

    fn hit_results(&self, ray: &Ray, nearest: Option<(f32, usize)>) -> RayHitResults<'_> {
        match nearest {
            Some((t, index)) => {
                let object = &self.objects[index];
                let point = ray.at(t);
                RayHitResults {
                    t,
                    point,
                    normal: object.normal_transformed(point),
                    object: Some(object),
                }
            }
            None => RayHitResults::miss(),
        }
    }

    /// Nearest (t, index), skipping the object whose id is `exclude`.
    fn nearest(&self, ray: &Ray, exclude: Option<usize>, use_bvh: bool) -> Option<(f32, usize)> {
        match self.active_bvh(use_bvh) {
            Some(bvh) => {
                let indexed = bvh.intersect(&self.objects, ray, exclude);
                // Unbounded objects live outside the tree.
                let unbounded = self.nearest_linear(ray, exclude, |object| {
                    object.bounding_box().is_none()
                });
                match (indexed, unbounded) {
                    (Some(a), Some(b)) => Some(if b.0 < a.0 { b } else { a }),
                    (a, None) => a,
                    (None, b) => b,
                }
            }
            None => self.nearest_linear(ray, exclude, |_| true),
        }
    }

    fn nearest_linear(
        &self,
        ray: &Ray,
        exclude: Option<usize>,
        filter: impl Fn(&Object) -> bool,
    ) -> Option<(f32, usize)> {
        let mut nearest: Option<(f32, usize)> = None;

        for (index, object) in self.objects.iter().enumerate() {
            if Some(object.id()) == exclude || !filter(object) {
                continue;
            }
            if let Some(t) = object.intersect_transformed(ray) {
                if nearest.map_or(true, |(best, _)| t < best) {
                    nearest = Some((t, index));
                }
            }
        }

        nearest
    }

    /// Whether anything other than the object `exclude` blocks the path from
    /// `point` to `light_position`.
    ///
    /// The shadow ray starts [`SURFACE_EPSILON`] along `normal`. When `record`
    /// is given the shadow ray is appended to that iteration.
    pub fn is_light_occluded(
        &self,
        point: Vec3,
        normal: Vec3,
        light_position: Vec3,
        exclude: Option<usize>,
        use_bvh: bool,
        record: Option<&mut Iteration>,
    ) -> bool {
        let origin = point + normal * SURFACE_EPSILON;
        let to_light = light_position - origin;
        let light_distance = to_light.length();
        let ray = Ray::new(origin, to_light.normalize_or_zero());

        let occluded = self
            .nearest(&ray, exclude, use_bvh)
            .is_some_and(|(t, _)| t < light_distance);

        if let Some(iteration) = record {
            iteration.shadow_rays.push(ShadowRay { ray, occluded });
        }

        occluded
    }
}

/// Turn one description into an object, or record why it was dropped.
fn build_object(
    index: usize,
    description: &ObjectDescription,
    warnings: &mut Vec<SceneWarning>,
) -> Option<Object> {
    let shape: Box<dyn Hittable> = match description.geometry {
        Geometry::Sphere { center, radius } => Box::new(Sphere::new(center, radius)),
        Geometry::Plane { normal, distance } => Box::new(Plane::new(normal, distance)),
        Geometry::Triangle { vertices } => {
            Box::new(Triangle::new(vertices[0], vertices[1], vertices[2]))
        }
        Geometry::Box { min, max } => Box::new(Cuboid::new(min, max)),
        Geometry::Cone { .. } => {
            warnings.push(SceneWarning::UnsupportedPrimitive {
                index,
                kind: description.geometry.kind_name(),
            });
            return None;
        }
    };

    let mut object = Object::from_boxed(shape, Material::from_attributes(&description.attributes));

    if let Some(model) = description.attributes.model_matrix() {
        if !object.set_transform(model) {
            warnings.push(SceneWarning::SingularTransform {
                index,
                kind: object.kind_name(),
            });
        }
    }

    Some(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{CameraDescription, TransformOp};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sphere(center: Vec3, radius: f32) -> ObjectDescription {
        ObjectDescription::new(Geometry::Sphere { center, radius })
    }

    fn test_description() -> SceneDescription {
        let mut description = SceneDescription::new(CameraDescription::default());
        description
            .add_light(Vec3::new(0.0, 5.0, 0.0), Color::ONE)
            .add_object(sphere(Vec3::new(0.0, 0.0, 5.0), 1.0))
            .add_object(ObjectDescription::new(Geometry::Cone {
                base: Vec3::ZERO,
                base_radius: 1.0,
                cap: Vec3::Y,
                cap_radius: 0.0,
            }))
            .add_object(ObjectDescription::new(Geometry::Plane {
                normal: Vec3::Y,
                distance: -1.0,
            }))
            .add_object(
                sphere(Vec3::ZERO, 0.5)
                    .with_transform(TransformOp::Translate(Vec3::new(2.0, 0.0, 5.0))),
            );
        description
    }

    #[test]
    fn test_from_description_drops_cone() {
        let (scene, warnings) = Scene::from_description(&test_description());

        assert_eq!(scene.objects().len(), 3);
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(
            warnings,
            vec![SceneWarning::UnsupportedPrimitive {
                index: 1,
                kind: "Cone"
            }]
        );

        // Ids are dense and 1-based in insertion order
        let ids: Vec<usize> = scene.objects().iter().map(Object::id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(scene.object(2).map(Object::kind_name), Some("Plane"));
        assert!(scene.object(0).is_none());
        assert!(scene.object(3).is_some_and(Object::is_transformed));
    }

    #[test]
    fn test_ray_hit_results() {
        let (scene, _) = Scene::from_description(&test_description());

        let hit = scene.ray_hit_results(&Ray::new(Vec3::ZERO, Vec3::Z));
        assert!(hit.is_hit());
        assert_eq!(hit.object.map(Object::id), Some(1));
        assert!((hit.t - 4.0).abs() < 1e-5);
        assert!((hit.normal - -Vec3::Z).length() < 1e-5);

        // Straight down hits the floor plane
        let hit = scene.ray_hit_results(&Ray::new(Vec3::ZERO, -Vec3::Y));
        assert_eq!(hit.object.map(Object::id), Some(2));
        assert!((hit.point - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-5);

        // Up into empty space
        let hit = scene.ray_hit_results(&Ray::new(Vec3::ZERO, Vec3::Y));
        assert!(!hit.is_hit());
    }

    #[test]
    fn test_mutation_drops_bvh() {
        let (mut scene, _) = Scene::from_description(&test_description());
        scene.build_bvh();
        assert!(scene.bvh().is_some());

        scene.add_object(Object::new(Sphere::new(Vec3::ZERO, 1.0), Material::default()));
        assert!(scene.bvh().is_none());

        scene.build_bvh();
        let _ = scene.object_mut(1);
        assert!(scene.bvh().is_none());
    }

    #[test]
    fn test_bvh_matches_linear_with_planes() {
        let (mut scene, _) = Scene::from_description(&test_description());
        scene.build_bvh();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..300 {
            let direction = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            )
            .normalize_or_zero();
            let ray = Ray::new(Vec3::ZERO, direction);

            let fast = scene.ray_hit_results(&ray);
            let slow = scene.ray_hit_results_linear(&ray);
            assert_eq!(fast.object.map(Object::id), slow.object.map(Object::id));
            if fast.is_hit() {
                assert!((fast.t - slow.t).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_active_bvh_follows_flag() {
        let (mut scene, _) = Scene::from_description(&test_description());
        assert!(scene.active_bvh(true).is_none());

        scene.build_bvh();
        assert!(scene.active_bvh(true).is_some());
        assert!(scene.active_bvh(false).is_none());
    }

    #[test]
    fn test_light_occlusion() {
        let mut scene = Scene::new(Camera::new());
        let floor = scene.add_object(Object::new(Plane::new(Vec3::Y, 0.0), Material::default()));
        let blocker = scene.add_object(Object::new(
            Sphere::new(Vec3::new(0.0, 2.0, 0.0), 0.5),
            Material::default(),
        ));

        let light = Vec3::new(0.0, 5.0, 0.0);

        // Directly below the blocker
        assert!(scene.is_light_occluded(Vec3::ZERO, Vec3::Y, light, Some(floor), true, None));

        // Off to the side the light is visible
        assert!(!scene.is_light_occluded(Vec3::new(4.0, 0.0, 0.0), Vec3::Y, light, Some(floor), true, None));

        // The originating object never shadows itself
        let top = Vec3::new(0.0, 2.5, 0.0);
        assert!(!scene.is_light_occluded(top, Vec3::Y, light, Some(blocker), true, None));

        // Objects beyond the light do not count
        let far_light = Vec3::new(0.0, 1.0, 0.0);
        assert!(!scene.is_light_occluded(Vec3::ZERO, Vec3::Y, far_light, Some(floor), true, None));
    }

    #[test]
    fn test_occlusion_is_recorded() {
        let mut scene = Scene::new(Camera::new());
        scene.add_object(Object::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 0.5), Material::default()));

        let mut iteration = Iteration::new(crate::IterationKind::Primary, None);
        let occluded = scene.is_light_occluded(
            Vec3::ZERO,
            Vec3::Y,
            Vec3::new(0.0, 5.0, 0.0),
            None,
            true,
            Some(&mut iteration),
        );

        assert!(occluded);
        assert_eq!(iteration.shadow_rays.len(), 1);
        assert!(iteration.shadow_rays[0].occluded);
        assert!((iteration.shadow_rays[0].ray.direction() - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_repeated_queries_are_identical() {
        let (mut scene, _) = Scene::from_description(&test_description());
        scene.build_bvh();
        let ray = Ray::new(Vec3::new(0.1, 0.2, 0.0), Vec3::new(0.05, -0.02, 1.0).normalize());

        let first = scene.ray_hit_results(&ray);
        let second = scene.ray_hit_results(&ray);
        assert_eq!(first.t.to_bits(), second.t.to_bits());
        assert_eq!(first.point, second.point);
        assert_eq!(first.normal, second.normal);
        assert_eq!(first.object.map(Object::id), second.object.map(Object::id));
    }
}
