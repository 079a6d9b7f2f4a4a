//! End-to-end rendering scenarios.

use lumen_core::{CameraDescription, Finish, Geometry, ObjectDescription, SceneDescription};
use lumen_tracer::{
    render, render_serial, Camera, Cuboid, IterationKind, Light, Material, Object, Params,
    PixelContext, Plane, Ray, RayTracer, Scene, SceneWarning, Sphere, Triangle, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn red_sphere_description() -> SceneDescription {
    let mut description = SceneDescription::new(CameraDescription::default());
    description
        .add_light(Vec3::new(0.0, 5.0, 0.0), Vec3::ONE)
        .add_object(
            ObjectDescription::new(Geometry::Sphere {
                center: Vec3::new(0.0, 0.0, 5.0),
                radius: 1.0,
            })
            .with_color(Vec3::new(1.0, 0.0, 0.0)),
        );
    description
}

/// A perfect mirror sphere inside a box of half-mirrored colored walls.
fn mirror_room() -> Scene {
    let mut scene = Scene::new(Camera::new());
    scene.add_object(Object::new(
        Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0),
        Material::new(Vec3::ONE).with_reflection(1.0),
    ));

    let walls = [
        (Vec3::Y, -3.0, Vec3::new(0.8, 0.8, 0.8)),
        (Vec3::Y, 3.0, Vec3::new(0.9, 0.9, 0.9)),
        (Vec3::X, -3.0, Vec3::new(1.0, 0.2, 0.2)),
        (Vec3::X, 3.0, Vec3::new(0.2, 1.0, 0.2)),
        (Vec3::Z, 10.0, Vec3::new(0.2, 0.2, 1.0)),
        (Vec3::Z, -3.0, Vec3::new(1.0, 1.0, 0.2)),
    ];
    for (normal, distance, color) in walls {
        scene.add_object(Object::new(
            Plane::new(normal, distance),
            Material::new(color).with_reflection(0.5),
        ));
    }

    scene.add_light(Light::new(Vec3::new(0.0, 2.5, 0.0), Vec3::ONE));
    scene.build_bvh();
    scene
}

#[test]
fn test_red_sphere_from_description() {
    let (mut scene, warnings) = Scene::from_description(&red_sphere_description());
    assert!(warnings.is_empty());
    scene.build_bvh();

    let tracer = RayTracer::new(&scene, Params::default().with_resolution(5, 5));
    let image = render(&tracer).unwrap();

    // Pixel (2, 2) lands in image row 5 - 1 - 2
    let center = image.get(2, 2);
    assert!(center[0] > 0);
    assert_eq!(&center[1..], &[0, 0, 255]);

    for (x, row) in [(0, 0), (4, 0), (0, 4), (4, 4)] {
        assert_eq!(image.get(x, row), [0, 0, 0, 255]);
    }

    let pixel = tracer.cast_rays_for_pixel(2, 2);
    assert_eq!(pixel.to_rgba(), center);
}

#[test]
fn test_unsupported_primitives_are_dropped() {
    let mut description = red_sphere_description();
    description.add_object(ObjectDescription::new(Geometry::Cone {
        base: Vec3::ZERO,
        base_radius: 1.0,
        cap: Vec3::Y,
        cap_radius: 0.5,
    }));

    let (scene, warnings) = Scene::from_description(&description);
    assert_eq!(scene.objects().len(), 1);
    assert!(matches!(
        warnings.as_slice(),
        [SceneWarning::UnsupportedPrimitive { index: 1, kind: "Cone" }]
    ));
}

#[test]
fn test_mirror_room_recursion_is_bounded() {
    let scene = mirror_room();
    let ray = Ray::new(Vec3::ZERO, Vec3::Z);

    for depth in 0..=6 {
        let tracer = RayTracer::new(&scene, Params::default().with_depth(depth));
        let mut context = PixelContext::new();
        tracer.cast_ray_recorded(&ray, depth, &mut context);

        assert_eq!(context.count(IterationKind::Reflection), depth as usize);
        assert_eq!(context.count(IterationKind::Refraction), 0);
        assert_eq!(context.max_depth(), depth as usize);
    }

    let tracer = RayTracer::new(&scene, Params::default());
    let results = tracer.cast_ray(&ray, 0);
    assert_eq!(results.reflection, Vec3::ZERO);
    assert!(tracer.cast_ray(&ray, 1).reflection.length() > 0.0);
}

#[test]
fn test_bvh_matches_linear_scan() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut scene = Scene::new(Camera::new());

    for _ in 0..40 {
        let center = Vec3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(5.0..30.0),
        );
        let object = match rng.gen_range(0..3) {
            0 => Object::new(Sphere::new(center, rng.gen_range(0.2..1.5)), Material::default()),
            1 => Object::new(
                Cuboid::new(center - Vec3::splat(0.5), center + Vec3::splat(0.7)),
                Material::default(),
            ),
            _ => Object::new(
                Triangle::new(center, center + Vec3::X, center + Vec3::Y),
                Material::default(),
            ),
        };
        scene.add_object(object);
    }
    scene.add_object(Object::new(Plane::new(Vec3::Y, -12.0), Material::default()));
    scene.build_bvh();

    for _ in 0..500 {
        let direction = Vec3::new(
            rng.gen_range(-0.6..0.6),
            rng.gen_range(-0.6..0.6),
            1.0,
        );
        let ray = Ray::new(Vec3::ZERO, direction.normalize());

        let accelerated = scene.ray_hit_results(&ray);
        let linear = scene.ray_hit_results_linear(&ray);

        assert_eq!(
            accelerated.object.map(|object| object.id()),
            linear.object.map(|object| object.id())
        );
        if linear.is_hit() {
            assert!((accelerated.t - linear.t).abs() < 1e-5);
        }
    }
}

#[test]
fn test_bvh_keeps_large_triangle_edge_hits() {
    let mut scene = Scene::new(Camera::new());
    let triangle = scene.add_object(Object::new(
        Triangle::new(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(100.0, 0.0, 5.0),
            Vec3::new(0.0, 100.0, 5.0),
        ),
        Material::default(),
    ));
    scene.add_object(Object::new(Sphere::new(Vec3::new(-20.0, 0.0, 30.0), 1.0), Material::default()));
    scene.build_bvh();

    // Slightly past the x = 0 edge, inside the intersection tolerance
    for offset in [-5e-4, -1e-4, 0.0, 5e-4] {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(offset, 50.0, 5.0).normalize());
        let accelerated = scene.ray_hit_results(&ray);
        let linear = scene.ray_hit_results_linear(&ray);

        assert_eq!(linear.object.map(|object| object.id()), Some(triangle));
        assert_eq!(
            accelerated.object.map(|object| object.id()),
            linear.object.map(|object| object.id())
        );
    }
}

#[test]
fn test_render_is_deterministic() {
    let (mut scene, _) = Scene::from_description(&red_sphere_description());
    scene.add_object(Object::new(
        Sphere::new(Vec3::new(1.2, 0.5, 7.0), 1.0),
        Material::new(Vec3::ONE)
            .with_filter(0.9)
            .with_finish(Finish {
                ior: 1.5,
                specular: 0.5,
                ..Finish::default()
            }),
    ));
    scene.build_bvh();

    let params = Params::default()
        .with_resolution(16, 12)
        .with_supersampling(2, true)
        .with_fresnel(true)
        .with_beers_law(true)
        .with_threads(3);
    let tracer = RayTracer::new(&scene, params);

    let first = render(&tracer).unwrap();
    let second = render(&tracer).unwrap();
    let serial = render_serial(&tracer).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, serial);
}

#[test]
fn test_raycast_mode_shows_flat_colors() {
    let (scene, _) = Scene::from_description(&red_sphere_description());
    let tracer = RayTracer::new(&scene, Params::default().with_resolution(5, 5).with_shading(false));

    assert_eq!(tracer.cast_rays_for_pixel(2, 2).to_rgba(), [255, 0, 0, 255]);
}
