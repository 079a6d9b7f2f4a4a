//! Recursive Whitted-style ray tracer.
//!
//! Each ray evaluation is a pure function of the ray and the remaining
//! recursion depth over an immutable scene. Local shading comes from the
//! active [`Brdf`]; mirror reflection and refraction recurse with `depth - 1`
//! and stop contributing when `depth` reaches zero.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::brdf::schlick_fresnel;
use crate::context::{HitInfo, Iteration, IterationKind, IterationTag, PixelContext};
use crate::scene::{Light, RayHitResults, SURFACE_EPSILON};
use crate::{Brdf, BvhNode, Material, Params, Pixel, Scene, SurfaceVectors};
use lumen_math::{Color, Ray, Vec2, Vec3};

/// Absorption coefficient for Beer's law attenuation inside solids.
const BEERS_LAW_DENSITY: f32 = 0.15;

/// Color terms computed for one ray.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RayTraceResults {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub reflection: Color,
    pub refraction: Color,
    /// World-space hit point (zero on a miss)
    pub intersection_point: Vec3,
}

impl RayTraceResults {
    /// Sum of all color terms.
    pub fn to_color(&self) -> Color {
        self.ambient + self.diffuse + self.specular + self.reflection + self.refraction
    }
}

/// Diffuse and specular light from a single light.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LightingResults {
    pub diffuse: Color,
    pub specular: Color,
}

/// How a hit's energy is split between local shading, reflection and
/// transmission.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Contributions {
    pub local: f32,
    pub reflection: f32,
    pub transmission: f32,
}

impl Contributions {
    /// Split for a material, with `fresnel` the reflected fraction of the
    /// transmitted light (0 when Fresnel is disabled).
    pub fn new(material: &Material, fresnel: f32) -> Self {
        let filter = material.filter;
        let reflect = material.finish.reflection;
        Self {
            local: (1.0 - filter) * (1.0 - reflect),
            reflection: (1.0 - filter) * reflect + filter * fresnel,
            transmission: filter * (1.0 - fresnel),
        }
    }
}

/// Direction of a ray refracted through a surface.
///
/// `view` points back along the incoming ray and `normal` is the outward
/// surface normal. Rays arriving from the back side are treated as exiting
/// into air. Returns `None` on total internal reflection.
pub fn refraction_vector(view: Vec3, normal: Vec3, ior: f32) -> Option<Vec3> {
    let (ratio, normal) = if normal.dot(-view) < 0.0 {
        (1.0 / ior, normal)
    } else {
        (ior, -normal)
    };

    let c1 = view.dot(normal);
    let radicand = 1.0 - ratio * ratio * (1.0 - c1 * c1);
    if radicand < 0.0 {
        return None;
    }

    let c2 = radicand.sqrt();
    Some((-view * ratio + normal * (ratio * c1 - c2)).normalize_or_zero())
}

/// Mutable access to the iteration recording the current ray, if any.
fn iteration_mut<'c>(
    context: &'c mut Option<&mut PixelContext>,
    node: Option<usize>,
) -> Option<&'c mut Iteration> {
    match (context.as_deref_mut(), node) {
        (Some(context), Some(index)) => context.get_mut(index),
        _ => None,
    }
}

/// Seed for per-pixel sample jitter so renders are reproducible.
fn pixel_seed(x: u32, y: u32) -> u64 {
    ((y as u64) << 32) | x as u64
}

/// The ray tracer: a scene, a configuration and the active reflectance model.
pub struct RayTracer<'a> {
    scene: &'a Scene,
    params: Params,
    brdf: Box<dyn Brdf>,
}

impl<'a> RayTracer<'a> {
    pub fn new(scene: &'a Scene, params: Params) -> Self {
        let brdf = params.brdf.create();
        Self {
            scene,
            params,
            brdf,
        }
    }

    /// Replace the configuration, reselecting the reflectance model.
    pub fn set_params(&mut self, params: Params) {
        self.brdf = params.brdf.create();
        self.params = params;
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    pub fn brdf(&self) -> &dyn Brdf {
        self.brdf.as_ref()
    }

    /// The BVH this tracer queries, `None` when disabled or not built.
    pub fn bvh(&self) -> Option<&'a BvhNode> {
        self.scene.active_bvh(self.params.use_bvh)
    }

    /// Camera ray through the center of pixel (x, y).
    pub fn pixel_ray(&self, x: u32, y: u32) -> Ray {
        self.scene
            .camera()
            .pixel_ray(x, y, self.params.image_width, self.params.image_height)
    }

    /// Nearest hit of the center ray of pixel (x, y).
    pub fn first_hit(&self, x: u32, y: u32) -> RayHitResults<'a> {
        self.scene
            .ray_hit_results_with(&self.pixel_ray(x, y), self.params.use_bvh)
    }

    /// Shade one ray with `depth` bounces remaining.
    pub fn cast_ray(&self, ray: &Ray, depth: u32) -> RayTraceResults {
        self.trace(ray, depth, None, None)
    }

    /// Shade one ray, recording it and everything it spawns into `context`.
    pub fn cast_ray_recorded(&self, ray: &Ray, depth: u32, context: &mut PixelContext) -> RayTraceResults {
        let root = context.push(IterationKind::Primary, None);
        self.trace(ray, depth, Some(context), Some(root))
    }

    /// Final color of pixel (x, y), averaged over the supersampling grid.
    pub fn cast_rays_for_pixel(&self, x: u32, y: u32) -> Pixel {
        self.shade_pixel(x, y, None)
    }

    /// Shade pixel (x, y) and return the full ray tree. Single-threaded
    /// diagnostic use only.
    pub fn trace_pixel(&self, x: u32, y: u32) -> (Pixel, PixelContext) {
        let mut context = PixelContext::new();
        let pixel = self.shade_pixel(x, y, Some(&mut context));
        (pixel, context)
    }

    fn shade_pixel(&self, x: u32, y: u32, mut context: Option<&mut PixelContext>) -> Pixel {
        let params = &self.params;
        let grid = params.supersampling.max(1);
        let camera = self.scene.camera();
        let mut rng = params
            .jitter
            .then(|| StdRng::seed_from_u64(pixel_seed(x, y)));

        let mut sum = Color::ZERO;
        for sy in 0..grid {
            for sx in 0..grid {
                let (jx, jy) = match rng.as_mut() {
                    Some(rng) => (rng.gen::<f32>(), rng.gen::<f32>()),
                    None => (0.5, 0.5),
                };
                let offset = Vec2::new(
                    (sx as f32 + jx) / grid as f32,
                    (sy as f32 + jy) / grid as f32,
                );
                let ray = camera.sample_ray(x, y, params.image_width, params.image_height, offset);

                let root = context
                    .as_deref_mut()
                    .map(|context| context.push(IterationKind::Primary, None));
                sum += self
                    .trace(&ray, params.recursive_depth, context.as_deref_mut(), root)
                    .to_color();
            }
        }

        Pixel::from_color(sum / (grid * grid) as f32)
    }

    fn trace(
        &self,
        ray: &Ray,
        depth: u32,
        mut context: Option<&mut PixelContext>,
        node: Option<usize>,
    ) -> RayTraceResults {
        let params = &self.params;
        let mut results = RayTraceResults::default();

        if let Some(iteration) = iteration_mut(&mut context, node) {
            iteration.ray = *ray;
        }

        let hit = self.scene.ray_hit_results_with(ray, params.use_bvh);
        let Some(object) = hit.object else {
            return results;
        };
        let material = object.material();

        let point = hit.point;
        results.intersection_point = point;

        let view = -ray.direction().normalize_or_zero();
        let surface_normal = hit.normal.normalize_or_zero();
        let (normal, entering) = if surface_normal.dot(view) < 0.0 {
            (-surface_normal, false)
        } else {
            (surface_normal, true)
        };

        let hit_info = HitInfo {
            object_id: object.id(),
            kind_name: object.kind_name(),
            normal: hit.normal,
            t: hit.t,
        };

        if params.debug_normals {
            results.diffuse = normal / 2.0 + 0.5;
            if let Some(iteration) = iteration_mut(&mut context, node) {
                iteration.hit = Some(hit_info);
                iteration.results = results;
            }
            return results;
        }

        let fresnel = if params.use_fresnel {
            schlick_fresnel(normal.dot(view), material.finish.ior)
        } else {
            0.0
        };
        let mut contributions = Contributions::new(material, fresnel);

        // Local shading
        if params.use_shading {
            results.ambient = contributions.local * material.finish.ambient * material.color;

            for light in self.scene.lights() {
                let occluded = params.use_shadows
                    && self.scene.is_light_occluded(
                        point,
                        normal,
                        light.position,
                        Some(object.id()),
                        params.use_bvh,
                        iteration_mut(&mut context, node),
                    );
                if !occluded {
                    let lighting = self.lighting(light, material, point, view, normal);
                    results.diffuse += contributions.local * lighting.diffuse;
                    results.specular += contributions.local * lighting.specular;
                }
            }
        } else {
            results.diffuse = contributions.local * material.color;
        }

        // Refraction
        if params.use_refractions && depth > 0 && contributions.transmission > 0.0 {
            match refraction_vector(view, surface_normal, material.finish.ior) {
                None => {
                    contributions.reflection += contributions.transmission;
                    contributions.transmission = 0.0;
                    if let Some(iteration) = iteration_mut(&mut context, node) {
                        iteration.tags.push(IterationTag::TotalInternalReflection);
                    }
                }
                Some(direction) => {
                    let child = context.as_deref_mut().map(|context| {
                        let child = context.push(IterationKind::Refraction, node);
                        let tag = if entering {
                            IterationTag::IntoObject
                        } else {
                            IterationTag::IntoAir
                        };
                        if let Some(iteration) = context.get_mut(child) {
                            iteration.tags.push(tag);
                        }
                        child
                    });

                    let origin = point - normal * SURFACE_EPSILON;
                    let transmitted = self.trace(
                        &Ray::new(origin, direction),
                        depth - 1,
                        context.as_deref_mut(),
                        child,
                    );

                    let color = if entering {
                        self.absorb(material, point, &transmitted)
                    } else {
                        transmitted.to_color()
                    };
                    results.refraction = contributions.transmission * color;
                }
            }
        }

        // Reflection
        if params.use_reflections && depth > 0 && contributions.reflection > 0.0 {
            let direction = (normal * view.dot(normal) * 2.0 - view).normalize_or_zero();
            let child = context
                .as_deref_mut()
                .map(|context| context.push(IterationKind::Reflection, node));

            let origin = point + normal * SURFACE_EPSILON;
            let reflected = self
                .trace(&Ray::new(origin, direction), depth - 1, context.as_deref_mut(), child)
                .to_color();
            results.reflection = contributions.reflection * material.color * reflected;
        }

        if let Some(iteration) = iteration_mut(&mut context, node) {
            iteration.hit = Some(hit_info);
            iteration.results = results;
            iteration.contributions = contributions;
        }

        results
    }

    /// Diffuse and specular light arriving from one unoccluded light.
    fn lighting(&self, light: &Light, material: &Material, point: Vec3, view: Vec3, normal: Vec3) -> LightingResults {
        let surface = SurfaceVectors {
            light: (light.position - point).normalize_or_zero(),
            view,
            normal,
        };
        let finish = &material.finish;

        LightingResults {
            diffuse: light.color
                * finish.diffuse
                * material.color
                * self.brdf.diffuse(material, &surface),
            specular: light.color
                * finish.specular
                * material.color
                * self.brdf.specular(material, &surface),
        }
    }

    /// Light transmitted into a solid, tinted by its color or absorbed over
    /// the distance to the far side.
    fn absorb(&self, material: &Material, entry: Vec3, transmitted: &RayTraceResults) -> Color {
        let color = transmitted.to_color();
        if !self.params.use_beers_law {
            return color * material.color;
        }

        let distance = (transmitted.intersection_point - entry).length();
        let density = (Color::ONE - material.color) * -BEERS_LAW_DENSITY * distance;
        color * Color::new(density.x.exp(), density.y.exp(), density.z.exp())
    }
}
