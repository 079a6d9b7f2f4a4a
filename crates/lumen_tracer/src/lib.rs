//! Lumen Tracer - Whitted-style CPU ray tracing
//!
//! Renders a [`Scene`] of analytic primitives lit by point lights:
//! - Local shading with a selectable BRDF (Blinn-Phong or Cook-Torrance)
//! - Hard shadows, mirror reflection and refraction with a recursion bound
//! - Optional Fresnel weighting and Beer's law absorption
//! - A median-split BVH over bounded objects
//! - Supersampling and a parallel pixel driver
//!
//! Every traced ray of a single pixel can be recorded into a
//! [`PixelContext`] for inspection.

mod brdf;
mod bvh;
mod camera;
mod context;
mod cuboid;
mod hittable;
mod material;
mod object;
mod params;
mod pixel;
mod plane;
mod renderer;
mod scene;
mod sphere;
mod tracer;
mod triangle;

pub use brdf::{schlick_fresnel, BlinnPhong, Brdf, BrdfKind, CookTorrance, SurfaceVectors};
pub use bvh::{BvhHit, BvhNode};
pub use camera::{BasisMode, Camera};
pub use context::{HitInfo, Iteration, IterationKind, IterationTag, PixelContext, ShadowRay};
pub use cuboid::Cuboid;
pub use hittable::Hittable;
pub use material::Material;
pub use object::Object;
pub use params::Params;
pub use pixel::Pixel;
pub use plane::Plane;
pub use renderer::{render, render_serial, ImageBuffer, RenderError, RenderResult};
pub use scene::{Light, RayHitResults, Scene, SceneWarning, SURFACE_EPSILON};
pub use sphere::Sphere;
pub use tracer::{refraction_vector, Contributions, LightingResults, RayTraceResults, RayTracer};
pub use triangle::Triangle;

/// Re-export common math types from lumen_math
pub use lumen_math::{Aabb, Color, Ray, Vec3};
