//! Reflectance models (BRDFs) for local shading.
//!
//! Both models share the Lambertian diffuse term and differ in the specular
//! lobe. The active model is chosen once per render from [`BrdfKind`].

use std::f32::consts::PI;

use crate::Material;
use lumen_math::{Color, Vec3};
use serde::{Deserialize, Serialize};

/// Unit vectors at a shading point, all pointing away from the surface.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceVectors {
    pub light: Vec3,
    pub view: Vec3,
    pub normal: Vec3,
}

/// Trait for reflectance models.
pub trait Brdf: Send + Sync {
    /// Diffuse reflectance factor.
    fn diffuse(&self, material: &Material, surface: &SurfaceVectors) -> Color;

    /// Specular reflectance factor.
    fn specular(&self, material: &Material, surface: &SurfaceVectors) -> Color;

    fn name(&self) -> &'static str;
}

/// Which reflectance model a render uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrdfKind {
    #[default]
    BlinnPhong,
    CookTorrance,
}

impl BrdfKind {
    /// Instantiate the model.
    pub fn create(self) -> Box<dyn Brdf> {
        match self {
            BrdfKind::BlinnPhong => Box::new(BlinnPhong),
            BrdfKind::CookTorrance => Box::new(CookTorrance),
        }
    }
}

/// Schlick's approximation of Fresnel reflectance for a dielectric with the
/// given index of refraction, at an angle with cosine `cos_theta`.
pub fn schlick_fresnel(cos_theta: f32, ior: f32) -> f32 {
    let f0 = ((ior - 1.0) / (ior + 1.0)).powi(2);
    f0 + (1.0 - f0) * (1.0 - cos_theta.clamp(0.0, 1.0)).powi(5)
}

/// Smallest roughness the specular models evaluate; smoother finishes are
/// clamped to it.
const MIN_ROUGHNESS: f32 = 1e-3;

fn lambert(surface: &SurfaceVectors) -> Color {
    Color::splat(surface.normal.dot(surface.light).clamp(0.0, 1.0))
}

/// Blinn-Phong: half-vector highlight with exponent `2/roughness² - 2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlinnPhong;

impl Brdf for BlinnPhong {
    fn diffuse(&self, _material: &Material, surface: &SurfaceVectors) -> Color {
        lambert(surface)
    }

    fn specular(&self, material: &Material, surface: &SurfaceVectors) -> Color {
        let half = (surface.light + surface.view).normalize_or_zero();
        let roughness = material.finish.roughness.max(MIN_ROUGHNESS);
        let power = 2.0 / (roughness * roughness) - 2.0;

        Color::splat(surface.normal.dot(half).clamp(0.0, 1.0).powf(power))
    }

    fn name(&self) -> &'static str {
        "Blinn-Phong"
    }
}

/// Cook-Torrance microfacet model with GGX distribution and shadowing and
/// Schlick Fresnel.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookTorrance;

impl CookTorrance {
    /// GGX normal distribution.
    fn distribution(half: Vec3, normal: Vec3, alpha: f32) -> f32 {
        let h_dot_n = half.dot(normal).clamp(0.0, 1.0);
        let alpha2 = alpha * alpha;
        let cos2 = h_dot_n * h_dot_n;
        // Expanded so tiny alpha does not cancel to zero at the peak
        let denom = cos2 * alpha2 + (1.0 - cos2);
        alpha2 / (PI * denom * denom)
    }

    /// One-sided GGX masking term for direction `v`.
    fn geometry_partial(v: Vec3, normal: Vec3, half: Vec3, alpha: f32) -> f32 {
        let v_dot_n = v.dot(normal);
        let chi = if v.dot(half) / v_dot_n > 0.0 { 1.0 } else { 0.0 };
        let tan2 = (1.0 - v_dot_n * v_dot_n) / (v_dot_n * v_dot_n);

        chi * 2.0 / (1.0 + (1.0 + alpha * alpha * tan2).sqrt())
    }
}

impl Brdf for CookTorrance {
    fn diffuse(&self, _material: &Material, surface: &SurfaceVectors) -> Color {
        lambert(surface)
    }

    fn specular(&self, material: &Material, surface: &SurfaceVectors) -> Color {
        let half = (surface.light + surface.view).normalize_or_zero();
        let roughness = material.finish.roughness.max(MIN_ROUGHNESS);
        let alpha = roughness * roughness;

        let d = Self::distribution(half, surface.normal, alpha);
        let g = Self::geometry_partial(surface.view, surface.normal, half, alpha)
            * Self::geometry_partial(surface.light, surface.normal, half, alpha);
        let f = schlick_fresnel(surface.view.dot(half), material.finish.ior);
        let denom = 4.0 * surface.normal.dot(surface.view).abs().max(1.0 / 16.0);

        let specular = d * g * f / denom;
        // Grazing and degenerate configurations produce 0/0; they reflect nothing.
        if specular.is_finite() {
            Color::splat(specular.max(0.0))
        } else {
            Color::ZERO
        }
    }

    fn name(&self) -> &'static str {
        "Cook-Torrance"
    }
}
