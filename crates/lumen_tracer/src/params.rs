//! Render configuration.

use serde::{Deserialize, Serialize};

use crate::{BrdfKind, RenderError, RenderResult};

/// Render configuration consumed by the tracer and the pixel driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Output image width in pixels
    pub image_width: u32,
    /// Output image height in pixels
    pub image_height: u32,
    /// Evaluate the reflectance model; when off, surfaces show their base color
    pub use_shading: bool,
    /// Cast shadow rays toward each light
    pub use_shadows: bool,
    /// Trace mirror reflections
    pub use_reflections: bool,
    /// Trace transmitted rays
    pub use_refractions: bool,
    /// Shift weight from transmission to reflection at grazing angles
    pub use_fresnel: bool,
    /// Attenuate light travelling through solids
    pub use_beers_law: bool,
    /// Reflectance model for the whole render
    pub brdf: BrdfKind,
    /// Maximum number of reflection/refraction bounces
    pub recursive_depth: u32,
    /// Primary rays per pixel along each axis (N gives an N x N grid)
    pub supersampling: u32,
    /// Randomize sample positions inside each grid cell
    pub jitter: bool,
    /// Show shading normals as colors instead of lighting
    pub debug_normals: bool,
    /// Build and query the BVH
    pub use_bvh: bool,
    /// Worker threads for the parallel driver (0 = one per core)
    pub threads: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            image_width: 640,
            image_height: 480,
            use_shading: true,
            use_shadows: true,
            use_reflections: true,
            use_refractions: true,
            use_fresnel: false,
            use_beers_law: false,
            brdf: BrdfKind::BlinnPhong,
            recursive_depth: 6,
            supersampling: 1,
            jitter: false,
            debug_normals: false,
            use_bvh: true,
            threads: 0,
        }
    }
}

impl Params {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Turn shading and shadows on or off together.
    pub fn with_shading(mut self, enabled: bool) -> Self {
        self.use_shading = enabled;
        self.use_shadows = enabled;
        self
    }

    pub fn with_shadows(mut self, enabled: bool) -> Self {
        self.use_shadows = enabled;
        self
    }

    pub fn with_reflections(mut self, enabled: bool) -> Self {
        self.use_reflections = enabled;
        self
    }

    pub fn with_refractions(mut self, enabled: bool) -> Self {
        self.use_refractions = enabled;
        self
    }

    pub fn with_fresnel(mut self, enabled: bool) -> Self {
        self.use_fresnel = enabled;
        self
    }

    pub fn with_beers_law(mut self, enabled: bool) -> Self {
        self.use_beers_law = enabled;
        self
    }

    pub fn with_brdf(mut self, brdf: BrdfKind) -> Self {
        self.brdf = brdf;
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.recursive_depth = depth;
        self
    }

    /// Set the supersampling grid size and whether samples are jittered.
    pub fn with_supersampling(mut self, grid: u32, jitter: bool) -> Self {
        self.supersampling = grid;
        self.jitter = jitter;
        self
    }

    pub fn with_debug_normals(mut self, enabled: bool) -> Self {
        self.debug_normals = enabled;
        self
    }

    pub fn with_bvh(mut self, enabled: bool) -> Self {
        self.use_bvh = enabled;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Total pixel count.
    pub fn pixel_count(&self) -> usize {
        self.image_width as usize * self.image_height as usize
    }

    /// Reject configurations that cannot be rendered.
    pub fn validate(&self) -> RenderResult<()> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(RenderError::InvalidImageSize {
                width: self.image_width,
                height: self.image_height,
            });
        }
        if self.supersampling == 0 {
            return Err(RenderError::InvalidSupersampling(self.supersampling));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = Params::default();
        assert!(params.use_shading);
        assert!(params.use_shadows);
        assert_eq!(params.brdf, BrdfKind::BlinnPhong);
        assert_eq!(params.recursive_depth, 6);
        assert_eq!(params.supersampling, 1);
        assert!(params.use_bvh);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        let params = Params::default().with_resolution(0, 10);
        assert!(matches!(
            params.validate(),
            Err(RenderError::InvalidImageSize { width: 0, height: 10 })
        ));

        let params = Params::default().with_supersampling(0, false);
        assert!(matches!(params.validate(), Err(RenderError::InvalidSupersampling(0))));
    }

    #[test]
    fn test_raycast_preset() {
        let params = Params::default().with_shading(false);
        assert!(!params.use_shading);
        assert!(!params.use_shadows);
    }

    #[test]
    fn test_serde_fills_defaults() {
        let params: Params = serde_json::from_str(r#"{ "image_width": 32, "brdf": "CookTorrance" }"#).unwrap();
        assert_eq!(params.image_width, 32);
        assert_eq!(params.image_height, 480);
        assert_eq!(params.brdf, BrdfKind::CookTorrance);
    }
}
