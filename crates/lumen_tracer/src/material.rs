//! Surface material: base color, filter and finish coefficients.

use lumen_core::{Attributes, Finish};
use lumen_math::Color;

/// Material owned by a single scene object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base color (RGB, 0-1)
    pub color: Color,
    /// Transparency in [0, 1] (0 = opaque)
    pub filter: f32,
    /// Reflectance coefficients
    pub finish: Finish,
}

impl Material {
    /// Create an opaque material with the default finish.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            filter: 0.0,
            finish: Finish::default(),
        }
    }

    /// Build a material from parsed object attributes.
    pub fn from_attributes(attributes: &Attributes) -> Self {
        Self::new(attributes.color)
            .with_filter(attributes.filter)
            .with_finish(attributes.finish)
    }

    pub fn with_filter(mut self, filter: f32) -> Self {
        self.filter = filter.clamp(0.0, 1.0);
        self
    }

    pub fn with_finish(mut self, finish: Finish) -> Self {
        self.finish = finish;
        self
    }

    /// Set only the mirror reflection coefficient.
    pub fn with_reflection(mut self, reflection: f32) -> Self {
        self.finish.reflection = reflection.clamp(0.0, 1.0);
        self
    }

    /// Set only the index of refraction.
    pub fn with_ior(mut self, ior: f32) -> Self {
        self.finish.ior = ior;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Color::ONE)
    }
}
