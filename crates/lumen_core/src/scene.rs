//! Scene description types for Lumen.
//!
//! This module defines the parsed scene value handed to the renderer: a
//! camera pose, point lights, and primitive descriptors with their material
//! and transform attributes. It is renderer-agnostic and serde-friendly so
//! any front end (a POV-Ray-style parser, JSON, tests) can produce it.

use lumen_math::{Color, Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Surface reflectance coefficients.
///
/// Absent fields take POV-Ray-like defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Finish {
    /// Ambient coefficient
    pub ambient: f32,

    /// Lambertian diffuse coefficient
    pub diffuse: f32,

    /// Specular highlight coefficient
    pub specular: f32,

    /// Microfacet roughness (0 = smooth, 1 = rough)
    pub roughness: f32,

    /// Mirror reflection coefficient in [0, 1]
    pub reflection: f32,

    /// Index of refraction
    pub ior: f32,
}

impl Default for Finish {
    fn default() -> Self {
        Self {
            ambient: 0.1,
            diffuse: 0.6,
            specular: 0.0,
            roughness: 0.05,
            reflection: 0.0,
            ior: 1.0,
        }
    }
}

/// One affine operation from an object's attribute list.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformOp {
    /// Translate by a vector
    Translate(Vec3),

    /// Scale per axis
    Scale(Vec3),

    /// Rotate by Euler angles in degrees, applied about x, then y, then z
    Rotate(Vec3),
}

impl TransformOp {
    /// The 4x4 matrix for this single operation.
    pub fn matrix(&self) -> Mat4 {
        match *self {
            TransformOp::Translate(offset) => Mat4::from_translation(offset),
            TransformOp::Scale(scale) => Mat4::from_scale(scale),
            TransformOp::Rotate(degrees) => {
                Mat4::from_rotation_z(degrees.z.to_radians())
                    * Mat4::from_rotation_y(degrees.y.to_radians())
                    * Mat4::from_rotation_x(degrees.x.to_radians())
            }
        }
    }
}

/// Material and transform attributes attached to a primitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    /// Base color (RGB, 0-1)
    pub color: Color,

    /// Transparency/filter in [0, 1] (0 = opaque)
    pub filter: f32,

    /// Reflectance coefficients
    pub finish: Finish,

    /// Transform operations in file order
    pub transforms: Vec<TransformOp>,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            color: Color::ONE,
            filter: 0.0,
            finish: Finish::default(),
            transforms: Vec::new(),
        }
    }
}

impl Attributes {
    /// Compose the transform list into a model matrix.
    ///
    /// Operations apply in file order, so each later operation is multiplied
    /// on the left. Returns `None` when there are no transforms.
    pub fn model_matrix(&self) -> Option<Mat4> {
        if self.transforms.is_empty() {
            return None;
        }

        let matrix = self
            .transforms
            .iter()
            .fold(Mat4::IDENTITY, |acc, op| op.matrix() * acc);
        Some(matrix)
    }
}

/// Geometry parameters for each primitive kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Sphere {
        center: Vec3,
        radius: f32,
    },
    /// Infinite plane `dot(p, normal) = distance`
    Plane {
        normal: Vec3,
        distance: f32,
    },
    Triangle {
        vertices: [Vec3; 3],
    },
    Box {
        min: Vec3,
        max: Vec3,
    },
    /// Truncated cone. Carried for completeness; the renderer does not
    /// implement it.
    Cone {
        base: Vec3,
        base_radius: f32,
        cap: Vec3,
        cap_radius: f32,
    },
}

impl Geometry {
    /// Human-readable kind name.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Geometry::Sphere { .. } => "Sphere",
            Geometry::Plane { .. } => "Plane",
            Geometry::Triangle { .. } => "Triangle",
            Geometry::Box { .. } => "Box",
            Geometry::Cone { .. } => "Cone",
        }
    }
}

/// One primitive as described in the scene file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescription {
    pub geometry: Geometry,

    #[serde(default)]
    pub attributes: Attributes,
}

impl ObjectDescription {
    /// Create a description with default attributes.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            attributes: Attributes::default(),
        }
    }

    /// Builder method to set the base color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.attributes.color = color;
        self
    }

    /// Builder method to set the filter (transparency).
    pub fn with_filter(mut self, filter: f32) -> Self {
        self.attributes.filter = filter.clamp(0.0, 1.0);
        self
    }

    /// Builder method to set the finish.
    pub fn with_finish(mut self, finish: Finish) -> Self {
        self.attributes.finish = finish;
        self
    }

    /// Builder method to append a transform operation.
    pub fn with_transform(mut self, op: TransformOp) -> Self {
        self.attributes.transforms.push(op);
        self
    }
}

/// A point light.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightDescription {
    pub position: Vec3,
    pub color: Color,
}

/// Camera pose as written in the scene file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDescription {
    pub location: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    pub right: Vec3,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            location: Vec3::ZERO,
            look_at: Vec3::Z,
            up: Vec3::Y,
            right: Vec3::new(1.333_333_3, 0.0, 0.0),
        }
    }
}

/// The complete parsed scene.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub camera: CameraDescription,
    pub lights: Vec<LightDescription>,
    pub objects: Vec<ObjectDescription>,
}

impl SceneDescription {
    /// Create an empty description with the given camera.
    pub fn new(camera: CameraDescription) -> Self {
        Self {
            camera,
            ..Default::default()
        }
    }

    /// Append a light.
    pub fn add_light(&mut self, position: Vec3, color: Color) -> &mut Self {
        self.lights.push(LightDescription { position, color });
        self
    }

    /// Append an object.
    pub fn add_object(&mut self, object: ObjectDescription) -> &mut Self {
        self.objects.push(object);
        self
    }

    /// Get total object count.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Get total light count.
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }
}
