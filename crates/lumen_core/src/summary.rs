//! Plain-text report of a scene description (camera, lights, objects).

use std::fmt::Write;

use lumen_math::Vec3;

use crate::scene::{Geometry, SceneDescription};

fn v(vec: Vec3) -> String {
    format!("{:.4} {:.4} {:.4}", vec.x, vec.y, vec.z)
}

impl SceneDescription {
    /// Describe the scene the way the `sceneinfo` command prints it.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_summary(&mut out);
        out
    }

    fn write_summary(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "Camera:")?;
        writeln!(out, "- Location: {{{}}}", v(self.camera.location))?;
        writeln!(out, "- Up: {{{}}}", v(self.camera.up))?;
        writeln!(out, "- Right: {{{}}}", v(self.camera.right))?;
        writeln!(out, "- Look at: {{{}}}", v(self.camera.look_at))?;
        writeln!(out)?;
        writeln!(out, "---")?;
        writeln!(out)?;

        writeln!(out, "{} light(s)", self.lights.len())?;
        for (i, light) in self.lights.iter().enumerate() {
            writeln!(out)?;
            writeln!(out, "Light[{}]:", i)?;
            writeln!(out, "- Location: {{{}}}", v(light.position))?;
            writeln!(out, "- Color: {{{}}}", v(light.color))?;
        }

        writeln!(out)?;
        writeln!(out, "---")?;
        writeln!(out)?;

        writeln!(out, "{} object(s)", self.objects.len())?;
        for (i, object) in self.objects.iter().enumerate() {
            writeln!(out)?;
            writeln!(out, "Object[{}]:", i)?;
            writeln!(out, "- Type: {}", object.geometry.kind_name())?;

            match &object.geometry {
                Geometry::Sphere { center, radius } => {
                    writeln!(out, "- Center: {{{}}}", v(*center))?;
                    writeln!(out, "- Radius: {:.4}", radius)?;
                }
                Geometry::Plane { normal, distance } => {
                    writeln!(out, "- Normal: {{{}}}", v(*normal))?;
                    writeln!(out, "- Distance: {:.4}", distance)?;
                }
                Geometry::Triangle { vertices } => {
                    for (j, vertex) in vertices.iter().enumerate() {
                        writeln!(out, "- Vertices[{}]: {{{}}}", j, v(*vertex))?;
                    }
                }
                Geometry::Box { min, max } => {
                    writeln!(out, "- Min: {{{}}}", v(*min))?;
                    writeln!(out, "- Max: {{{}}}", v(*max))?;
                }
                Geometry::Cone {
                    base,
                    base_radius,
                    cap,
                    cap_radius,
                } => {
                    writeln!(out, "- Center 1: {{{}}}", v(*base))?;
                    writeln!(out, "- Radius 1: {:.4}", base_radius)?;
                    writeln!(out, "- Center 2: {{{}}}", v(*cap))?;
                    writeln!(out, "- Radius 2: {:.4}", cap_radius)?;
                }
            }

            let attributes = &object.attributes;
            let finish = &attributes.finish;
            writeln!(out, "- Color: {{{}}}", v(attributes.color))?;
            writeln!(out, "- Filter: {:.4}", attributes.filter)?;
            writeln!(out, "- Material:")?;
            writeln!(out, "  - Ambient: {:.4}", finish.ambient)?;
            writeln!(out, "  - Diffuse: {:.4}", finish.diffuse)?;
            writeln!(out, "  - Specular: {:.4}", finish.specular)?;
            writeln!(out, "  - Roughness: {:.4}", finish.roughness)?;
            writeln!(out, "  - Reflection: {:.4}", finish.reflection)?;
            writeln!(out, "  - IOR: {:.4}", finish.ior)?;
            if !attributes.transforms.is_empty() {
                writeln!(out, "- Transforms: {}", attributes.transforms.len())?;
            }
        }

        Ok(())
    }
}
