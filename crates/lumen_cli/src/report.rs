//! Text reports for the single-pixel diagnostic commands.

use std::fmt::Write;

use lumen_math::Vec3;
use lumen_tracer::{Pixel, PixelContext, RayTracer};

const SEPARATOR: &str =
    "--------------------------------------------------------------------------------";

fn v(vec: Vec3) -> String {
    format!("{:.4} {:.4} {:.4}", vec.x, vec.y, vec.z)
}

/// `pixelray`: the camera ray through the pixel center.
pub fn pixel_ray(tracer: &RayTracer, x: u32, y: u32) -> String {
    format!("Pixel: [{}, {}] Ray: {}", x, y, tracer.pixel_ray(x, y))
}

/// `firsthit`: the nearest object along the pixel's camera ray.
pub fn first_hit(tracer: &RayTracer, x: u32, y: u32) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_first_hit(&mut out, tracer, x, y);
    out
}

/// `pixelcolor`: the first hit plus the pixel's final color.
pub fn pixel_color(tracer: &RayTracer, x: u32, y: u32) -> String {
    let mut out = String::new();
    let _ = write_first_hit(&mut out, tracer, x, y);
    let _ = writeln!(out, "BRDF: {}", tracer.brdf().name());
    let _ = writeln!(out, "Color: {}", tracer.cast_rays_for_pixel(x, y));
    out
}

fn write_first_hit(out: &mut String, tracer: &RayTracer, x: u32, y: u32) -> std::fmt::Result {
    writeln!(out, "{}", pixel_ray(tracer, x, y))?;

    let hit = tracer.first_hit(x, y);
    match hit.object {
        Some(object) => {
            writeln!(out, "T = {:.4}", hit.t)?;
            writeln!(out, "Object Type: {}", object.kind_name())?;
            writeln!(out, "Object ID: {}", object.id())?;
            writeln!(out, "Point: {{{}}}", v(hit.point))?;
            writeln!(out, "Normal: {{{}}}", v(hit.normal))?;
            writeln!(out, "Material Color: {{{}}}", v(object.material().color))?;
        }
        None => writeln!(out, "No Hit")?,
    }
    Ok(())
}

/// `printrays` / `pixeltrace`: every ray traced for the pixel.
///
/// The decorated form draws the tree and also lists shadow rays.
pub fn ray_tree(pixel: Pixel, context: &PixelContext, x: u32, y: u32, decorated: bool) -> String {
    let mut out = String::new();
    let _ = write_ray_tree(&mut out, pixel, context, x, y, decorated);
    out
}

fn write_ray_tree(
    out: &mut String,
    pixel: Pixel,
    context: &PixelContext,
    x: u32,
    y: u32,
    decorated: bool,
) -> std::fmt::Result {
    writeln!(out, "Pixel: [{}, {}] Color: {}", x, y, pixel)?;

    for root in context.roots() {
        write_iteration(out, context, root, "", decorated)?;
    }

    writeln!(out)?;
    writeln!(out, "{}", SEPARATOR)?;
    writeln!(out)
}

fn write_iteration(
    out: &mut String,
    context: &PixelContext,
    index: usize,
    prefix: &str,
    decorated: bool,
) -> std::fmt::Result {
    let Some(iteration) = context.get(index) else {
        return Ok(());
    };

    let (first, other) = if decorated { ("o - ", "|   ") } else { ("", "") };
    if !decorated {
        writeln!(out, "{}----", prefix)?;
    }
    writeln!(out, "{}{}  Iteration type: {}", prefix, first, iteration.kind.name())?;

    let p = format!("{}{}", prefix, other);
    writeln!(out, "{}             Ray: {}", p, iteration.ray)?;

    match &iteration.hit {
        Some(hit) => {
            let results = &iteration.results;
            let contributions = &iteration.contributions;

            writeln!(out, "{}      Hit Object: (ID #{} - {})", p, hit.object_id, hit.kind_name)?;
            writeln!(
                out,
                "{}    Intersection: {{{}}} at T = {:.4}",
                p,
                v(results.intersection_point),
                hit.t
            )?;
            writeln!(out, "{}          Normal: {{{}}}", p, v(hit.normal))?;
            writeln!(out, "{}     Final Color: {{{}}}", p, v(results.to_color()))?;
            writeln!(out, "{}         Ambient: {{{}}}", p, v(results.ambient))?;
            writeln!(out, "{}         Diffuse: {{{}}}", p, v(results.diffuse))?;
            writeln!(out, "{}        Specular: {{{}}}", p, v(results.specular))?;
            writeln!(out, "{}      Reflection: {{{}}}", p, v(results.reflection))?;
            writeln!(out, "{}      Refraction: {{{}}}", p, v(results.refraction))?;
            writeln!(
                out,
                "{}   Contributions: {:.4} Local, {:.4} Reflection, {:.4} Transmission",
                p, contributions.local, contributions.reflection, contributions.transmission
            )?;

            if decorated {
                for (i, shadow) in iteration.shadow_rays.iter().enumerate() {
                    let note = if shadow.occluded { " (in shadow)" } else { "" };
                    writeln!(out, "{}   ShadowRay [{}]: {}{}", p, i, shadow.ray, note)?;
                }
            }
        }
        None => writeln!(out, "{}  No intersection.", p)?,
    }

    let extra = iteration.extra_info();
    if !extra.is_empty() {
        writeln!(out, "{}      Extra Info: {}", p, extra)?;
    }

    let children = context.children(index);
    if children.is_empty() {
        if decorated {
            writeln!(out, "{}|----", prefix)?;
        }
        return writeln!(out, "{}", prefix);
    }

    if decorated {
        writeln!(out, "{}|", prefix)?;
    }
    for (i, &child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let child_prefix = if decorated {
            let (branch, indent) = if last { (" \\", "  ") } else { ("|\\", "| ") };
            writeln!(out, "{}{}", prefix, branch)?;
            format!("{}{}", prefix, indent)
        } else {
            prefix.to_string()
        };
        write_iteration(out, context, child, &child_prefix, decorated)?;
    }
    Ok(())
}
