mod cli;
mod logger;
mod report;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_core::load_scene_json;
use lumen_tracer::{BasisMode, ImageBuffer, RayTracer, Scene};

use cli::{Cli, Command, ImageArgs, PixelArgs, RenderArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.log_level.into());

    match cli.command {
        Command::Render(args) => render(&args, false),
        Command::Raycast(args) => render(&args, true),
        Command::Sceneinfo { file, bvh } => scene_info(&file, bvh),
        Command::Pixelray(args) => pixel_report(&args, report::pixel_ray),
        Command::Firsthit(args) => pixel_report(&args, report::first_hit),
        Command::Pixelcolor(args) => pixel_report(&args, report::pixel_color),
        Command::Printrays(args) => ray_tree(&args, false),
        Command::Pixeltrace(args) => ray_tree(&args, true),
    }
}

/// Load a scene description and build the renderable scene for `args`.
fn load_scene(args: &ImageArgs) -> Result<Scene> {
    let description = load_scene_json(&args.file)
        .with_context(|| format!("Failed to load scene {}", args.file.display()))?;

    // Dropped primitives are already logged as warnings.
    let (mut scene, _) = Scene::from_description(&description);

    if args.options.reconstruct_basis {
        let camera = scene.camera().with_basis(BasisMode::Reconstruct);
        *scene.camera_mut() = camera;
    }
    if !args.options.no_bvh {
        scene.build_bvh();
    }

    Ok(scene)
}

fn render(args: &RenderArgs, raycast: bool) -> Result<()> {
    let scene = load_scene(&args.image)?;

    let mut params = args.image.params();
    if raycast {
        params = params.with_shading(false);
    }

    let tracer = RayTracer::new(&scene, params);
    let image = lumen_tracer::render(&tracer).context("Render failed")?;

    save_png(&image, &args.output)?;
    log::info!("Image saved as {}", args.output.display());
    Ok(())
}

fn save_png(image: &ImageBuffer, path: &Path) -> Result<()> {
    let buffer = image::RgbaImage::from_raw(image.width(), image.height(), image.as_bytes().to_vec())
        .context("Image buffer does not match its dimensions")?;
    buffer
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn scene_info(file: &Path, bvh: bool) -> Result<()> {
    let description = load_scene_json(file)
        .with_context(|| format!("Failed to load scene {}", file.display()))?;
    print!("{}", description.summary());

    if bvh {
        let (mut scene, _) = Scene::from_description(&description);
        scene.build_bvh();
        if let Some(tree) = scene.bvh() {
            println!();
            println!("---");
            println!();
            print!("{}", tree.describe(scene.objects()));
        }
    }
    Ok(())
}

fn pixel_report(args: &PixelArgs, report: fn(&RayTracer, u32, u32) -> String) -> Result<()> {
    let scene = load_scene(&args.image)?;
    let tracer = RayTracer::new(&scene, args.image.params());
    check_pixel(&tracer, args)?;

    println!("{}", report(&tracer, args.x, args.y).trim_end());
    Ok(())
}

fn ray_tree(args: &PixelArgs, decorated: bool) -> Result<()> {
    let scene = load_scene(&args.image)?;
    let tracer = RayTracer::new(&scene, args.image.params());
    check_pixel(&tracer, args)?;

    let (pixel, context) = tracer.trace_pixel(args.x, args.y);
    print!("{}", report::ray_tree(pixel, &context, args.x, args.y, decorated));
    Ok(())
}

fn check_pixel(tracer: &RayTracer, args: &PixelArgs) -> Result<()> {
    let params = tracer.params();
    params.validate().context("Invalid render settings")?;
    if args.x >= params.image_width || args.y >= params.image_height {
        anyhow::bail!(
            "Pixel [{}, {}] is outside the {}x{} image",
            args.x,
            args.y,
            params.image_width,
            params.image_height
        );
    }
    Ok(())
}
