use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use lumen_tracer::{BrdfKind, Params};

/// Log levels accepted on the command line
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser)]
#[command(name = "lumen")]
#[command(about = "A Whitted-style ray tracer", version)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, global = true, default_value = "info")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a full, shaded ray trace to a PNG
    Render(RenderArgs),

    /// Render flat colors with a simple raycast (no shading or shadows)
    Raycast(RenderArgs),

    /// Print the camera, lights and objects found in a scene description
    Sceneinfo {
        /// Scene description (JSON)
        file: PathBuf,

        /// Also print the bounding volume hierarchy
        #[arg(long)]
        bvh: bool,
    },

    /// Print the camera ray for a pixel
    Pixelray(PixelArgs),

    /// Print the first object hit for a pixel
    Firsthit(PixelArgs),

    /// Print the first hit and the final color for a pixel
    Pixelcolor(PixelArgs),

    /// Print every ray traced for a pixel
    Printrays(PixelArgs),

    /// Print every ray traced for a pixel as a decorated tree
    Pixeltrace(PixelArgs),
}

/// Scene file and output resolution
#[derive(Args)]
pub struct ImageArgs {
    /// Scene description (JSON)
    pub file: PathBuf,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    #[command(flatten)]
    pub options: TraceOptions,
}

#[derive(Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub image: ImageArgs,

    /// Output PNG path
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct PixelArgs {
    #[command(flatten)]
    pub image: ImageArgs,

    /// Pixel column
    pub x: u32,

    /// Pixel row, counted from the bottom of the image
    pub y: u32,
}

/// Switches shared by every tracing command
#[derive(Args, Debug, Clone)]
pub struct TraceOptions {
    /// Use Cook-Torrance instead of Blinn-Phong
    #[arg(long)]
    pub altbrdf: bool,

    /// Display surface normals instead of any shading
    #[arg(long)]
    pub normals: bool,

    /// Maximum reflection/refraction depth
    #[arg(long, default_value = "6")]
    pub depth: u32,

    /// Supersampling grid size (N gives N x N rays per pixel)
    #[arg(long, default_value = "1")]
    pub supersample: u32,

    /// Jitter supersamples inside their grid cells
    #[arg(long)]
    pub jitter: bool,

    /// Weight reflection against transmission with Fresnel
    #[arg(long)]
    pub fresnel: bool,

    /// Absorb light travelling through transparent objects
    #[arg(long)]
    pub beers: bool,

    /// Disable the bounding volume hierarchy
    #[arg(long)]
    pub no_bvh: bool,

    /// Rebuild an orthonormal camera basis from look_at
    #[arg(long)]
    pub reconstruct_basis: bool,

    /// Worker threads (0 = one per core)
    #[arg(long, default_value = "0")]
    pub threads: usize,
}

impl ImageArgs {
    /// Render configuration for these arguments.
    pub fn params(&self) -> Params {
        let options = &self.options;
        let brdf = if options.altbrdf {
            BrdfKind::CookTorrance
        } else {
            BrdfKind::BlinnPhong
        };

        Params::default()
            .with_resolution(self.width, self.height)
            .with_brdf(brdf)
            .with_debug_normals(options.normals)
            .with_depth(options.depth)
            .with_supersampling(options.supersample, options.jitter)
            .with_fresnel(options.fresnel)
            .with_beers_law(options.beers)
            .with_bvh(!options.no_bvh)
            .with_threads(options.threads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_command_parses() {
        let cli = Cli::parse_from([
            "lumen", "pixeltrace", "scene.json", "640", "480", "10", "20", "--altbrdf", "--depth", "3",
        ]);

        let Command::Pixeltrace(args) = cli.command else {
            panic!("expected pixeltrace");
        };
        assert_eq!((args.x, args.y), (10, 20));

        let params = args.image.params();
        assert_eq!(params.image_width, 640);
        assert_eq!(params.brdf, BrdfKind::CookTorrance);
        assert_eq!(params.recursive_depth, 3);
        assert!(params.use_bvh);
    }

    #[test]
    fn test_render_defaults() {
        let cli = Cli::parse_from(["lumen", "render", "scene.json", "32", "24", "--no-bvh"]);

        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.output, PathBuf::from("output.png"));

        let params = args.image.params();
        assert_eq!(params.brdf, BrdfKind::BlinnPhong);
        assert_eq!(params.supersampling, 1);
        assert!(!params.use_bvh);
        assert!(params.use_shading);
    }
}
