//! Whole-image rendering.
//!
//! Pixels are independent, so workers claim pixel indices from a shared
//! counter and write each result into its own slot of a preallocated buffer.
//! Index `i` maps to `x = i / height`, `y = i % height`; rows are stored
//! top-down, so pixel row `y` lands in image row `height - 1 - y`.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Instant;

use thiserror::Error;

use crate::{Pixel, RayTracer};

/// Errors that can occur while rendering.
#[derive(Error, Debug, PartialEq)]
pub enum RenderError {
    #[error("invalid image size {width}x{height}")]
    InvalidImageSize { width: u32, height: u32 },

    #[error("invalid supersampling grid {0} (must be at least 1)")]
    InvalidSupersampling(u32),

    #[error("failed to start render threads: {0}")]
    ThreadPool(String),

    #[error("render incomplete: {rendered} of {expected} pixels")]
    Incomplete { rendered: usize, expected: usize },
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// 8-bit RGBA image, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl ImageBuffer {
    /// Create a new opaque black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA at image column `x`, image row `row` (0 = top).
    pub fn get(&self, x: u32, row: u32) -> [u8; 4] {
        self.pixels[(row * self.width + x) as usize]
    }

    /// Store the pixel for camera coordinates (x, y), y counting up from the
    /// bottom of the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) {
        let row = self.height - 1 - y;
        self.pixels[(row * self.width + x) as usize] = pixel.to_rgba();
    }

    /// Tightly packed RGBA bytes, ready for an image encoder.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

fn pixel_coords(index: usize, height: u32) -> (u32, u32) {
    let height = height as usize;
    ((index / height) as u32, (index % height) as u32)
}

/// Render every pixel on a pool of worker threads.
///
/// The thread count comes from [`Params::threads`](crate::Params), with 0
/// meaning one per core. Output is identical to [`render_serial`].
pub fn render(tracer: &RayTracer) -> RenderResult<ImageBuffer> {
    let params = tracer.params();
    params.validate()?;

    let (width, height) = (params.image_width, params.image_height);
    let total = params.pixel_count();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(params.threads)
        .build()
        .map_err(|e| RenderError::ThreadPool(e.to_string()))?;
    let workers = pool.current_num_threads();

    log::info!(
        "Rendering {}x{} with {} on {} threads",
        width,
        height,
        tracer.brdf().name(),
        workers
    );
    let start = Instant::now();

    let next = AtomicUsize::new(0);
    let done = AtomicUsize::new(0);
    let slots: Vec<AtomicU32> = (0..total).map(|_| AtomicU32::new(0)).collect();

    pool.scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|_| loop {
                let index = next.fetch_add(1, Ordering::Relaxed);
                if index >= total {
                    break;
                }

                let (x, y) = pixel_coords(index, height);
                let rgba = tracer.cast_rays_for_pixel(x, y).to_rgba();
                slots[index].store(u32::from_le_bytes(rgba), Ordering::Relaxed);
                done.fetch_add(1, Ordering::Relaxed);
            });
        }
    });

    let rendered = done.load(Ordering::Acquire);
    if rendered != total {
        return Err(RenderError::Incomplete {
            rendered,
            expected: total,
        });
    }

    let mut image = ImageBuffer::new(width, height);
    for (index, slot) in slots.iter().enumerate() {
        let [red, green, blue, _] = slot.load(Ordering::Relaxed).to_le_bytes();
        let (x, y) = pixel_coords(index, height);
        image.set_pixel(x, y, Pixel::new(red, green, blue));
    }

    log::info!("Rendered {} pixels in {:.2?}", total, start.elapsed());
    Ok(image)
}

/// Render every pixel on the calling thread.
pub fn render_serial(tracer: &RayTracer) -> RenderResult<ImageBuffer> {
    let params = tracer.params();
    params.validate()?;

    let (width, height) = (params.image_width, params.image_height);
    let start = Instant::now();

    let mut image = ImageBuffer::new(width, height);
    for index in 0..params.pixel_count() {
        let (x, y) = pixel_coords(index, height);
        image.set_pixel(x, y, tracer.cast_rays_for_pixel(x, y));
    }

    log::debug!("Rendered {}x{} serially in {:.2?}", width, height, start.elapsed());
    Ok(image)
}
