//! # Raster Preparation
//!
//! Turns decoded images into the 1-bit planar raster the pipeline
//! consumes. Used by the CLI only; library callers normally implement
//! [`RasterSource`](crate::raster::RasterSource) over their own
//! rendering engine.

pub mod dither;

use image::{DynamicImage, GenericImageView};

use crate::raster::PlanarRaster;

/// Dither an image to a single-plane 1-bit raster. Luma is inverted
/// into ink coverage: dark pixels fire dots.
pub fn raster_from_image(img: &DynamicImage) -> PlanarRaster {
    let gray = img.to_luma8();
    let (width, height) = gray.dimensions();
    let mut raster = PlanarRaster::blank(
        (width as usize).div_ceil(8),
        height,
        1,
    );
    for y in 0..height {
        for x in 0..width {
            let coverage = 1.0 - gray.get_pixel(x, y)[0] as f32 / 255.0;
            if dither::should_print(x as usize, y as usize, coverage) {
                raster.set_pixel(0, x, y);
            }
        }
    }
    raster
}

/// Dither an image to four CMYK planes using a plain max-black
/// separation: K takes the shared gray component, the chromatic planes
/// carry the remainder. Good enough for ribbon tests; real color work
/// belongs upstream.
pub fn cmyk_raster_from_image(img: &DynamicImage) -> PlanarRaster {
    let (width, height) = img.dimensions();
    let mut raster = PlanarRaster::blank(
        (width as usize).div_ceil(8),
        height,
        4,
    );
    for y in 0..height {
        for x in 0..width {
            let p = img.get_pixel(x, y);
            let (r, g, b) = (
                p[0] as f32 / 255.0,
                p[1] as f32 / 255.0,
                p[2] as f32 / 255.0,
            );
            let k = 1.0 - r.max(g).max(b);
            let scale = if k < 1.0 { 1.0 - k } else { 1.0 };
            let coverages = [
                (1.0 - r - k) / scale, // cyan
                (1.0 - g - k) / scale, // magenta
                (1.0 - b - k) / scale, // yellow
                k,
            ];
            for (plane, &coverage) in coverages.iter().enumerate() {
                if dither::should_print(x as usize, y as usize, coverage) {
                    raster.set_pixel(plane, x, y);
                }
            }
        }
    }
    raster
}
