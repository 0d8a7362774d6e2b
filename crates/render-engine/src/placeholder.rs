//! Solid-color placeholder images.
//!
//! Used by the `demo` command and smoke tests to exercise the full pipeline
//! without fetching real photos.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use slidecut_common::error::{SlidecutError, SlidecutResult};

/// Write `count` PNG images of distinct colors into `dir`.
///
/// Files are named `image1.png`, `image2.png`, ... in display order.
pub fn write_placeholder_images(
    dir: &Path,
    count: usize,
    width: u32,
    height: u32,
) -> SlidecutResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    (0..count)
        .map(|i| {
            let path = dir.join(format!("image{}.png", i + 1));
            let color = placeholder_color(i, count);
            RgbImage::from_pixel(width.max(1), height.max(1), color)
                .save(&path)
                .map_err(|e| {
                    SlidecutError::image(format!("Failed to write {}: {e}", path.display()))
                })?;
            Ok(path)
        })
        .collect()
}

/// Evenly spaced hues around the color wheel at full saturation.
pub fn placeholder_color(index: usize, count: usize) -> Rgb<u8> {
    let hue = 360.0 * index as f64 / count.max(1) as f64;
    let sector = hue / 60.0;
    let x = 1.0 - (sector % 2.0 - 1.0).abs();
    let (r, g, b) = match sector as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let to_u8 = |v: f64| (v * 255.0).round() as u8;
    Rgb([to_u8(r), to_u8(g), to_u8(b)])
}
