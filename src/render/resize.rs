// SPDX-License-Identifier: GPL-3.0-or-later
use image::flat::FlatSamples;
use image::imageops;
use serde::Deserialize;
use tracing::trace;

use crate::image_buffer::ColorGrid;

/// Different resizing methods
#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Method {
    /// Nearest neighbor sampling. Each camera pixel becomes a solid block.
    Nearest,

    /// Triangle (aka linear) sampling.
    #[serde(alias = "linear")]
    Triangle,

    /// Catmull-Rom (aka bicubic) sampling.
    #[serde(alias = "bicubic")]
    CatmullRom,

    /// Lanczos sampling with a window size of 3.
    #[serde(alias = "lanczos")]
    Lanczos3,
}

impl Default for Method {
    fn default() -> Self {
        Self::Nearest
    }
}

impl Method {
    /// Scale a grid of colors to the given size.
    pub(crate) fn resize(&self, colors: &ColorGrid, width: u32, height: u32) -> ColorGrid {
        let filter_type = match self {
            Self::Nearest => return resize_nearest(colors, width, height),
            Self::Triangle => imageops::Triangle,
            Self::CatmullRom => imageops::CatmullRom,
            Self::Lanczos3 => imageops::Lanczos3,
        };
        imageops::resize(colors, width, height, filter_type)
    }
}

/// Nearest neighbor scaling.
///
/// Destination pixel `(x, y)` takes the color of source pixel
/// `(x * source_width / width, y * source_height / height)` (rounded down). When the new size is
/// a whole multiple of the source size, every source pixel ends up as an identical rectangular
/// block, and the image is built by copying solid tiles instead.
pub(crate) fn resize_nearest(colors: &ColorGrid, width: u32, height: u32) -> ColorGrid {
    let (source_width, source_height) = colors.dimensions();
    if source_width == 0 || source_height == 0 {
        return ColorGrid::new(width, height);
    }
    if width % source_width == 0 && height % source_height == 0 {
        if let Some(enlarged) =
            enlarge_tiles(colors, width / source_width, height / source_height)
        {
            return enlarged;
        }
    }
    trace!(
        source_width,
        source_height,
        width,
        height,
        "sampling nearest neighbors"
    );
    let scale = |destination: u32, source_size: u32, destination_size: u32| -> u32 {
        (destination as u64 * source_size as u64 / destination_size as u64) as u32
    };
    ColorGrid::from_fn(width, height, |x, y| {
        *colors.get_pixel(
            scale(x, source_width, width),
            scale(y, source_height, height),
        )
    })
}

/// Enlarge each pixel to a `tile_width` by `tile_height` rectangle.
///
/// Drawing mono-color tiles with [image::imageops::replace] is quite a bit faster than
/// [image::imageops::resize] with nearest neighbor filtering, and faster than duplicating
/// individual pixels.
fn enlarge_tiles(colors: &ColorGrid, tile_width: u32, tile_height: u32) -> Option<ColorGrid> {
    let mut full_image = ColorGrid::new(
        colors.width() * tile_width,
        colors.height() * tile_height,
    );
    for (x, y, pixel) in colors.enumerate_pixels() {
        let tile = FlatSamples::with_monocolor(pixel, tile_width, tile_height);
        let tile_view = tile.as_view().ok()?;
        imageops::replace(&mut full_image, &tile_view, x * tile_width, y * tile_height);
    }
    Some(full_image)
}

#[cfg(test)]
mod test {
    use image::Rgb;

    use super::{resize_nearest, Method};
    use crate::image_buffer::ColorGrid;

    fn checkerboard() -> ColorGrid {
        let mut source = ColorGrid::new(2, 2);
        source.put_pixel(0, 0, Rgb([255, 0, 0]));
        source.put_pixel(1, 0, Rgb([0, 255, 0]));
        source.put_pixel(0, 1, Rgb([0, 0, 255]));
        source.put_pixel(1, 1, Rgb([255, 255, 255]));
        source
    }

    #[test]
    fn two_by_two_to_four_by_four() {
        let source = checkerboard();
        let enlarged = resize_nearest(&source, 4, 4);
        assert_eq!(enlarged.dimensions(), (4, 4));
        for (x, y, pixel) in enlarged.enumerate_pixels() {
            assert_eq!(
                pixel,
                source.get_pixel(x / 2, y / 2),
                "pixel ({}, {}) is not from its 2x2 block",
                x,
                y
            );
        }
    }

    #[test]
    fn uneven_scale() {
        let source = checkerboard();
        // 2 -> 3 is not a whole multiple, so the sampling path is used.
        let enlarged = resize_nearest(&source, 3, 5);
        assert_eq!(enlarged.dimensions(), (3, 5));
        for (x, y, pixel) in enlarged.enumerate_pixels() {
            assert_eq!(pixel, source.get_pixel(x * 2 / 3, y * 2 / 5));
        }
    }

    #[test]
    fn tiles_match_sampling() {
        // Build a 32x24 grid with a unique color per pixel and compare the two paths.
        let source = ColorGrid::from_fn(32, 24, |x, y| Rgb([x as u8 * 8, y as u8 * 10, 7]));
        let tiled = resize_nearest(&source, 128, 96);
        let sampled = ColorGrid::from_fn(128, 96, |x, y| *source.get_pixel(x / 4, y / 4));
        assert_eq!(tiled, sampled);
    }

    #[test]
    fn shrink() {
        let source = ColorGrid::from_fn(8, 8, |x, y| Rgb([x as u8, y as u8, 0]));
        let shrunk = resize_nearest(&source, 4, 2);
        assert_eq!(*shrunk.get_pixel(1, 1), Rgb([2, 4, 0]));
    }

    #[test]
    fn other_methods_size() {
        let source = checkerboard();
        let resized = Method::Triangle.resize(&source, 10, 6);
        assert_eq!(resized.dimensions(), (10, 6));
    }
}
