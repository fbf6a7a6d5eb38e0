// SPDX-License-Identifier: GPL-3.0-or-later
use std::convert::TryFrom;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{instrument, trace};

use crate::error::ConfigError;
use crate::image_buffer::{ColorGrid, ThermalImage};
use crate::temperature::TemperatureUnit;

use super::color::Color;
use super::palette::Palette;
use super::settings::RenderSettings;

/// Map a temperature to an index into a palette with `depth` colors.
///
/// `lower` maps to 0 and `upper` to `depth - 1`, with temperatures outside of that range clamped
/// to the closest end. NaN is treated as the lowest temperature.
pub(crate) fn temperature_to_index(temperature: f32, lower: f32, upper: f32, depth: usize) -> usize {
    let last = depth.saturating_sub(1) as f64;
    let scaled = (temperature as f64 - lower as f64) * last / (upper as f64 - lower as f64);
    // f64::max returns the non-NaN argument
    scaled.max(0.0).min(last) as usize
}

/// Maps thermal images to colors using a palette and a fixed temperature range.
#[derive(Clone, Debug)]
pub(crate) struct ColorMap {
    palette: Arc<Palette>,
    lower: f32,
    upper: f32,
}

impl ColorMap {
    pub(crate) fn new(palette: Arc<Palette>, lower: f32, upper: f32) -> Result<Self, ConfigError> {
        // Negated so a NaN limit is rejected too
        if !(lower < upper) {
            return Err(ConfigError::InvalidLimits { lower, upper });
        }
        if palette.depth() == 0 {
            return Err(ConfigError::ZeroColorDepth);
        }
        Ok(Self {
            palette,
            lower,
            upper,
        })
    }

    /// The color for a single temperature in Celsius.
    pub(crate) fn color(&self, temperature: f32) -> Color {
        self.palette[temperature_to_index(
            temperature,
            self.lower,
            self.upper,
            self.palette.depth(),
        )]
    }

    /// Map every temperature in a thermal image to a color.
    #[instrument(level = "trace", skip(self, image))]
    pub(crate) fn render(&self, image: &ThermalImage) -> ColorGrid {
        let mut colors = ColorGrid::new(image.width(), image.height());
        colors
            .par_chunks_mut(3)
            .zip(image.as_raw().par_iter())
            .for_each(|(pixel, temperature)| {
                pixel.copy_from_slice(&self.color(*temperature).as_array());
            });
        trace!(
            width = image.width(),
            height = image.height(),
            "mapped temperatures to colors"
        );
        colors
    }
}

impl<'a> TryFrom<&'a RenderSettings> for ColorMap {
    type Error = ConfigError;

    fn try_from(settings: &'a RenderSettings) -> Result<Self, Self::Error> {
        let palette = settings.palette.build(settings.color_depth, settings.spread)?;
        Self::new(
            Arc::new(palette),
            settings.lower_limit.in_unit(&TemperatureUnit::Celsius),
            settings.upper_limit.in_unit(&TemperatureUnit::Celsius),
        )
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::{temperature_to_index, ColorMap};
    use crate::error::ConfigError;
    use crate::image_buffer::ThermalImage;
    use crate::render::palette::{build_palette, DEFAULT_ANCHORS};

    const LOWER: f32 = 20.0;
    const UPPER: f32 = 50.0;
    const DEPTH: usize = 1000;

    fn default_map() -> ColorMap {
        let palette = build_palette(&DEFAULT_ANCHORS, DEPTH, 1.0).unwrap();
        ColorMap::new(Arc::new(palette), LOWER, UPPER).unwrap()
    }

    #[test]
    fn limits_map_to_ends() {
        assert_eq!(temperature_to_index(LOWER, LOWER, UPPER, DEPTH), 0);
        assert_eq!(temperature_to_index(UPPER, LOWER, UPPER, DEPTH), DEPTH - 1);
    }

    #[test]
    fn truncates() {
        // (25 - 20) / (50 - 20) * 999 = 166.5
        assert_eq!(temperature_to_index(25.0, LOWER, UPPER, DEPTH), 166);
    }

    #[test]
    fn clamps_out_of_range() {
        assert_eq!(temperature_to_index(-1.0e6, LOWER, UPPER, DEPTH), 0);
        assert_eq!(temperature_to_index(1.0e6, LOWER, UPPER, DEPTH), DEPTH - 1);
        assert_eq!(
            temperature_to_index(f32::INFINITY, LOWER, UPPER, DEPTH),
            DEPTH - 1
        );
        assert_eq!(temperature_to_index(f32::NEG_INFINITY, LOWER, UPPER, DEPTH), 0);
        assert_eq!(temperature_to_index(f32::NAN, LOWER, UPPER, DEPTH), 0);
    }

    #[test]
    fn monotonic() {
        let mut previous = 0;
        let mut temperature = -20.0f32;
        while temperature < 90.0 {
            let index = temperature_to_index(temperature, LOWER, UPPER, DEPTH);
            assert!(index >= previous, "{} mapped below {}", temperature, previous);
            assert!(index < DEPTH);
            previous = index;
            temperature += 0.037;
        }
    }

    #[test]
    fn single_color_palette() {
        assert_eq!(temperature_to_index(35.0, LOWER, UPPER, 1), 0);
        assert_eq!(temperature_to_index(100.0, LOWER, UPPER, 1), 0);
    }

    #[test]
    fn rejects_bad_limits() {
        let palette = Arc::new(build_palette(&DEFAULT_ANCHORS, DEPTH, 1.0).unwrap());
        let equal = ColorMap::new(Arc::clone(&palette), 30.0, 30.0);
        assert_eq!(
            equal.unwrap_err(),
            ConfigError::InvalidLimits {
                lower: 30.0,
                upper: 30.0
            }
        );
        assert!(ColorMap::new(palette, 50.0, 20.0).is_err());
    }

    #[test]
    fn uniform_frame() {
        let color_map = default_map();
        let palette = build_palette(&DEFAULT_ANCHORS, DEPTH, 1.0).unwrap();
        let image = ThermalImage::from_pixel(32, 24, image::Luma([25.0]));
        let colors = color_map.render(&image);
        assert_eq!(colors.dimensions(), (32, 24));
        let expected: image::Rgb<u8> = palette[166].into();
        assert!(colors.pixels().all(|pixel| *pixel == expected));
    }

    #[test]
    fn row_major_order() {
        let color_map = default_map();
        let mut image = ThermalImage::from_pixel(4, 3, image::Luma([35.0]));
        image.put_pixel(3, 0, image::Luma([LOWER]));
        image.put_pixel(0, 2, image::Luma([UPPER]));
        let colors = color_map.render(&image);
        assert_eq!(
            *colors.get_pixel(3, 0),
            image::Rgb::from(color_map.color(LOWER))
        );
        assert_eq!(
            *colors.get_pixel(0, 2),
            image::Rgb::from(color_map.color(UPPER))
        );
        assert_eq!(
            *colors.get_pixel(1, 1),
            image::Rgb::from(color_map.color(35.0))
        );
    }
}
