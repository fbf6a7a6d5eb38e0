// SPDX-License-Identifier: GPL-3.0-or-later
use image::{imageops, GrayImage};
use tracing::{instrument, trace};

use crate::error::ConfigError;
use crate::image_buffer::{Canvas, ColorGrid};
use crate::temperature::TemperatureUnit;

use super::color::Color;
use super::font::OverlayFont;
use super::resize::Method;
use super::settings::RenderSettings;
use super::stats::FrameStats;

/// Where everything goes on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Layout {
    pub(crate) canvas_width: u32,
    pub(crate) canvas_height: u32,
    pub(crate) thermal_width: u32,
    pub(crate) thermal_height: u32,
    pub(crate) offset_x: u32,
    pub(crate) offset_y: u32,
    pub(crate) text_origin: (u32, u32),
    pub(crate) line_spacing: u32,
}

impl Layout {
    pub(crate) fn new(
        settings: &RenderSettings,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Result<Self, ConfigError> {
        let dimensions = [
            ("display width", canvas_width),
            ("display height", canvas_height),
            ("thermal_width", settings.thermal_width),
            ("thermal_height", settings.thermal_height),
        ];
        if let Some((name, _)) = dimensions.iter().find(|(_, size)| *size == 0) {
            return Err(ConfigError::EmptyDimension(*name));
        }
        Ok(Self {
            canvas_width,
            canvas_height,
            thermal_width: settings.thermal_width,
            thermal_height: settings.thermal_height,
            offset_x: settings.offset_x,
            offset_y: settings.offset_y,
            text_origin: settings.text_origin(),
            line_spacing: settings.line_spacing,
        })
    }
}

/// Combines the scaled thermal image and the overlay text into a display sized image.
#[derive(Debug)]
pub(crate) struct Compositor {
    layout: Layout,
    scaling_method: Method,
    background: Color,
    text_color: Color,
    units: TemperatureUnit,
    font: OverlayFont,
}

impl Compositor {
    pub(crate) fn new(layout: Layout, settings: &RenderSettings, font: OverlayFont) -> Self {
        Self {
            layout,
            scaling_method: settings.scaling_method,
            background: settings.background,
            text_color: settings.background.foreground_color(),
            units: settings.units,
            font,
        }
    }

    #[instrument(level = "trace", skip(self, colors))]
    pub(crate) fn compose(&self, colors: &ColorGrid, stats: &FrameStats, fps: f32) -> Canvas {
        let layout = &self.layout;
        let thermal =
            self.scaling_method
                .resize(colors, layout.thermal_width, layout.thermal_height);
        let mut canvas = Canvas::from_pixel(
            layout.canvas_width,
            layout.canvas_height,
            self.background.into(),
        );
        // replace() clips anything hanging off the edge of the canvas
        imageops::replace(&mut canvas, &thermal, layout.offset_x, layout.offset_y);
        let (text_x, text_y) = layout.text_origin;
        let mask_width = layout.canvas_width.saturating_sub(text_x);
        for (line_number, line) in stats.overlay_lines(fps, self.units).iter().enumerate() {
            let line_y =
                text_y.saturating_add(layout.line_spacing.saturating_mul(line_number as u32));
            if mask_width == 0 || line_y >= layout.canvas_height {
                trace!(line_number, "overlay line is off of the canvas");
                continue;
            }
            let mask = self
                .font
                .render_line(line, mask_width, layout.line_spacing);
            blend_mask(&mut canvas, &mask, text_x, line_y, self.text_color);
        }
        canvas
    }
}

/// Blend `color` onto `canvas` using `mask` (placed at `x`, `y`) as the opacity.
fn blend_mask(canvas: &mut Canvas, mask: &GrayImage, x: u32, y: u32, color: Color) {
    let color = color.as_array();
    mask.enumerate_pixels()
        // We only need to modify pixels that have some font data in them, and opacity is
        // the easy filter for that.
        .filter(|(_, _, opacity)| opacity.0[0] != 0)
        .for_each(|(mask_x, mask_y, opacity)| {
            let (canvas_x, canvas_y) = (x.saturating_add(mask_x), y.saturating_add(mask_y));
            if canvas_x >= canvas.width() || canvas_y >= canvas.height() {
                return;
            }
            let alpha = opacity.0[0] as u16;
            let pixel = canvas.get_pixel_mut(canvas_x, canvas_y);
            for (channel, text) in pixel.0.iter_mut().zip(color.iter()) {
                *channel = ((*channel as u16 * (255 - alpha) + *text as u16 * alpha) / 255) as u8;
            }
        });
}

#[cfg(test)]
mod test {
    use std::convert::TryFrom;

    use image::{Luma, Rgb};

    use super::{Compositor, Layout};
    use crate::error::ConfigError;
    use crate::image_buffer::{ColorGrid, ThermalImage};
    use crate::render::color::Color;
    use crate::render::color_map::ColorMap;
    use crate::render::font::OverlayFont;
    use crate::render::settings::RenderSettings;
    use crate::render::stats::FrameStats;

    fn compositor(settings: &RenderSettings) -> Compositor {
        let layout = Layout::new(settings, 128, 128).unwrap();
        Compositor::new(layout, settings, OverlayFont::builtin())
    }

    fn scenario() -> ThermalImage {
        let mut image = ThermalImage::from_pixel(32, 24, Luma([35.0]));
        image.put_pixel(5, 3, Luma([20.0]));
        image.put_pixel(20, 10, Luma([50.0]));
        image
    }

    #[test]
    fn end_to_end_layout() {
        let settings = RenderSettings::default();
        let color_map = ColorMap::try_from(&settings).unwrap();
        let image = scenario();
        let colors = color_map.render(&image);
        let stats = FrameStats::from_image(&image);
        let canvas = compositor(&settings).compose(&colors, &stats, 4.0);
        assert_eq!(canvas.dimensions(), (128, 128));
        // Every camera pixel is a 4x4 block
        for (x, y, pixel) in canvas.enumerate_pixels().filter(|(_, y, _)| *y < 96) {
            assert_eq!(pixel, colors.get_pixel(x / 4, y / 4), "at ({}, {})", x, y);
        }
        assert_eq!(
            *canvas.get_pixel(21, 13),
            Rgb::from(color_map.color(20.0))
        );
        assert_eq!(
            *canvas.get_pixel(83, 43),
            Rgb::from(color_map.color(50.0))
        );
        // Below the thermal image there's only the black background and white (or gray) text
        let text_region: Vec<&Rgb<u8>> = canvas
            .enumerate_pixels()
            .filter(|(_, y, _)| *y >= 96)
            .map(|(_, _, pixel)| pixel)
            .collect();
        assert!(text_region
            .iter()
            .all(|pixel| pixel[0] == pixel[1] && pixel[1] == pixel[2]));
        assert!(text_region.iter().any(|pixel| pixel[0] > 0));
    }

    #[test]
    fn clips_offset_image() {
        let settings = RenderSettings {
            offset_x: 100,
            offset_y: 60,
            text_y: Some(0),
            ..RenderSettings::default()
        };
        let colors = ColorGrid::from_pixel(32, 24, Rgb([10, 200, 30]));
        let stats = FrameStats::from_image(&scenario());
        let canvas = compositor(&settings).compose(&colors, &stats, 0.0);
        assert_eq!(*canvas.get_pixel(127, 127), Rgb([10, 200, 30]));
        assert_eq!(*canvas.get_pixel(99, 127), Rgb([0, 0, 0]));
    }

    #[test]
    fn dark_text_on_light_background() {
        let settings = RenderSettings {
            background: Color::WHITE,
            ..RenderSettings::default()
        };
        let colors = ColorGrid::from_pixel(32, 24, Rgb([0, 0, 0]));
        let stats = FrameStats::from_image(&scenario());
        let canvas = compositor(&settings).compose(&colors, &stats, 0.0);
        let below: Vec<&Rgb<u8>> = canvas
            .enumerate_pixels()
            .filter(|(_, y, _)| *y >= 96)
            .map(|(_, _, pixel)| pixel)
            .collect();
        assert!(below.iter().any(|pixel| **pixel == Rgb([0, 0, 0])));
        assert!(below.iter().any(|pixel| **pixel == Rgb([255, 255, 255])));
    }

    #[test]
    fn text_below_canvas() {
        let settings = RenderSettings {
            text_y: Some(500),
            ..RenderSettings::default()
        };
        let colors = ColorGrid::from_pixel(32, 24, Rgb([1, 2, 3]));
        let stats = FrameStats::from_image(&scenario());
        let canvas = compositor(&settings).compose(&colors, &stats, 0.0);
        assert!(canvas
            .enumerate_pixels()
            .filter(|(_, y, _)| *y >= 96)
            .all(|(_, _, pixel)| *pixel == Rgb([0, 0, 0])));
    }

    #[test]
    fn text_at_end_of_range() {
        let settings = RenderSettings {
            text_x: u32::MAX,
            text_y: Some(u32::MAX - 4),
            line_spacing: u32::MAX,
            ..RenderSettings::default()
        };
        let colors = ColorGrid::from_pixel(32, 24, Rgb([1, 2, 3]));
        let stats = FrameStats::from_image(&scenario());
        let canvas = compositor(&settings).compose(&colors, &stats, 0.0);
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([1, 2, 3]));
        assert_eq!(*canvas.get_pixel(0, 127), Rgb([0, 0, 0]));

        let below_thermal = RenderSettings {
            offset_y: u32::MAX,
            thermal_height: 24,
            ..RenderSettings::default()
        };
        assert_eq!(below_thermal.text_origin(), (below_thermal.text_x, u32::MAX));
        let canvas = compositor(&below_thermal).compose(&colors, &stats, 0.0);
        assert!(canvas.pixels().all(|pixel| *pixel == Rgb([0, 0, 0])));
    }

    #[test]
    fn empty_layout() {
        let settings = RenderSettings {
            thermal_height: 0,
            ..RenderSettings::default()
        };
        assert_eq!(
            Layout::new(&settings, 128, 128),
            Err(ConfigError::EmptyDimension("thermal_height"))
        );
        assert_eq!(
            Layout::new(&RenderSettings::default(), 0, 128),
            Err(ConfigError::EmptyDimension("display width"))
        );
    }
}
