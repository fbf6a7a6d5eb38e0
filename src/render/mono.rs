// SPDX-License-Identifier: GPL-3.0-or-later
//! The built-in bitmap font, drawn with [embedded_graphics].
use std::convert::{Infallible, TryFrom};

use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use image::{GrayImage, Luma};

use super::font::FontRenderer;
use crate::error::RenderAssetError;

/// Adapts a mask image so embedded-graphics can draw on it.
struct MaskTarget<'a>(&'a mut GrayImage);

impl OriginDimensions for MaskTarget<'_> {
    fn size(&self) -> Size {
        Size::new(self.0.width(), self.0.height())
    }
}

impl DrawTarget for MaskTarget<'_> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if !color.is_on() {
                continue;
            }
            if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) {
                if x < self.0.width() && y < self.0.height() {
                    self.0.put_pixel(x, y, Luma([u8::MAX]));
                }
            }
        }
        Ok(())
    }
}

/// A fixed 6x10 pixel ASCII font. Characters outside of ASCII are drawn as '?'.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct MonoRenderer;

impl MonoRenderer {
    pub(crate) fn draw_line(&self, text: &str, width: u32, height: u32) -> GrayImage {
        let mut mask = GrayImage::new(width, height);
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        Text::with_baseline(text, Point::zero(), style, Baseline::Top)
            .draw(&mut MaskTarget(&mut mask))
            .unwrap_or_else(|never| match never {});
        mask
    }
}

impl FontRenderer for MonoRenderer {
    fn render_line(
        &self,
        text: &str,
        width: u32,
        height: u32,
    ) -> Result<GrayImage, RenderAssetError> {
        Ok(self.draw_line(text, width, height))
    }
}

#[cfg(test)]
mod test {
    use super::MonoRenderer;
    use crate::render::font::FontRenderer;

    #[test]
    fn draws_in_first_rows() {
        let mask = MonoRenderer.draw_line("88.8", 40, 16);
        let lit: Vec<(u32, u32)> = mask
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] == u8::MAX)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!lit.is_empty());
        // Four 6 pixel wide characters, 10 pixels tall
        assert!(lit.iter().all(|(x, y)| *x < 24 && *y < 10));
    }

    #[test]
    fn clipped() {
        let mask = MonoRenderer.draw_line("a very long line of text", 12, 4);
        assert_eq!(mask.dimensions(), (12, 4));
    }

    #[test]
    fn as_font_renderer() {
        let renderer: &dyn FontRenderer = &MonoRenderer;
        let mask = renderer.render_line("ctr 36.3C", 64, 16).unwrap();
        assert_eq!(mask, MonoRenderer.draw_line("ctr 36.3C", 64, 16));
    }

    #[test]
    fn blank() {
        let mask = MonoRenderer.draw_line("   ", 30, 10);
        assert!(mask.pixels().all(|p| p.0[0] == 0));
    }
}
