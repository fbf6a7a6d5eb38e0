// SPDX-License-Identifier: GPL-3.0-or-later
//! TrueType overlay text, rasterized with [fontdue].
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use fontdue::{Font, FontSettings};
use image::imageops::overlay;
use image::{GrayImage, ImageBuffer};
use tracing::trace;

use super::font::FontRenderer;
use crate::error::RenderAssetError;

pub(crate) struct FontdueRenderer {
    font: Font,
    size: f32,
    layout: Mutex<Layout>,
}

impl FontdueRenderer {
    /// Load a TrueType or OpenType font from a file.
    pub(crate) fn open(path: &Path, size: f32) -> Result<Self, RenderAssetError> {
        let data = fs::read(path)
            .map_err(|err| RenderAssetError::Font(format!("{}: {}", path.display(), err)))?;
        Self::from_bytes(&data, size)
    }

    pub(crate) fn from_bytes(data: &[u8], size: f32) -> Result<Self, RenderAssetError> {
        let settings = FontSettings {
            scale: size,
            ..FontSettings::default()
        };
        let font =
            Font::from_bytes(data, settings).map_err(|err| RenderAssetError::Font(err.into()))?;
        Ok(Self {
            font,
            size,
            layout: Mutex::new(Layout::new(CoordinateSystem::PositiveYDown)),
        })
    }

    fn check_glyphs(&self, text: &str) -> Result<(), RenderAssetError> {
        // Glyph index 0 is the "missing glyph" glyph.
        match text
            .chars()
            .filter(|c| !c.is_whitespace())
            .find(|c| self.font.lookup_glyph_index(*c) == 0)
        {
            Some(missing) => Err(RenderAssetError::MissingGlyph(missing)),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for FontdueRenderer {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        // fontdue's Layout isn't Debug
        fmt.debug_struct("FontdueRenderer")
            .field("font", &self.font)
            .field("size", &self.size)
            .field("layout", &"Mutex<Layout{{ opaque }}>")
            .finish()
    }
}

impl FontRenderer for FontdueRenderer {
    fn render_line(
        &self,
        text: &str,
        width: u32,
        height: u32,
    ) -> Result<GrayImage, RenderAssetError> {
        self.check_glyphs(text)?;
        let mut layout = self
            .layout
            .lock()
            .map_err(|_| RenderAssetError::Font("text layout lock poisoned".to_string()))?;
        // Reset the fontdue context to a known default
        layout.reset(&LayoutSettings {
            x: 0.0,
            y: 0.0,
            max_width: Some(width as f32),
            max_height: Some(height as f32),
            ..LayoutSettings::default()
        });
        layout.append(&[&self.font], &TextStyle::new(text, self.size, 0));
        // Transfer the rasterized glyphs from fontdue onto an image mask. The mask is just the
        // opacity for each pixel.
        let mut mask = GrayImage::new(width, height);
        for glyph in layout.glyphs().iter() {
            let (metrics, bitmap) = self.font.rasterize_config(glyph.key);
            let bitmap: Option<GrayImage> =
                ImageBuffer::from_vec(metrics.width as u32, metrics.height as u32, bitmap);
            if let Some(bitmap) = bitmap {
                overlay(&mut mask, &bitmap, glyph.x as u32, glyph.y as u32);
            }
        }
        trace!(text, width, height, "rendered text with fontdue");
        Ok(mask)
    }
}

#[cfg(test)]
mod test {
    use super::FontdueRenderer;
    use crate::error::RenderAssetError;

    #[test]
    fn garbage_font() {
        let loaded = FontdueRenderer::from_bytes(&[0u8; 64], 14.0);
        assert!(matches!(loaded, Err(RenderAssetError::Font(_))));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = FontdueRenderer::open(&dir.path().join("nope.ttf"), 14.0);
        match loaded {
            Err(RenderAssetError::Font(reason)) => assert!(reason.contains("nope.ttf")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
