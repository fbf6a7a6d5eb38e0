// SPDX-License-Identifier: GPL-3.0-or-later
use std::fmt;
use std::path::Path;

use image::GrayImage;
use tracing::{debug, warn};

use crate::error::RenderAssetError;

use super::cheese::FontdueRenderer;
use super::mono::MonoRenderer;

pub(crate) trait FontRenderer: fmt::Debug {
    /// Render one line of text onto an opacity mask `width` pixels wide and `height` pixels tall.
    ///
    /// The text starts in the top left corner of the mask, and anything past the edges of the
    /// mask is clipped.
    fn render_line(
        &self,
        text: &str,
        width: u32,
        height: u32,
    ) -> Result<GrayImage, RenderAssetError>;
}

/// The font used for overlay text, with the built-in bitmap font as a fallback.
#[derive(Debug)]
pub(crate) struct OverlayFont {
    primary: Option<Box<dyn FontRenderer + Send>>,
    fallback: MonoRenderer,
}

impl OverlayFont {
    /// Load the TrueType font at `font_path`, if given.
    ///
    /// If the font cannot be loaded a warning is logged and only the built-in font is used.
    pub(crate) fn new(font_path: Option<&Path>, font_size: f32) -> Self {
        let primary = font_path.and_then(|path| match FontdueRenderer::open(path, font_size) {
            Ok(renderer) => Some(Box::new(renderer) as Box<dyn FontRenderer + Send>),
            Err(err) => {
                warn!(?path, %err, "unable to load overlay font, using built-in font");
                None
            }
        });
        Self {
            primary,
            fallback: MonoRenderer::default(),
        }
    }

    /// Only use the built-in font.
    #[cfg(test)]
    pub(crate) fn builtin() -> Self {
        Self::new(None, 0.0)
    }

    pub(crate) fn has_custom_font(&self) -> bool {
        self.primary.is_some()
    }

    /// Render a line of text, falling back to the built-in font if the loaded font fails.
    pub(crate) fn render_line(&self, text: &str, width: u32, height: u32) -> GrayImage {
        if let Some(primary) = &self.primary {
            match primary.render_line(text, width, height) {
                Ok(mask) => return mask,
                Err(err) => debug!(%err, text, "rendering with built-in font instead"),
            }
        }
        self.fallback.draw_line(text, width, height)
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use image::GrayImage;

    use super::{FontRenderer, MonoRenderer, OverlayFont};
    use crate::error::RenderAssetError;

    #[derive(Debug)]
    struct NoGlyphs;

    impl FontRenderer for NoGlyphs {
        fn render_line(
            &self,
            text: &str,
            _width: u32,
            _height: u32,
        ) -> Result<GrayImage, RenderAssetError> {
            Err(RenderAssetError::MissingGlyph(
                text.chars().next().unwrap_or(' '),
            ))
        }
    }

    fn coverage(font: &OverlayFont) -> usize {
        font.render_line("min 20.0C", 100, 16)
            .pixels()
            .filter(|p| p.0[0] != 0)
            .count()
    }

    #[test]
    fn missing_font_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.ttf");
        let font = OverlayFont::new(Some(&path), 14.0);
        assert!(!font.has_custom_font());
        assert!(coverage(&font) > 0);
    }

    #[test]
    fn unparsable_font_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a TrueType font").unwrap();
        let font = OverlayFont::new(Some(file.path()), 14.0);
        assert!(!font.has_custom_font());
        assert!(coverage(&font) > 0);
    }

    #[test]
    fn builtin_mask_size() {
        let font = OverlayFont::builtin();
        let mask = font.render_line("ctr 35.0C  4.0 fps", 126, 16);
        assert_eq!(mask.dimensions(), (126, 16));
    }

    #[test]
    fn glyph_failure_uses_builtin_font() {
        let font = OverlayFont {
            primary: Some(Box::new(NoGlyphs)),
            fallback: MonoRenderer::default(),
        };
        assert!(font.has_custom_font());
        let text = "max 50.0C";
        let mask = font.render_line(text, 100, 16);
        assert_eq!(mask, MonoRenderer::default().draw_line(text, 100, 16));
        assert!(mask.pixels().any(|p| p.0[0] != 0));
    }
}
