// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::settings::gradient::GradientName;
use crate::temperature::{Temperature, TemperatureUnit};

use super::color::Color;
use super::palette::{build_palette, Anchor, Palette, DEFAULT_ANCHORS};
use super::resize::Method;

fn default_lower_limit() -> Temperature {
    Temperature::Celsius(20.0)
}

fn default_upper_limit() -> Temperature {
    Temperature::Celsius(50.0)
}

fn default_color_depth() -> usize {
    1000
}

fn default_spread() -> f32 {
    1.0
}

fn default_thermal_width() -> u32 {
    128
}

fn default_thermal_height() -> u32 {
    96
}

fn default_text_x() -> u32 {
    2
}

fn default_line_spacing() -> u32 {
    16
}

fn default_font_size() -> f32 {
    14.0
}

/// Where palette colors come from.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub(crate) enum PaletteSettings {
    /// A named gradient from [`colorous`], like `"turbo"` or `"inferno"`.
    Gradient(GradientName),

    /// A list of anchors, each contributing a Gaussian bump of color.
    Anchors(Vec<Anchor>),
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self::Anchors(DEFAULT_ANCHORS.to_vec())
    }
}

impl PaletteSettings {
    pub(crate) fn build(&self, depth: usize, spread: f32) -> Result<Palette, ConfigError> {
        match self {
            Self::Gradient(name) => Palette::from_gradient(name.gradient(), depth),
            Self::Anchors(anchors) => build_palette(anchors, depth, spread),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub(crate) struct RenderSettings {
    /// The temperature mapped to the first palette color.
    #[serde(default = "default_lower_limit")]
    pub(crate) lower_limit: Temperature,

    /// The temperature mapped to the last palette color.
    #[serde(default = "default_upper_limit")]
    pub(crate) upper_limit: Temperature,

    /// The number of colors in the palette.
    #[serde(default = "default_color_depth")]
    pub(crate) color_depth: usize,

    /// How wide each anchor's bump is. Larger values make narrower bumps.
    #[serde(default = "default_spread")]
    pub(crate) spread: f32,

    #[serde(default)]
    pub(crate) palette: PaletteSettings,

    /// The units temperatures are shown in on the overlay.
    #[serde(default)]
    pub(crate) units: TemperatureUnit,

    /// The size the thermal image is scaled to.
    #[serde(default = "default_thermal_width")]
    pub(crate) thermal_width: u32,

    #[serde(default = "default_thermal_height")]
    pub(crate) thermal_height: u32,

    /// How the thermal image is scaled. Defaults to nearest neighbor.
    #[serde(default)]
    pub(crate) scaling_method: Method,

    /// Where the thermal image is placed on the display.
    #[serde(default)]
    pub(crate) offset_x: u32,

    #[serde(default)]
    pub(crate) offset_y: u32,

    /// The color of the display not covered by the thermal image.
    #[serde(default)]
    pub(crate) background: Color,

    /// The top left of the first line of overlay text.
    #[serde(default = "default_text_x")]
    pub(crate) text_x: u32,

    /// Defaults to just below the thermal image.
    #[serde(default)]
    pub(crate) text_y: Option<u32>,

    /// The distance between the tops of the overlay lines.
    #[serde(default = "default_line_spacing")]
    pub(crate) line_spacing: u32,

    /// A TrueType font for the overlay. The built-in font is used if not given, or if it can't be
    /// loaded.
    #[serde(default)]
    pub(crate) font_path: Option<PathBuf>,

    #[serde(default = "default_font_size")]
    pub(crate) font_size: f32,
}

impl RenderSettings {
    pub(crate) fn text_origin(&self) -> (u32, u32) {
        let y = self
            .text_y
            .unwrap_or_else(|| {
                self.offset_y
                    .saturating_add(self.thermal_height)
                    .saturating_add(2)
            });
        (self.text_x, y)
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            lower_limit: default_lower_limit(),
            upper_limit: default_upper_limit(),
            color_depth: default_color_depth(),
            spread: default_spread(),
            palette: PaletteSettings::default(),
            units: TemperatureUnit::default(),
            thermal_width: default_thermal_width(),
            thermal_height: default_thermal_height(),
            scaling_method: Method::default(),
            offset_x: 0,
            offset_y: 0,
            background: Color::BLACK,
            text_x: default_text_x(),
            text_y: None,
            line_spacing: default_line_spacing(),
            font_path: None,
            font_size: default_font_size(),
        }
    }
}
