// SPDX-License-Identifier: GPL-3.0-or-later
use std::cmp::Ordering;
use std::convert::{From, TryFrom};
use std::str::FromStr;

use serde::Deserialize;

/// An 8-bit RGB color.
///
/// Colors can be compared for contrast using the WCAG 2.0 definitions of "relative luminance" and
/// "contrast ratio", which is how overlay text colors are chosen.
///
/// In configuration files a color is either a hex string (`"#c0c000"`, the leading `#` is
/// optional) or an array of three integers (`[192, 192, 0]`).
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "ColorValue")]
pub(crate) struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl From<[u8; 3]> for Color {
    fn from(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

impl From<colorous::Color> for Color {
    fn from(other_color: colorous::Color) -> Self {
        Self::new(other_color.r, other_color.g, other_color.b)
    }
}

impl From<Color> for image::Rgb<u8> {
    fn from(color: Color) -> Self {
        image::Rgb(color.as_array())
    }
}

impl FromStr for Color {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("colors must be six hexadecimal digits");
        }
        let channel = |start: usize| {
            u8::from_str_radix(&hex[start..start + 2], 16)
                .map_err(|_| "colors must be six hexadecimal digits")
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorValue {
    Hex(String),
    Array([u8; 3]),
}

impl TryFrom<ColorValue> for Color {
    type Error = &'static str;

    fn try_from(value: ColorValue) -> Result<Self, Self::Error> {
        match value {
            ColorValue::Hex(hex) => hex.parse(),
            ColorValue::Array(rgb) => Ok(rgb.into()),
        }
    }
}

impl Color {
    pub(crate) const BLACK: Self = Self {
        red: u8::MIN,
        green: u8::MIN,
        blue: u8::MIN,
    };

    pub(crate) const WHITE: Self = Self {
        red: u8::MAX,
        green: u8::MAX,
        blue: u8::MAX,
    };

    /// Create a new [Color] with the given 8-bit color values.
    pub(crate) const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// The channel values in red, green, blue order.
    pub(crate) fn as_array(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    /// The relative luminance of the color in the sRGB colorspace, as [defined by the
    /// W3C][w3c-lum].
    /// [w3c-lum]: https://www.w3.org/TR/2008/REC-WCAG20-20081211/#relativeluminancedef
    pub(crate) fn luminance(&self) -> f32 {
        let scaling_coefficients = [0.2126, 0.7152, 0.0722];
        self.as_array()
            .iter()
            .map(|c| {
                let c = *c as f32 / u8::MAX as f32;
                if c <= 0.04045 {
                    c / 12.92
                } else {
                    ((c + 0.055) / 1.055).powf(2.4)
                }
            })
            .zip(scaling_coefficients.iter())
            .map(|(l, r)| l * r)
            .sum()
    }

    /// Calculate the contrast ratio between this color and another one using the
    /// [W3C definition][w3c-contrast].
    /// [w3c-contrast]: https://www.w3.org/TR/WCAG20/#contrast-ratiodef
    pub(crate) fn contrast_ratio(&self, other: &Self) -> f32 {
        let other_lum = other.luminance();
        let lum = self.luminance();
        if other_lum > lum {
            (other_lum + 0.05) / (lum + 0.05)
        } else {
            (lum + 0.05) / (other_lum + 0.05)
        }
    }

    /// Treating this color as the background, pick either white or black, whichever has the
    /// better contrast.
    pub(crate) fn foreground_color(&self) -> Self {
        [Self::WHITE, Self::BLACK]
            .iter()
            .copied()
            .max_by(|l, r| {
                self.contrast_ratio(l)
                    .partial_cmp(&self.contrast_ratio(r))
                    .unwrap_or(Ordering::Equal)
            })
            .unwrap_or(Self::WHITE)
    }
}
