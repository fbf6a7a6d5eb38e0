// SPDX-License-Identifier: GPL-3.0-or-later
//! Lookup tables mapping a normalized value to a color.
use std::ops::Index;

use rayon::prelude::*;
use serde::Deserialize;

use crate::error::ConfigError;

use super::color::Color;

/// A control point for a palette built from Gaussian bumps.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub(crate) struct Anchor {
    /// Where the center of this anchor's bump is, from 0.0 to 1.0.
    pub(crate) position: f32,

    /// The peak contribution of this anchor to each channel.
    pub(crate) color: Color,
}

impl Anchor {
    pub(crate) const fn new(position: f32, color: Color) -> Self {
        Self { position, color }
    }
}

/// A black-blue-green-red-yellow-white ramp that reads well on small displays.
pub(crate) const DEFAULT_ANCHORS: [Anchor; 7] = [
    Anchor::new(0.0, Color::new(0, 0, 0)),
    Anchor::new(0.2, Color::new(0, 0, 128)),
    Anchor::new(0.4, Color::new(0, 128, 0)),
    Anchor::new(0.6, Color::new(128, 0, 0)),
    Anchor::new(0.8, Color::new(192, 192, 0)),
    Anchor::new(0.9, Color::new(255, 192, 0)),
    Anchor::new(1.0, Color::new(255, 255, 255)),
];

/// Check the parameters for [`build_palette`].
pub(crate) fn validate_anchors(
    anchors: &[Anchor],
    depth: usize,
    spread: f32,
) -> Result<(), ConfigError> {
    if anchors.is_empty() {
        return Err(ConfigError::EmptyAnchors);
    }
    if let Some(anchor) = anchors
        .iter()
        .find(|a| !(0.0..=1.0).contains(&a.position))
    {
        return Err(ConfigError::AnchorPosition(anchor.position));
    }
    if depth == 0 {
        return Err(ConfigError::ZeroColorDepth);
    }
    // Negated so NaN is caught as well
    if !(spread > 0.0) {
        return Err(ConfigError::InvalidSpread(spread));
    }
    Ok(())
}

fn gaussian(x: f64, amplitude: f64, center: f64, sigma: f64) -> f64 {
    amplitude * (-(x - center).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Build a palette of `depth` colors from a list of anchors.
///
/// Each channel of each entry is the sum of one Gaussian per anchor, with the anchor's channel
/// value as the amplitude, the anchor position (scaled to `depth`) as the center, and
/// `depth / (spread * anchors.len())` as the standard deviation. The sums are clamped to
/// `0-255` and truncated.
pub(crate) fn build_palette(
    anchors: &[Anchor],
    depth: usize,
    spread: f32,
) -> Result<Palette, ConfigError> {
    validate_anchors(anchors, depth, spread)?;
    let width = depth as f64;
    let sigma = width / (spread as f64 * anchors.len() as f64);
    let colors = (0..depth)
        .into_par_iter()
        .map(|index| {
            let x = index as f64;
            let mut sums = [0f64; 3];
            for anchor in anchors {
                let center = anchor.position as f64 * width;
                for (sum, amplitude) in sums.iter_mut().zip(anchor.color.as_array().iter()) {
                    *sum += gaussian(x, *amplitude as f64, center, sigma);
                }
            }
            let channels = sums.map(|sum| sum.max(0.0).min(255.0) as u8);
            Color::from(channels)
        })
        .collect();
    Ok(Palette(colors))
}

/// A fixed-size table of colors.
///
/// Index 0 is the color for the lowest value, and the last index the color for the highest value.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Palette(Vec<Color>);

impl Palette {
    /// Sample a [`colorous::Gradient`] evenly into a table of `depth` colors.
    pub(crate) fn from_gradient(
        gradient: colorous::Gradient,
        depth: usize,
    ) -> Result<Self, ConfigError> {
        if depth == 0 {
            return Err(ConfigError::ZeroColorDepth);
        }
        let last = (depth - 1).max(1) as f64;
        let colors = (0..depth)
            .map(|index| Color::from(gradient.eval_continuous(index as f64 / last)))
            .collect();
        Ok(Self(colors))
    }

    /// The number of colors in this palette.
    pub(crate) fn depth(&self) -> usize {
        self.0.len()
    }
}

impl Index<usize> for Palette {
    type Output = Color;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}
