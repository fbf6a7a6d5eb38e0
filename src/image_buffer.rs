// SPDX-License-Identifier: GPL-3.0-or-later
use image::{ImageBuffer, Luma, RgbImage};

/// Images where each point is a temperature in degrees Celsius.
pub(crate) type ThermalImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// A thermal image after each temperature has been mapped to a color. Same dimensions as the
/// [`ThermalImage`] it came from.
pub(crate) type ColorGrid = RgbImage;

/// The full image sent to a display.
pub(crate) type Canvas = RgbImage;
