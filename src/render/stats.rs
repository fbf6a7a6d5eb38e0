// SPDX-License-Identifier: GPL-3.0-or-later
use crate::image_buffer::ThermalImage;
use crate::temperature::TemperatureUnit;

/// Summary values of a single frame, in Celsius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FrameStats {
    pub(crate) min: f32,
    pub(crate) max: f32,
    /// The temperature at column `width / 2`, row `height / 2`.
    pub(crate) center: f32,
}

impl FrameStats {
    pub(crate) fn from_image(image: &ThermalImage) -> Self {
        // f32::min and f32::max skip NaN
        let (min, max) = image
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), t| {
                (min.min(*t), max.max(*t))
            });
        let (width, height) = image.dimensions();
        let center_index = (height / 2) as usize * width as usize + (width / 2) as usize;
        let center = image
            .as_raw()
            .get(center_index)
            .copied()
            .unwrap_or(f32::NAN);
        Self { min, max, center }
    }

    /// The two lines of overlay text for this frame.
    pub(crate) fn overlay_lines(&self, fps: f32, unit: TemperatureUnit) -> [String; 2] {
        [
            format!(
                "min {:.1}{unit}  max {:.1}{unit}",
                unit.from_celsius(self.min),
                unit.from_celsius(self.max),
                unit = unit
            ),
            format!(
                "ctr {:.1}{unit}  {:.1} fps",
                unit.from_celsius(self.center),
                fps,
                unit = unit
            ),
        ]
    }
}
