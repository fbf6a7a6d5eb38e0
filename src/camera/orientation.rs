// SPDX-License-Identifier: GPL-3.0-or-later
use image::imageops;
use serde::Deserialize;
use serde_repr::Deserialize_repr;

use crate::error::ReadError;
use crate::image_buffer::ThermalImage;

use super::thermal_camera::ThermalCamera;

// This enum is purely used to restrict the acceptable values for rotation.
#[derive(Clone, Copy, Deserialize_repr, PartialEq, Debug)]
#[repr(u16)]
pub(crate) enum Rotation {
    Zero = 0,
    Ninety = 90,
    OneEighty = 180,
    TwoSeventy = 270,
}

impl Default for Rotation {
    fn default() -> Self {
        Self::Zero
    }
}

/// Corrections for how a camera is mounted.
#[derive(Clone, Copy, Default, Debug, PartialEq, Deserialize)]
pub(crate) struct Orientation {
    #[serde(default)]
    pub(crate) rotation: Rotation,

    #[serde(default)]
    pub(crate) flip_horizontal: bool,

    #[serde(default)]
    pub(crate) flip_vertical: bool,
}

impl Orientation {
    pub(crate) fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Flip the image, then rotate it clockwise.
    pub(crate) fn apply(&self, mut image: ThermalImage) -> ThermalImage {
        if self.flip_vertical {
            imageops::flip_vertical_in_place(&mut image);
        }
        if self.flip_horizontal {
            imageops::flip_horizontal_in_place(&mut image);
        }
        match self.rotation {
            Rotation::Zero => image,
            Rotation::Ninety => imageops::rotate90(&image),
            Rotation::OneEighty => {
                imageops::rotate180_in_place(&mut image);
                image
            }
            Rotation::TwoSeventy => imageops::rotate270(&image),
        }
    }
}

/// A camera with an [`Orientation`] applied to each frame.
#[derive(Debug)]
pub(crate) struct OrientedCamera<C> {
    camera: C,
    orientation: Orientation,
}

impl<C> OrientedCamera<C> {
    pub(crate) fn new(camera: C, orientation: Orientation) -> Self {
        Self {
            camera,
            orientation,
        }
    }
}

impl<C> ThermalCamera for OrientedCamera<C>
where
    C: ThermalCamera,
{
    fn get_frame(&mut self) -> Result<ThermalImage, ReadError> {
        self.camera
            .get_frame()
            .map(|image| self.orientation.apply(image))
    }
}
