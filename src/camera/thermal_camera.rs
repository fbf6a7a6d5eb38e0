// SPDX-License-Identifier: GPL-3.0-or-later
use std::error::Error as StdError;
use std::ops::RangeInclusive;

use anyhow::{anyhow, Context as _};
use embedded_hal::blocking::i2c;
use image::flat::{FlatSamples, SampleLayout};
use image::imageops;
use tracing::{debug, trace};

use crate::error::ReadError;
use crate::image_buffer::ThermalImage;

/// The range of temperatures (in Celsius) the Melexis cameras can measure. Anything outside of
/// this is from a bad read.
const MELEXIS_RANGE: RangeInclusive<f32> = -40.0..=300.0;

/// The operations a thermal camera needs to have to be used by thermal-viewer.
pub(crate) trait ThermalCamera {
    /// Read the next frame from the camera.
    ///
    /// The image is in Celsius, with the first row at the top of the scene. Frames with garbage
    /// data are [`ReadError::Transient`], while bus and driver errors are [`ReadError::Fatal`].
    fn get_frame(&mut self) -> Result<ThermalImage, ReadError>;
}

impl<C> ThermalCamera for Box<C>
where
    C: ThermalCamera + ?Sized,
{
    fn get_frame(&mut self) -> Result<ThermalImage, ReadError> {
        (**self).get_frame()
    }
}

/// Reject frames with values a camera can't produce.
fn check_range(
    image: ThermalImage,
    range: &RangeInclusive<f32>,
) -> Result<ThermalImage, ReadError> {
    match image.iter().find(|t| !range.contains(*t)).copied() {
        Some(bad_value) => Err(ReadError::transient(anyhow!(
            "camera returned an impossible temperature ({})",
            bad_value
        ))),
        None => Ok(image),
    }
}

impl<I2C> ThermalCamera for amg88::GridEye<I2C>
where
    I2C: i2c::WriteRead,
    <I2C as i2c::WriteRead>::Error: 'static + StdError + Sync + Send,
{
    fn get_frame(&mut self) -> Result<ThermalImage, ReadError> {
        let grid = self
            .image()
            .context("Unable to read frame from GridEye")
            .map_err(ReadError::Fatal)?;
        let (row_count, col_count) = grid.dim();
        let height = row_count as u32;
        let width = col_count as u32;
        // Force the layout to row-major. If it's already in that order, this is a noop
        // (and it *should* be in row-major order already).
        let grid = if grid.is_standard_layout() {
            grid
        } else {
            debug!("Reversing thermal image axes (not expected normally)");
            grid.reversed_axes()
        };
        let layout = SampleLayout::row_major_packed(1, width, height);
        let buffer_image = FlatSamples {
            samples: grid.into_raw_vec(),
            layout,
            color_hint: None,
        };
        let mut image: ThermalImage = buffer_image
            .try_into_buffer()
            // try_into_buffer uses a 2-tuple as the error type, with the actual Error being the
            // first item in the tuple.
            .map_err(|e| e.0)
            .context("Unable to convert 2D array into an ImageBuffer")
            .map_err(ReadError::Fatal)?;
        // The GridEye's Y-axis points up.
        imageops::flip_vertical_in_place(&mut image);
        Ok(image)
    }
}

/// Implement [`ThermalCamera`] for a wrapper around one of the [`mlx9064x`] drivers.
macro_rules! melexis_camera {
    ($name:ident, $driver:ident, $model:literal) => {
        #[derive(Debug)]
        pub(crate) struct $name<I2C> {
            camera: mlx9064x::$driver<I2C>,
            temperature_buffer: Vec<f32>,
        }

        impl<I2C> $name<I2C>
        where
            I2C: 'static + i2c::WriteRead + i2c::Write,
            <I2C as i2c::WriteRead>::Error: 'static + StdError + Sync + Send,
            <I2C as i2c::Write>::Error: 'static + StdError + Sync + Send,
        {
            pub(crate) fn new(
                bus: I2C,
                address: u8,
                frame_rate: mlx9064x::FrameRate,
            ) -> anyhow::Result<Self> {
                let mut camera = mlx9064x::$driver::new(bus, address)
                    .context(concat!("Unable to initialize ", $model))?;
                camera
                    .set_frame_rate(frame_rate)
                    .context("Error setting camera frame rate")?;
                let num_pixels = camera.height() * camera.width();
                Ok(Self {
                    camera,
                    temperature_buffer: vec![0f32; num_pixels],
                })
            }
        }

        impl<I2C> ThermalCamera for $name<I2C>
        where
            I2C: 'static + i2c::WriteRead + i2c::Write,
            <I2C as i2c::WriteRead>::Error: 'static + StdError + Sync + Send,
            <I2C as i2c::Write>::Error: 'static + StdError + Sync + Send,
        {
            fn get_frame(&mut self) -> Result<ThermalImage, ReadError> {
                // Blocks until the camera has a new frame ready.
                self.camera
                    .generate_image_to(&mut self.temperature_buffer)
                    .context(concat!("Unable to read frame from ", $model))
                    .map_err(ReadError::Fatal)?;
                // mlx9064x uses row-major ordering, so no swapping needed here.
                let layout = SampleLayout::row_major_packed(
                    1,
                    self.camera.width() as u32,
                    self.camera.height() as u32,
                );
                let buffer_image = FlatSamples {
                    samples: self.temperature_buffer.clone(),
                    layout,
                    color_hint: None,
                };
                let image = buffer_image
                    .try_into_buffer()
                    .map_err(|e| e.0)
                    .context(concat!(
                        "Unable to convert ",
                        $model,
                        " scratch buffer into an ImageBuffer"
                    ))
                    .map_err(ReadError::Fatal)?;
                trace!(model = $model, "read frame");
                check_range(image, &MELEXIS_RANGE)
            }
        }
    };
}

melexis_camera!(Mlx90640, Mlx90640Driver, "MLX90640");
melexis_camera!(Mlx90641, Mlx90641Driver, "MLX90641");
