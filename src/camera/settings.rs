// SPDX-License-Identifier: GPL-3.0-or-later
use std::convert::TryFrom;
use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;

use anyhow::Context as _;
use linux_embedded_hal::I2cdev;
use serde::de::{Deserialize, Deserializer, Error};

use super::i2c::Bus;
use super::mock_camera::{MockCamera, RepeatMode};
use super::orientation::{OrientedCamera, Orientation};
use super::thermal_camera::{self, ThermalCamera};

fn default_grideye_frame_rate() -> amg88::FrameRateValue {
    amg88::FrameRateValue::Fps10
}

fn default_melexis_frame_rate() -> mlx9064x::FrameRate {
    mlx9064x::FrameRate::Four
}

fn default_melexis_address() -> u8 {
    0x33
}

struct TryFromNum<U>(PhantomData<U>);

impl<U> TryFromNum<U> {
    pub(super) fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<U>,
        <T as TryFrom<U>>::Error: fmt::Display,
        U: Deserialize<'de>,
    {
        let value: U = U::deserialize(deserializer)?;
        T::try_from(value).map_err(|err| D::Error::custom(err))
    }
}

type TryFromU8 = TryFromNum<u8>;

/// GridEye frame rates are given in frames per second, not as register values.
fn deserialize_grideye_frame_rate<'de, D>(
    deserializer: D,
) -> Result<amg88::FrameRateValue, D::Error>
where
    D: Deserializer<'de>,
{
    match u8::deserialize(deserializer)? {
        1 => Ok(amg88::FrameRateValue::Fps1),
        10 => Ok(amg88::FrameRateValue::Fps10),
        other => Err(D::Error::custom(format!(
            "GridEye frame rate must be 1 or 10, not {}",
            other
        ))),
    }
}
type TryFromF32 = TryFromNum<f32>;

#[derive(Clone, Debug, serde::Deserialize, PartialEq)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub(crate) enum CameraSettings {
    GridEye {
        bus: Bus,

        #[serde(deserialize_with = "TryFromU8::deserialize")]
        address: amg88::Address,

        #[serde(
            default = "default_grideye_frame_rate",
            deserialize_with = "deserialize_grideye_frame_rate"
        )]
        frame_rate: amg88::FrameRateValue,

        #[serde(flatten)]
        orientation: Orientation,
    },
    Mlx90640 {
        bus: Bus,

        #[serde(default = "default_melexis_address")]
        address: u8,

        #[serde(
            default = "default_melexis_frame_rate",
            deserialize_with = "TryFromF32::deserialize"
        )]
        frame_rate: mlx9064x::FrameRate,

        #[serde(flatten)]
        orientation: Orientation,
    },
    Mlx90641 {
        bus: Bus,

        #[serde(default = "default_melexis_address")]
        address: u8,

        #[serde(
            default = "default_melexis_frame_rate",
            deserialize_with = "TryFromF32::deserialize"
        )]
        frame_rate: mlx9064x::FrameRate,

        #[serde(flatten)]
        orientation: Orientation,
    },
    /// Replay frames from a file instead of using real hardware.
    Mock {
        path: PathBuf,

        #[serde(default)]
        repeat_mode: RepeatMode,

        /// Frames per second to replay at. Zero (the default) replays as fast as possible.
        #[serde(default)]
        frame_rate: f32,

        #[serde(flatten)]
        orientation: Orientation,
    },
}

impl CameraSettings {
    /// A list of the different camera kind identifiers
    pub(crate) const KINDS: &'static [&'static str] = &["grideye", "mlx90640", "mlx90641", "mock"];

    /// The requested orientation corrections for the image.
    pub(crate) fn orientation(&self) -> Orientation {
        match self {
            Self::GridEye { orientation, .. } => *orientation,
            Self::Mlx90640 { orientation, .. } => *orientation,
            Self::Mlx90641 { orientation, .. } => *orientation,
            Self::Mock { orientation, .. } => *orientation,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::GridEye { .. } => Self::KINDS[0],
            Self::Mlx90640 { .. } => Self::KINDS[1],
            Self::Mlx90641 { .. } => Self::KINDS[2],
            Self::Mock { .. } => Self::KINDS[3],
        }
    }

    /// If the camera is connected over I2C, this method creates the [I2cdev] for that bus.
    ///
    /// If the camera does not use I2C, this method returns `None`.
    fn i2c_bus(&self) -> Option<anyhow::Result<I2cdev>> {
        match self {
            Self::GridEye { bus, .. } => Some(bus),
            Self::Mlx90640 { bus, .. } => Some(bus),
            Self::Mlx90641 { bus, .. } => Some(bus),
            Self::Mock { .. } => None,
        }
        .map(|bus| I2cdev::try_from(bus).context("Unable to connect to I2C bus"))
    }

    fn open_bus(&self) -> anyhow::Result<I2cdev> {
        self.i2c_bus()
            .unwrap_or_else(|| Err(anyhow::anyhow!("{} cameras do not use I2C", self.kind())))
    }

    /// Bring up the camera, with its frame rate set and orientation corrections applied.
    pub(crate) fn create_camera(&self) -> anyhow::Result<Box<dyn ThermalCamera + Send>> {
        let camera: Box<dyn ThermalCamera + Send> = match self {
            Self::GridEye {
                address,
                frame_rate,
                ..
            } => {
                let mut camera = amg88::GridEye::new(self.open_bus()?, *address);
                camera
                    .set_frame_rate(*frame_rate)
                    .context("Error setting camera frame rate")?;
                Box::new(camera)
            }
            Self::Mlx90640 {
                address,
                frame_rate,
                ..
            } => Box::new(thermal_camera::Mlx90640::new(
                self.open_bus()?,
                *address,
                *frame_rate,
            )?),
            Self::Mlx90641 {
                address,
                frame_rate,
                ..
            } => Box::new(thermal_camera::Mlx90641::new(
                self.open_bus()?,
                *address,
                *frame_rate,
            )?),
            Self::Mock {
                path,
                repeat_mode,
                frame_rate,
                ..
            } => Box::new(MockCamera::open(path, *repeat_mode)?.with_frame_rate(*frame_rate)?),
        };
        let orientation = self.orientation();
        if orientation.is_identity() {
            Ok(camera)
        } else {
            Ok(Box::new(OrientedCamera::new(camera, orientation)))
        }
    }
}
