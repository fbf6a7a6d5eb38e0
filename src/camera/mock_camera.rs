// SPDX-License-Identifier: GPL-3.0-or-later
use std::convert::TryFrom;
use std::fmt;
use std::fs;
use std::path::Path;
use std::thread::sleep as thread_sleep;
use std::time::Duration;

use anyhow::{anyhow, Context as _};
use serde::Deserialize;
use tracing::trace;

use crate::error::ReadError;
use crate::image_buffer::ThermalImage;

use super::thermal_camera::ThermalCamera;

/// The fields of a recorded frame, as they're written in a recording file.
#[derive(Deserialize)]
struct FrameFields {
    #[serde(default)]
    width: u32,

    #[serde(default)]
    height: u32,

    #[serde(default)]
    values: Vec<f32>,

    /// Instead of an image, this frame is a failed read.
    #[serde(default)]
    error: bool,
}

/// A single entry in a recording.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(try_from = "FrameFields")]
pub(crate) enum MockFrame {
    Image(ThermalImage),

    /// Replayed as a transient read error.
    Failure,
}

impl TryFrom<FrameFields> for MockFrame {
    type Error = String;

    fn try_from(fields: FrameFields) -> Result<Self, Self::Error> {
        if fields.error {
            return Ok(Self::Failure);
        }
        let expected_length = fields.width as usize * fields.height as usize;
        if expected_length == 0 || fields.values.len() != expected_length {
            return Err(format!(
                "a {}x{} frame needs {} values, but {} were given",
                fields.width,
                fields.height,
                expected_length,
                fields.values.len()
            ));
        }
        ThermalImage::from_vec(fields.width, fields.height, fields.values)
            .map(Self::Image)
            .ok_or_else(|| "Image buffer was not large enough".to_string())
    }
}

#[derive(Deserialize)]
struct Recording {
    frames: Vec<MockFrame>,
}

/// Controls how frames are repeated by [`MockCamera`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum RepeatMode {
    /// Don't repeat.
    ///
    /// Once the end of the recording has been reached, a fatal error is returned.
    None,

    /// Loop over the frames. This is the default mode.
    Loop,

    /// Alternate between forward and reverse playback.
    ///
    /// The frames at either end of the recording are *not* repeated.
    Bounce,
}

impl Default for RepeatMode {
    fn default() -> Self {
        Self::Loop
    }
}

/// A camera that replays frames from a recording.
pub(crate) struct MockCamera {
    frames: Vec<MockFrame>,
    index: Box<dyn Iterator<Item = usize> + Send + Sync>,
    frame_delay: Duration,
}

impl MockCamera {
    pub(crate) fn new(frames: Vec<MockFrame>, repeat: RepeatMode) -> Self {
        let num_frames = frames.len();
        let index: Box<dyn Iterator<Item = usize> + Send + Sync> = match repeat {
            RepeatMode::None => Box::new(0..num_frames),
            RepeatMode::Loop => Box::new((0..num_frames).cycle()),
            RepeatMode::Bounce => {
                let forwards = 0..num_frames;
                let backwards = (1..num_frames.saturating_sub(1)).rev();
                Box::new(forwards.chain(backwards).cycle())
            }
        };
        Self {
            frames,
            index,
            frame_delay: Duration::ZERO,
        }
    }

    /// Load a recording from a TOML file.
    ///
    /// The file has an array of `frames` tables, each with `width`, `height` and a row-major
    /// list of `values`, or just `error = true` for a failed read.
    pub(crate) fn open(path: &Path, repeat: RepeatMode) -> anyhow::Result<Self> {
        let data_string = fs::read_to_string(path)
            .with_context(|| format!("Unable to read mock camera data from {}", path.display()))?;
        let recording: Recording =
            toml::from_str(&data_string).context("Invalid mock camera recording")?;
        Ok(Self::new(recording.frames, repeat))
    }

    /// Wait between frames the way a real camera running at `frame_rate` would.
    ///
    /// A frame rate of zero disables the wait.
    pub(crate) fn with_frame_rate(mut self, frame_rate: f32) -> anyhow::Result<Self> {
        self.frame_delay = if frame_rate == 0.0 {
            Duration::ZERO
        } else {
            Duration::try_from_secs_f32(frame_rate.recip())
                .map_err(|_| anyhow!("invalid mock camera frame rate ({})", frame_rate))?
        };
        Ok(self)
    }
}

impl fmt::Debug for MockCamera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockCamera")
            .field("frames", &self.frames.len())
            .field("frame_delay", &self.frame_delay)
            .finish()
    }
}

impl ThermalCamera for MockCamera {
    fn get_frame(&mut self) -> Result<ThermalImage, ReadError> {
        let index = self
            .index
            .next()
            .ok_or_else(|| ReadError::fatal(anyhow!("No more frames in recording")))?;
        if !self.frame_delay.is_zero() {
            trace!(delay = ?self.frame_delay, "Waiting for the next mock frame");
            thread_sleep(self.frame_delay);
        }
        match &self.frames[index] {
            MockFrame::Image(image) => Ok(image.clone()),
            MockFrame::Failure => Err(ReadError::transient(anyhow!(
                "Recorded read failure (frame {})",
                index
            ))),
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;
    use std::time::Duration;

    use image::Luma;

    use super::{MockCamera, MockFrame, RepeatMode};
    use crate::camera::thermal_camera::ThermalCamera;
    use crate::error::ReadError;
    use crate::image_buffer::ThermalImage;

    const START_IMAGE_TEMP: f32 = 20.0;

    const NUM_TINY_FRAMES: usize = 10;

    fn tiny_frames() -> Vec<MockFrame> {
        (0..NUM_TINY_FRAMES)
            .map(|offset| {
                let image = ThermalImage::from_pixel(1, 1, Luma([START_IMAGE_TEMP + offset as f32]));
                MockFrame::Image(image)
            })
            .collect()
    }

    fn assert_frames(repeat_mode: RepeatMode, image_temps: &[f32]) {
        let mut cam = MockCamera::new(tiny_frames(), repeat_mode);
        let frames: Vec<ThermalImage> = std::iter::from_fn(move || cam.get_frame().ok())
            .fuse()
            .take(30)
            .collect();
        let actual_image_temps: Vec<f32> = frames.iter().map(|image| image[(0, 0)].0[0]).collect();
        assert_eq!(
            &actual_image_temps[..],
            image_temps,
            "image temperatures do not match"
        );
    }

    #[test]
    fn repeat_none() {
        let expected = [20.0, 21.0, 22.0, 23.0, 24.0, 25.0, 26.0, 27.0, 28.0, 29.0];
        assert_frames(RepeatMode::None, &expected[..])
    }

    #[test]
    fn repeat_none_is_fatal() {
        let mut cam = MockCamera::new(tiny_frames(), RepeatMode::None);
        for _ in 0..NUM_TINY_FRAMES {
            assert!(cam.get_frame().is_ok());
        }
        let end = cam.get_frame();
        assert!(matches!(end, Err(ReadError::Fatal(_))));
    }

    #[test]
    fn repeat_loop() {
        let expected: Vec<f32> = (0..30).map(|n| 20.0 + (n % 10) as f32).collect();
        assert_frames(RepeatMode::Loop, &expected[..])
    }

    #[test]
    fn repeat_bounce() {
        // NOTE: bounce does *not* repeat each end of the loop
        let expected = [
            20.0, 21.0, 22.0, 23.0, 24.0, 25.0, 26.0, 27.0, 28.0, 29.0, 28.0, 27.0, 26.0, 25.0,
            24.0, 23.0, 22.0, 21.0, 20.0, 21.0, 22.0, 23.0, 24.0, 25.0, 26.0, 27.0, 28.0, 29.0,
            28.0, 27.0,
        ];
        assert_frames(RepeatMode::Bounce, &expected[..])
    }

    #[test]
    fn recording_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let source = r#"
        [[frames]]
        width = 2
        height = 2
        values = [20.0, 21.0, 22.5, 23.0]

        [[frames]]
        error = true
        "#;
        file.write_all(source.as_bytes()).unwrap();
        let mut cam = MockCamera::open(file.path(), RepeatMode::Loop).unwrap();
        let first = cam.get_frame().unwrap();
        assert_eq!(first.dimensions(), (2, 2));
        assert_eq!(first[(0, 1)].0[0], 22.5);
        let second = cam.get_frame();
        assert!(matches!(second, Err(ReadError::Transient(_))));
        assert!(cam.get_frame().is_ok());
    }

    #[test]
    fn mismatched_dimensions() {
        let source = r#"
        [[frames]]
        width = 3
        height = 2
        values = [20.0, 21.0]
        "#;
        let parsed: Result<super::Recording, _> = toml::from_str(source);
        assert!(parsed.is_err());
    }

    #[test]
    fn frame_rate_delay() {
        let camera = MockCamera::new(tiny_frames(), RepeatMode::Loop);
        let camera = camera.with_frame_rate(4.0).unwrap();
        assert_eq!(camera.frame_delay, Duration::from_millis(250));
        let camera = camera.with_frame_rate(0.0).unwrap();
        assert_eq!(camera.frame_delay, Duration::ZERO);
        for bad_rate in [1.0e-40, -2.0, f32::NAN] {
            let camera = MockCamera::new(tiny_frames(), RepeatMode::Loop);
            assert!(camera.with_frame_rate(bad_rate).is_err(), "{}", bad_rate);
        }
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let opened = MockCamera::open(&dir.path().join("missing.toml"), RepeatMode::Loop);
        assert!(opened.is_err());
    }
}
