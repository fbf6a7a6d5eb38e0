// SPDX-License-Identifier: GPL-3.0-or-later
use std::convert::TryFrom;
use std::sync::mpsc;
use std::thread::sleep as thread_sleep;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context as _};
use tracing::{debug, debug_span, info, trace, warn};

use crate::camera::ThermalCamera;
use crate::display::DisplaySink;
use crate::error::{ConfigError, ReadError};
use crate::image_buffer::ThermalImage;
use crate::render::{ColorMap, Compositor, FrameStats, Layout, OverlayFont};
use crate::settings::Settings;
use crate::util::RateEstimator;

mod settings;

pub(crate) use settings::AcquisitionSettings;

#[derive(Debug)]
pub(crate) enum Command {
    /// Stop the acquisition loop, then clear and release the display.
    Shutdown,
}

/// A pipeline built from a config file, with whichever camera and display it names.
pub(crate) type ConfiguredPipeline =
    Pipeline<Box<dyn ThermalCamera + Send>, Box<dyn DisplaySink + Send>>;

/// Reads frames from a camera, renders them, and shows them on a display.
pub(crate) struct Pipeline<C, D> {
    camera: C,
    display: D,
    color_map: ColorMap,
    compositor: Compositor,
    frame_rate: RateEstimator,
    throttle: Duration,
    max_consecutive_failures: Option<u32>,
    command_receiver: mpsc::Receiver<Command>,
    command_sender: mpsc::Sender<Command>,
}

impl ConfiguredPipeline {
    /// Check the configuration, then bring up the camera and display.
    ///
    /// Configuration problems are reported as a [`ConfigError`] before any hardware is touched.
    pub(crate) fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let color_map = ColorMap::try_from(&settings.render)?;
        let (canvas_width, canvas_height) = settings.display.size();
        let layout = Layout::new(&settings.render, canvas_width, canvas_height)?;
        settings.acquisition.validate()?;
        let font = OverlayFont::new(
            settings.render.font_path.as_deref(),
            settings.render.font_size,
        );
        debug!(custom_font = font.has_custom_font(), "loaded overlay font");
        let compositor = Compositor::new(layout, &settings.render, font);
        let camera = settings
            .camera
            .create_camera()
            .with_context(|| format!("Error configuring {} camera", settings.camera.kind()))?;
        let display = settings.display.create_sink();
        Ok(Self::new(
            camera,
            display,
            color_map,
            compositor,
            &settings.acquisition,
        )?)
    }
}

impl<C, D> Pipeline<C, D>
where
    C: ThermalCamera,
    D: DisplaySink,
{
    pub(crate) fn new(
        camera: C,
        display: D,
        color_map: ColorMap,
        compositor: Compositor,
        settings: &AcquisitionSettings,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let (command_sender, command_receiver) = mpsc::channel();
        Ok(Self {
            camera,
            display,
            color_map,
            compositor,
            frame_rate: RateEstimator::new(settings.smoothing_alpha, Instant::now()),
            throttle: settings.throttle(),
            max_consecutive_failures: settings.max_consecutive_failures,
            command_receiver,
            command_sender,
        })
    }

    pub(crate) fn command_channel(&self) -> mpsc::Sender<Command> {
        self.command_sender.clone()
    }

    /// Show frames until a [`Command::Shutdown`] is received or something fails.
    ///
    /// This is a blocking function. The display is cleared and shut down before returning, even
    /// when returning an error.
    pub(crate) fn run(mut self) -> anyhow::Result<()> {
        self.display
            .initialize()
            .context("Unable to initialize display")?;
        info!("starting acquisition loop");
        let result = self.acquisition_loop();
        let cleanup = self.release_display();
        match result {
            Ok(()) => cleanup,
            Err(err) => {
                if let Err(cleanup_err) = cleanup {
                    warn!(error = ?cleanup_err, "unable to clean up display after an error");
                }
                Err(err)
            }
        }
    }

    fn acquisition_loop(&mut self) -> anyhow::Result<()> {
        let mut consecutive_failures: u32 = 0;
        loop {
            if self.shutdown_requested() {
                info!("terminating acquisition loop");
                return Ok(());
            }
            let start = Instant::now();
            let image = match self.camera.get_frame() {
                Ok(image) => {
                    consecutive_failures = 0;
                    image
                }
                Err(ReadError::Transient(err)) => {
                    consecutive_failures = consecutive_failures.saturating_add(1);
                    debug!(consecutive_failures, error = %err, "skipping frame");
                    match self.max_consecutive_failures {
                        Some(limit) if consecutive_failures > limit => {
                            return Err(err.context(format!(
                                "Camera read failed {} times in a row",
                                consecutive_failures
                            )));
                        }
                        _ => continue,
                    }
                }
                Err(ReadError::Fatal(err)) => {
                    return Err(err.context("Unable to read from camera"));
                }
            };
            let fps = self.frame_rate.record(start);
            self.show_frame(&image, fps)?;
            trace!("Waiting {}us for the next frame", self.throttle.as_micros());
            thread_sleep(self.throttle);
        }
    }

    fn show_frame(&mut self, image: &ThermalImage, fps: f32) -> anyhow::Result<()> {
        let _span = debug_span!("frame", fps).entered();
        let stats = FrameStats::from_image(image);
        let colors = self.color_map.render(image);
        let canvas = self.compositor.compose(&colors, &stats, fps);
        self.display
            .present(&canvas)
            .context("Unable to show frame on display")
    }

    fn shutdown_requested(&self) -> bool {
        let mut requested = false;
        for cmd in self.command_receiver.try_iter() {
            match cmd {
                Command::Shutdown => requested = true,
            }
        }
        requested
    }

    fn release_display(&mut self) -> anyhow::Result<()> {
        // Shut down even if clearing fails.
        let cleared = self.display.clear().context("Unable to clear display");
        let shutdown = self
            .display
            .shutdown()
            .context("Unable to shut down display");
        match (cleared, shutdown) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(err), Ok(())) | (Ok(()), Err(err)) => Err(err),
            (Err(clear_err), Err(shutdown_err)) => Err(anyhow!(
                "{:#} (while shutting down: {:#})",
                clear_err,
                shutdown_err
            )),
        }
    }
}
