// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::PathBuf;

use serde::Deserialize;

use super::framebuffer::{Framebuffer, PixelFormat};
use super::{DisplaySink, NullDisplay};

fn default_framebuffer_path() -> PathBuf {
    PathBuf::from("/dev/fb1")
}

fn default_display_size() -> u32 {
    128
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub(crate) enum DisplaySettings {
    Framebuffer {
        #[serde(default = "default_framebuffer_path")]
        path: PathBuf,

        #[serde(default = "default_display_size")]
        width: u32,

        #[serde(default = "default_display_size")]
        height: u32,

        #[serde(default)]
        format: PixelFormat,

        /// Bytes per row, if the device pads its lines.
        #[serde(default)]
        stride: Option<usize>,
    },
    /// Discard every frame. Useful for benchmarking and running without a screen.
    Null {
        #[serde(default = "default_display_size")]
        width: u32,

        #[serde(default = "default_display_size")]
        height: u32,
    },
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self::Framebuffer {
            path: default_framebuffer_path(),
            width: default_display_size(),
            height: default_display_size(),
            format: PixelFormat::default(),
            stride: None,
        }
    }
}

impl DisplaySettings {
    /// The dimensions of the display, in pixels.
    pub(crate) fn size(&self) -> (u32, u32) {
        match self {
            Self::Framebuffer { width, height, .. } => (*width, *height),
            Self::Null { width, height } => (*width, *height),
        }
    }

    pub(crate) fn create_sink(&self) -> Box<dyn DisplaySink + Send> {
        match self {
            Self::Framebuffer {
                path,
                width,
                height,
                format,
                stride,
            } => Box::new(Framebuffer::new(path, *width, *height, *format, *stride)),
            Self::Null { .. } => Box::new(NullDisplay::default()),
        }
    }
}
