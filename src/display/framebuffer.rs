// SPDX-License-Identifier: GPL-3.0-or-later
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context as _};
use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use embedded_graphics::prelude::IntoStorage;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::image_buffer::Canvas;

use super::DisplaySink;

/// How pixels are laid out in a framebuffer.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PixelFormat {
    /// 16-bit 5-6-5 RGB, little-endian. Most fbtft drivers use this.
    Rgb565,

    /// 16-bit 5-6-5 RGB, big-endian.
    Rgb565Be,

    /// 32-bit, stored as blue, green, red then an unused byte.
    Xrgb8888,
}

impl Default for PixelFormat {
    fn default() -> Self {
        Self::Rgb565
    }
}

impl PixelFormat {
    pub(crate) fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Rgb565 | Self::Rgb565Be => 2,
            Self::Xrgb8888 => 4,
        }
    }
}

/// Convert a canvas into raw framebuffer bytes.
///
/// Each row takes `stride` bytes, with any bytes past the end of the pixel data left as zero.
pub(crate) fn encode(canvas: &Canvas, format: PixelFormat, stride: usize) -> Vec<u8> {
    let row_length = canvas.width() as usize * format.bytes_per_pixel();
    let stride = stride.max(row_length);
    let mut buffer = vec![0u8; stride * canvas.height() as usize];
    for (row, line) in canvas.rows().zip(buffer.chunks_exact_mut(stride)) {
        for (pixel, bytes) in row.zip(line.chunks_exact_mut(format.bytes_per_pixel())) {
            let [red, green, blue] = pixel.0;
            let packed = Rgb565::from(Rgb888::new(red, green, blue)).into_storage();
            match format {
                PixelFormat::Rgb565 => bytes.copy_from_slice(&packed.to_le_bytes()),
                PixelFormat::Rgb565Be => bytes.copy_from_slice(&packed.to_be_bytes()),
                PixelFormat::Xrgb8888 => bytes.copy_from_slice(&[blue, green, red, 0]),
            }
        }
    }
    buffer
}

/// A Linux framebuffer device, like `/dev/fb1`.
#[derive(Debug)]
pub(crate) struct Framebuffer {
    path: PathBuf,
    width: u32,
    height: u32,
    format: PixelFormat,
    stride: usize,
    device: Option<File>,
}

impl Framebuffer {
    pub(crate) fn new(
        path: &Path,
        width: u32,
        height: u32,
        format: PixelFormat,
        stride: Option<usize>,
    ) -> Self {
        let stride = stride.unwrap_or(width as usize * format.bytes_per_pixel());
        Self {
            path: path.to_path_buf(),
            width,
            height,
            format,
            stride,
            device: None,
        }
    }

    fn write_frame(&mut self, data: &[u8]) -> anyhow::Result<()> {
        let path = &self.path;
        let device = self
            .device
            .as_mut()
            .ok_or_else(|| anyhow!("Framebuffer {} is not open", path.display()))?;
        device
            .seek(SeekFrom::Start(0))
            .and_then(|_| device.write_all(data))
            .and_then(|_| device.flush())
            .with_context(|| format!("Unable to write to framebuffer {}", path.display()))
    }
}

impl DisplaySink for Framebuffer {
    fn initialize(&mut self) -> anyhow::Result<()> {
        let device = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .with_context(|| format!("Unable to open framebuffer {}", self.path.display()))?;
        debug!(path = ?self.path, format = ?self.format, stride = self.stride, "opened framebuffer");
        self.device = Some(device);
        Ok(())
    }

    fn present(&mut self, canvas: &Canvas) -> anyhow::Result<()> {
        if canvas.dimensions() != (self.width, self.height) {
            return Err(anyhow!(
                "Canvas is {}x{}, but the framebuffer is {}x{}",
                canvas.width(),
                canvas.height(),
                self.width,
                self.height
            ));
        }
        let data = encode(canvas, self.format, self.stride);
        self.write_frame(&data)?;
        trace!(bytes = data.len(), "presented frame");
        Ok(())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        let blank = vec![0u8; self.stride * self.height as usize];
        self.write_frame(&blank)
    }

    fn shutdown(&mut self) -> anyhow::Result<()> {
        if self.device.take().is_some() {
            debug!(path = ?self.path, "closed framebuffer");
        }
        Ok(())
    }
}
