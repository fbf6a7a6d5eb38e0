// SPDX-License-Identifier: GPL-3.0-or-later
use tracing::trace;

use crate::image_buffer::Canvas;

mod framebuffer;
mod settings;

pub(crate) use settings::DisplaySettings;

/// Something that can show a finished canvas.
pub(crate) trait DisplaySink {
    /// Prepare the display. Called once, before the first frame.
    fn initialize(&mut self) -> anyhow::Result<()>;

    fn present(&mut self, canvas: &Canvas) -> anyhow::Result<()>;

    /// Blank the display.
    fn clear(&mut self) -> anyhow::Result<()>;

    /// Release the display. Nothing is presented after this.
    fn shutdown(&mut self) -> anyhow::Result<()>;
}

impl<D> DisplaySink for Box<D>
where
    D: DisplaySink + ?Sized,
{
    fn initialize(&mut self) -> anyhow::Result<()> {
        (**self).initialize()
    }

    fn present(&mut self, canvas: &Canvas) -> anyhow::Result<()> {
        (**self).present(canvas)
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        (**self).clear()
    }

    fn shutdown(&mut self) -> anyhow::Result<()> {
        (**self).shutdown()
    }
}

/// A display that throws frames away.
#[derive(Debug, Default)]
pub(crate) struct NullDisplay {
    presented: u64,
}

impl DisplaySink for NullDisplay {
    fn initialize(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn present(&mut self, canvas: &Canvas) -> anyhow::Result<()> {
        self.presented += 1;
        trace!(
            frame = self.presented,
            width = canvas.width(),
            height = canvas.height(),
            "discarding frame"
        );
        Ok(())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn shutdown(&mut self) -> anyhow::Result<()> {
        trace!(frames = self.presented, "null display shut down");
        Ok(())
    }
}
