// SPDX-License-Identifier: GPL-3.0-or-later
//! Turning thermal images into something to show on a display.
mod cheese;
pub(crate) mod color;
pub(crate) mod color_map;
pub(crate) mod font;
mod layer;
mod mono;
pub(crate) mod palette;
pub(crate) mod resize;
mod settings;
pub(crate) mod stats;

pub(crate) use color_map::ColorMap;
pub(crate) use font::OverlayFont;
pub(crate) use layer::{Compositor, Layout};
pub(crate) use settings::RenderSettings;
pub(crate) use stats::FrameStats;
