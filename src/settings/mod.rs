// SPDX-License-Identifier: GPL-3.0-or-later
use std::fs;
use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

mod cli;
pub(crate) mod gradient;

use crate::camera::CameraSettings;
use crate::display::DisplaySettings;
use crate::pipeline::AcquisitionSettings;
use crate::render::RenderSettings;
pub(crate) use cli::Args;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub(crate) struct Settings {
    /// Camera-specific settings.
    pub(crate) camera: CameraSettings,

    /// Where rendered frames are shown.
    #[serde(default)]
    pub(crate) display: DisplaySettings,

    /// Settings related to how the data is rendered.
    #[serde(default)]
    pub(crate) render: RenderSettings,

    #[serde(default)]
    pub(crate) acquisition: AcquisitionSettings,
}

impl Settings {
    pub(crate) fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Unable to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Unable to parse config file {}", path.display()))
    }
}
