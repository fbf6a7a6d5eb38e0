// SPDX-License-Identifier: GPL-3.0-or-later
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

fn default_throttle_seconds() -> f32 {
    0.02
}

fn default_smoothing_alpha() -> f32 {
    0.1
}

/// Settings for the frame acquisition loop.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub(crate) struct AcquisitionSettings {
    /// Seconds to sleep after each frame is shown.
    #[serde(default = "default_throttle_seconds")]
    pub(crate) throttle_seconds: f32,

    /// The weight given to each new sample of the frame rate.
    #[serde(default = "default_smoothing_alpha")]
    pub(crate) smoothing_alpha: f32,

    /// Give up after this many camera reads fail in a row. Retries forever if not set.
    #[serde(default)]
    pub(crate) max_consecutive_failures: Option<u32>,
}

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            throttle_seconds: default_throttle_seconds(),
            smoothing_alpha: default_smoothing_alpha(),
            max_consecutive_failures: None,
        }
    }
}

impl AcquisitionSettings {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(ConfigError::InvalidSmoothing(self.smoothing_alpha));
        }
        if !(self.throttle_seconds.is_finite() && self.throttle_seconds >= 0.0) {
            return Err(ConfigError::InvalidThrottle(self.throttle_seconds));
        }
        Ok(())
    }

    /// The delay after each frame. Only meaningful after [`validate`][Self::validate] passes.
    pub(crate) fn throttle(&self) -> Duration {
        Duration::from_secs_f32(self.throttle_seconds.max(0.0))
    }
}
