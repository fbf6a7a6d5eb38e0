// SPDX-License-Identifier: GPL-3.0-or-later
use std::time::Instant;

/// An exponentially smoothed frames-per-second estimate.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RateEstimator {
    rate: f32,
    alpha: f32,
    last: Instant,
}

impl RateEstimator {
    /// Create a new estimator, with `start` as the time of the previous frame.
    ///
    /// `alpha` is the weight given to each new sample.
    pub(crate) fn new(alpha: f32, start: Instant) -> Self {
        Self {
            rate: 0.0,
            alpha,
            last: start,
        }
    }

    /// Add a sample of `elapsed` seconds between frames, returning the new estimate.
    ///
    /// The estimate starts at zero, and the first sample is taken as-is. Samples that aren't positive leave the estimate alone.
    pub(crate) fn update(&mut self, elapsed: f32) -> f32 {
        if !(elapsed > 0.0) {
            return self.rate;
        }
        let instant_rate = elapsed.recip();
        self.rate = if self.rate == 0.0 {
            instant_rate
        } else {
            (1.0 - self.alpha) * self.rate + self.alpha * instant_rate
        };
        self.rate
    }

    /// Record a frame starting at `now`.
    pub(crate) fn record(&mut self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        self.update(elapsed.as_secs_f32())
    }
}
