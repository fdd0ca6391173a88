//! Video interaction timing configuration.

use std::time::Duration;

/// Timing and visibility constants for video previews.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoConfig {
    /// Fraction of the video that must be visible before touch autoplay.
    pub intersection_threshold: f64,
    /// How long a touch must be held to replay a finished video.
    pub long_press: Duration,
    /// How long the pointer must rest on a card before playback starts.
    pub hover_delay: Duration,
}

impl VideoConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the intersection threshold, clamped to `0.0..=1.0`.
    pub fn with_intersection_threshold(mut self, threshold: f64) -> Self {
        self.intersection_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_long_press(mut self, duration: Duration) -> Self {
        self.long_press = duration;
        self
    }

    pub fn with_hover_delay(mut self, duration: Duration) -> Self {
        self.hover_delay = duration;
        self
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            intersection_threshold: 0.5,
            long_press: Duration::from_millis(500),
            hover_delay: Duration::from_millis(250),
        }
    }
}
