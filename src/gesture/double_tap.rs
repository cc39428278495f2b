use super::Intent;
use std::time::{Duration, Instant};

/// Horizontal third of the player surface a tap landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapZone {
    Left,
    Middle,
    Right,
}

impl TapZone {
    pub fn classify(x: f64, width: f64) -> Self {
        if !width.is_finite() || width <= 0.0 {
            return TapZone::Middle;
        }
        if x < width / 3.0 {
            TapZone::Left
        } else if x > width * 2.0 / 3.0 {
            TapZone::Right
        } else {
            TapZone::Middle
        }
    }
}

/// Double-tap detection on the player surface.
///
/// Two taps closer than the window, both in the same outer third, skip in that
/// direction. Every other tap is a plain tap that wakes the controls.
#[derive(Debug, Clone)]
pub struct DoubleTapDetector {
    window: Duration,
    skip_seconds: f64,
    last_tap: Option<(Instant, TapZone)>,
}

impl DoubleTapDetector {
    pub fn new(window: Duration, skip_seconds: f64) -> Self {
        Self {
            window,
            skip_seconds,
            last_tap: None,
        }
    }

    /// Register a tap at `x` on a surface `width` pixels wide.
    pub fn on_tap(&mut self, x: f64, width: f64, at: Instant) -> Intent {
        let zone = TapZone::classify(x, width);

        let within_window = self
            .last_tap
            .is_some_and(|(t, prev_zone)| prev_zone == zone && at.duration_since(t) < self.window);

        // Keep the latest tap so rapid repeated taps keep skipping
        self.last_tap = Some((at, zone));

        match zone {
            TapZone::Left if within_window => Intent::Skip(-self.skip_seconds),
            TapZone::Right if within_window => Intent::Skip(self.skip_seconds),
            _ => Intent::ResetControlsTimer,
        }
    }

    pub fn reset(&mut self) {
        self.last_tap = None;
    }
}
