use crate::utils::time::progress_percent;

/// Seek-bar drag state.
///
/// While a drag is active the bar shows the dragged percentage instead of the
/// backend position. Nothing reaches the backend until the drag ends.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SeekState {
    seeking: bool,
    override_percent: Option<f64>,
}

impl SeekState {
    pub fn is_seeking(&self) -> bool {
        self.seeking
    }

    pub fn start(&mut self) {
        self.seeking = true;
    }

    pub fn change(&mut self, percent: f64) {
        self.override_percent = Some(clamp_percent(percent));
    }

    /// Finish the drag and return the position in seconds to commit.
    pub fn end(&mut self, percent: f64, duration: f64) -> f64 {
        self.seeking = false;
        self.override_percent = None;
        if !duration.is_finite() || duration <= 0.0 {
            return 0.0;
        }
        clamp_percent(percent) / 100.0 * duration
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Percentage the progress bar should show.
    pub fn display_progress(&self, current_time: f64, duration: f64) -> f64 {
        match self.override_percent {
            Some(percent) if self.seeking => percent,
            _ => progress_percent(current_time, duration),
        }
    }
}

fn clamp_percent(percent: f64) -> f64 {
    if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    }
}
