//! Numeric helpers shared by the adapter, the session and the seek bar.
//!
//! Backends report seconds as `f64` and may hand back `NaN` or infinities
//! before metadata is known; everything here folds those into a zero baseline.

/// Render seconds as `m:ss`. Non-finite or negative input renders `0:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }
    let total = secs.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Playback progress as a percentage in `[0, 100]`.
pub fn progress_percent(current: f64, duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 || !current.is_finite() {
        return 0.0;
    }
    (current / duration * 100.0).clamp(0.0, 100.0)
}

/// Clamp a target position into `[0, duration]`.
///
/// When the duration is unknown (`<= 0` or non-finite) only the lower bound applies.
pub fn clamp_time(target: f64, duration: f64) -> f64 {
    let target = if target.is_finite() { target } else { 0.0 };
    if duration.is_finite() && duration > 0.0 {
        target.clamp(0.0, duration)
    } else {
        target.max(0.0)
    }
}

/// Parse an `m:ss` or `h:mm:ss` label back into seconds.
pub fn parse_time_label(label: &str) -> Option<f64> {
    let mut total = 0u64;
    let mut parts = 0;
    for part in label.trim().split(':') {
        let value: u64 = part.parse().ok()?;
        total = total.checked_mul(60)?.checked_add(value)?;
        parts += 1;
    }
    if !(2..=3).contains(&parts) {
        return None;
    }
    Some(total as f64)
}

/// Normalize a backend-reported sample, mapping non-finite values to zero.
pub(crate) fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}
