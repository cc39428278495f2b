//! Gesture interpretation.
//!
//! Turns finished drags and taps into [`Intent`]s. Purely geometric: nothing
//! here knows about playback, it only needs thresholds from [`GestureConfig`].

mod double_tap;

pub use double_tap::{DoubleTapDetector, TapZone};

use crate::config::GestureConfig;
use crate::constants::DRAG_FEEDBACK_RANGE;
use serde::{Deserialize, Serialize};

/// A 2D vector in surface pixels (or pixels per second for velocities).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Release state of a drag: total displacement and release velocity.
///
/// Positive `y` is downward, positive `x` is rightward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DragInfo {
    pub offset: Point,
    pub velocity: Point,
}

impl DragInfo {
    pub const fn new(offset: Point, velocity: Point) -> Self {
        Self { offset, velocity }
    }

    pub const fn vertical(offset_y: f64, velocity_y: f64) -> Self {
        Self::new(Point::new(0.0, offset_y), Point::new(0.0, velocity_y))
    }

    pub const fn horizontal(offset_x: f64, velocity_x: f64) -> Self {
        Self::new(Point::new(offset_x, 0.0), Point::new(velocity_x, 0.0))
    }
}

/// A discrete request for a session transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    Minimize,
    Close,
    Expand,
    ExpandList,
    CollapseList,
    /// Relative seek in seconds
    Skip(f64),
    /// Absolute seek in seconds
    Seek(f64),
    TogglePlay,
    ResetControlsTimer,
}

/// Classifies drag releases against configured thresholds.
#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    config: GestureConfig,
}

impl GestureInterpreter {
    pub fn new(config: GestureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Vertical drag on the full player. Only a downward pull past either
    /// threshold minimizes; anything else snaps back.
    pub fn classify_player_drag(&self, drag: &DragInfo) -> Option<Intent> {
        let past_offset = drag.offset.y > self.config.minimize_offset;
        let past_velocity = drag.velocity.y > self.config.minimize_velocity;
        (past_offset || past_velocity).then_some(Intent::Minimize)
    }

    /// Horizontal swipe on the mini player. Rightward past either threshold closes.
    pub fn classify_mini_drag(&self, drag: &DragInfo) -> Option<Intent> {
        let past_offset = drag.offset.x > self.config.dismiss_offset;
        let past_velocity = drag.velocity.x > self.config.dismiss_velocity;
        (past_offset || past_velocity).then_some(Intent::Close)
    }

    /// Vertical drag on the related-list handle.
    pub fn classify_list_drag(&self, drag: &DragInfo, expanded: bool) -> Option<Intent> {
        let threshold = self.config.list_offset;
        let velocity = self.config.list_velocity;

        let upward = drag.offset.y < -threshold || drag.velocity.y < -velocity;
        let downward = drag.offset.y > threshold || drag.velocity.y > velocity;

        if upward && !expanded {
            Some(Intent::ExpandList)
        } else if downward && expanded {
            Some(Intent::CollapseList)
        } else {
            None
        }
    }

    /// A plain tap on the list handle flips it.
    pub fn tap_list_handle(&self, expanded: bool) -> Intent {
        if expanded {
            Intent::CollapseList
        } else {
            Intent::ExpandList
        }
    }

    /// How far an in-progress player drag has gone, in `[0, 1]`, for visual feedback.
    pub fn drag_feedback(&self, offset_y: f64) -> f64 {
        (offset_y.max(0.0) / DRAG_FEEDBACK_RANGE).min(1.0)
    }
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}
