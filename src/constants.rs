// Player timing and gesture tuning defaults.
// Config values fall back to these; see config.rs.

// === Player timings ===
pub const PLAYER_CONTROLS_HIDE_DELAY_MS: u64 = 3500;
pub const COUNTDOWN_TOTAL_SECONDS: u32 = 3;
pub const COUNTDOWN_TICK_MS: u64 = 1000;
pub const SKIP_SECONDS: f64 = 10.0;

// Embedded widget has no timeupdate event, so it is polled while playing
pub const WIDGET_POLL_INTERVAL_MS: u64 = 250;

// === Gestures ===
// Full player: vertical drag down minimizes
pub const MINIMIZE_DRAG_OFFSET: f64 = 100.0;
pub const MINIMIZE_DRAG_VELOCITY: f64 = 400.0;

// Mini player: horizontal swipe right closes
pub const DISMISS_SWIPE_OFFSET: f64 = 120.0;
pub const DISMISS_SWIPE_VELOCITY: f64 = 500.0;

// Related list handle
pub const LIST_DRAG_OFFSET: f64 = 30.0;
pub const LIST_DRAG_VELOCITY: f64 = 150.0;

pub const DOUBLE_TAP_THRESHOLD_MS: u64 = 350;

// Drag distance over which the full player fades toward its minimized look
pub const DRAG_FEEDBACK_RANGE: f64 = 300.0;

// === Event bus ===
pub const EVENT_BUS_CAPACITY: usize = 256;
pub const EVENT_HISTORY_SIZE: usize = 100;