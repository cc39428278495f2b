pub mod errors;
pub mod time;

pub use errors::{AppError, AppResult};
pub use time::{clamp_time, format_time, parse_time_label, progress_percent};
