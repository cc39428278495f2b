//! Headless player core for a mobile-style video feed.
//!
//! A [`core::SessionController`] owns the player session (closed, full or
//! minimized), drives one of two playback backends through the
//! [`player::PlayerController`] and runs the autoplay countdown. The
//! [`gesture`] module turns drags and taps into intents for it.

pub mod config;
pub mod constants;
pub mod core;
pub mod events;
pub mod gesture;
pub mod models;
pub mod player;
pub mod utils;

pub use config::Config;
pub use core::{PlayerStatus, SessionController, SessionHandle, SessionSnapshot};
pub use gesture::{DoubleTapDetector, DragInfo, GestureInterpreter, Intent, Point};
pub use models::{Catalog, MediaKind, Video};
