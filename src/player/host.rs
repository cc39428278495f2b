//! Bindings to the host environment that actually renders media.
//!
//! The core never talks to a concrete widget script or media element; hosts
//! implement these traits and the backends drive them.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Callbacks raised by an embedded widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEvent {
    Ready,
    /// Raw widget state code (-1 unstarted, 0 ended, 1 playing, 2 paused,
    /// 3 buffering, 5 cued).
    StateChange(i32),
}

/// The third-party widget script. Must be loaded once before any player exists.
#[async_trait]
pub trait WidgetApi: Send + Sync {
    async fn load(&self) -> Result<()>;

    async fn create_player(
        &self,
        video_id: &str,
        events: mpsc::UnboundedSender<WidgetEvent>,
    ) -> Result<Arc<dyn WidgetPlayer>>;
}

/// One embedded widget instance. Calls are fire-and-forget on the widget side;
/// seeks in particular complete later.
#[async_trait]
pub trait WidgetPlayer: Send + Sync {
    async fn play_video(&self) -> Result<()>;
    async fn pause_video(&self) -> Result<()>;
    async fn seek_to(&self, seconds: f64, allow_seek_ahead: bool) -> Result<()>;
    async fn load_video_by_id(&self, video_id: &str) -> Result<()>;
    async fn current_time(&self) -> Result<f64>;
    async fn duration(&self) -> Result<f64>;
    async fn destroy(&self) -> Result<()>;
}

/// Push notifications from a native media element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementEvent {
    TimeUpdate(f64),
    LoadedMetadata(f64),
    Playing,
    Pause,
    Waiting,
    Ended,
}

#[async_trait]
pub trait MediaElementFactory: Send + Sync {
    async fn create(
        &self,
        source_url: &str,
        events: mpsc::UnboundedSender<ElementEvent>,
    ) -> Result<Arc<dyn MediaElement>>;
}

/// The host's built-in media element.
#[async_trait]
pub trait MediaElement: Send + Sync {
    /// May be rejected by the environment (autoplay policy).
    async fn play(&self) -> Result<()>;
    async fn pause(&self) -> Result<()>;
    async fn set_current_time(&self, seconds: f64) -> Result<()>;
    async fn current_time(&self) -> f64;
    /// `NaN` until metadata has loaded.
    async fn duration(&self) -> f64;
    async fn set_source(&self, source_url: &str) -> Result<()>;
    /// Enter picture-in-picture, or leave it when already floating.
    ///
    /// Returns whether the element floats afterward. Fails when the
    /// environment has no picture-in-picture support or refuses the request.
    async fn toggle_picture_in_picture(&self) -> Result<bool>;
    async fn release(&self);
}
