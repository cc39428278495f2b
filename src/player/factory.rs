use super::embedded_widget::EmbeddedWidgetBackend;
use super::loader::BackendEnvironment;
use super::native_element::NativeElementBackend;
use super::types::{EventSink, SourceId};
use crate::models::{MediaKind, Video};
use crate::utils::time::clamp_time;
use tracing::{debug, info, warn};

/// The single live backend, chosen once per attach from the video's media kind.
pub enum Player {
    EmbeddedWidget(EmbeddedWidgetBackend),
    Native(NativeElementBackend),
}

impl Player {
    /// Construct the backend for `video`.
    ///
    /// Returns `None` when the backend cannot initialize; the failure is logged
    /// and playback stays inert.
    pub async fn create(env: &BackendEnvironment, video: &Video, sink: EventSink) -> Option<Self> {
        match video.media_kind {
            MediaKind::EmbeddedWidget => {
                let Some(video_id) = video.widget_id() else {
                    warn!("No widget id for {}, backend stays inert", video.slug);
                    return None;
                };
                info!("Creating embedded widget backend for {}", video_id);
                Some(Player::EmbeddedWidget(EmbeddedWidgetBackend::spawn(
                    env.widget_api.clone(),
                    video_id,
                    sink,
                    env.poll_interval,
                )))
            }
            MediaKind::Native => {
                info!("Creating native element backend for {}", video.slug);
                match NativeElementBackend::create(&env.media, &video.media_url, sink).await {
                    Ok(backend) => Some(Player::Native(backend)),
                    Err(e) => {
                        warn!("Native element init failed for {}: {:#}", video.slug, e);
                        None
                    }
                }
            }
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            Player::EmbeddedWidget(_) => MediaKind::EmbeddedWidget,
            Player::Native(_) => MediaKind::Native,
        }
    }

    /// Whether a same-kind video can be loaded without rebuilding the backend.
    pub fn supports_reuse(&self) -> bool {
        match self {
            Player::EmbeddedWidget(p) => p.is_ready(),
            Player::Native(_) => true,
        }
    }

    pub async fn load_source(&self, video: &Video, source: SourceId) {
        match self {
            Player::EmbeddedWidget(p) => match video.widget_id() {
                Some(video_id) => p.load_source(&video_id, source).await,
                None => warn!("No widget id for {}", video.slug),
            },
            Player::Native(p) => p.load_source(&video.media_url, source).await,
        }
    }

    pub async fn play(&self) {
        match self {
            Player::EmbeddedWidget(p) => p.play().await,
            Player::Native(p) => p.play().await,
        }
    }

    pub async fn pause(&self) {
        match self {
            Player::EmbeddedWidget(p) => p.pause().await,
            Player::Native(p) => p.pause().await,
        }
    }

    pub async fn seek_to(&self, seconds: f64) -> Option<f64> {
        match self {
            Player::EmbeddedWidget(p) => p.seek_to(seconds).await,
            Player::Native(p) => p.seek_to(seconds).await,
        }
    }

    /// Seek relative to the backend's own current time.
    pub async fn skip(&self, delta: f64) -> Option<f64> {
        let now = self.current_time().await?;
        let duration = self.duration().await.unwrap_or(0.0);
        self.seek_to(clamp_time(now + delta, duration)).await
    }

    /// Only the native element can float; widgets ignore the request.
    pub async fn toggle_picture_in_picture(&self) -> Option<bool> {
        match self {
            Player::EmbeddedWidget(_) => {
                debug!("Picture-in-picture not available for the embedded widget");
                None
            }
            Player::Native(p) => p.toggle_picture_in_picture().await,
        }
    }

    pub async fn current_time(&self) -> Option<f64> {
        match self {
            Player::EmbeddedWidget(p) => p.current_time().await,
            Player::Native(p) => p.current_time().await,
        }
    }

    pub async fn duration(&self) -> Option<f64> {
        match self {
            Player::EmbeddedWidget(p) => p.duration().await,
            Player::Native(p) => p.duration().await,
        }
    }

    pub async fn is_polling(&self) -> bool {
        match self {
            Player::EmbeddedWidget(p) => p.is_polling().await,
            Player::Native(_) => false,
        }
    }

    pub async fn release(self) {
        match self {
            Player::EmbeddedWidget(p) => p.release().await,
            Player::Native(p) => p.release().await,
        }
    }
}
