use super::host::{WidgetEvent, WidgetPlayer};
use super::loader::WidgetApiLoader;
use super::types::{BackendEvent, BackendState, EventSink, SourceId};
use crate::core::timer::ScheduledTask;
use crate::utils::time::{clamp_time, sanitize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

struct WidgetShared {
    player: RwLock<Option<Arc<dyn WidgetPlayer>>>,
    ready: AtomicBool,
    wants_playing: AtomicBool,
    poll: Mutex<Option<ScheduledTask>>,
    poll_interval: Duration,
    sink: EventSink,
}

impl WidgetShared {
    async fn widget(&self) -> Option<Arc<dyn WidgetPlayer>> {
        if !self.ready.load(Ordering::SeqCst) {
            return None;
        }
        self.player.read().await.clone()
    }

    async fn sample_duration(&self, widget: &Arc<dyn WidgetPlayer>) -> f64 {
        match widget.duration().await {
            Ok(duration) => sanitize(duration),
            Err(e) => {
                warn!("Failed to read widget duration: {:#}", e);
                0.0
            }
        }
    }

    async fn start_polling(self: &Arc<Self>) {
        let weak: Weak<WidgetShared> = Arc::downgrade(self);
        let task = ScheduledTask::every(self.poll_interval, move || {
            let weak = weak.clone();
            async move {
                let Some(shared) = weak.upgrade() else {
                    return false;
                };
                shared.poll_once().await;
                true
            }
        });
        // Replacing drops (and aborts) any previous poller
        *self.poll.lock().await = Some(task);
        trace!("Widget time polling started");
    }

    async fn stop_polling(&self) {
        if self.poll.lock().await.take().is_some() {
            trace!("Widget time polling stopped");
        }
    }

    async fn is_polling(&self) -> bool {
        self.poll.lock().await.is_some()
    }

    async fn poll_once(&self) {
        let Some(widget) = self.widget().await else {
            return;
        };
        match widget.current_time().await {
            Ok(time) => {
                let duration = self.sample_duration(&widget).await;
                self.sink
                    .emit(BackendEvent::TimeUpdate(clamp_time(time, duration)));
            }
            Err(e) => warn!("Widget time tracking failed: {:#}", e),
        }
    }

    async fn handle_event(self: &Arc<Self>, event: WidgetEvent) {
        match event {
            WidgetEvent::Ready => {
                self.ready.store(true, Ordering::SeqCst);
                let Some(widget) = self.widget().await else {
                    return;
                };
                debug!("Embedded widget ready");
                let duration = self.sample_duration(&widget).await;
                self.sink.emit(BackendEvent::DurationChanged(duration));
                if self.wants_playing.load(Ordering::SeqCst)
                    && let Err(e) = widget.play_video().await
                {
                    warn!("Failed to start widget playback: {:#}", e);
                }
            }
            WidgetEvent::StateChange(code) => {
                let Some(state) = BackendState::from_widget_code(code) else {
                    trace!("Ignoring unknown widget state {}", code);
                    return;
                };
                trace!("Widget state -> {}", state.as_str());
                self.sink.emit(BackendEvent::StateChanged(state));
                match state {
                    BackendState::Playing => {
                        if let Some(widget) = self.widget().await {
                            let duration = self.sample_duration(&widget).await;
                            self.sink.emit(BackendEvent::DurationChanged(duration));
                        }
                        self.start_polling().await;
                    }
                    BackendState::Paused | BackendState::Unstarted => self.stop_polling().await,
                    BackendState::Ended => {
                        self.stop_polling().await;
                        self.sink.emit(BackendEvent::Finished);
                    }
                    BackendState::Buffering => {}
                }
            }
        }
    }
}

/// Backend driving a third-party embedded widget.
///
/// The widget has no time notifications, so time is polled while it reports
/// playing. Seeks are reported optimistically since the widget applies them later.
pub struct EmbeddedWidgetBackend {
    shared: Arc<WidgetShared>,
    task: Option<JoinHandle<()>>,
}

impl EmbeddedWidgetBackend {
    /// Start loading the widget for `video_id`. Never fails: a load or
    /// construction error is logged and the backend stays inert.
    pub fn spawn(
        loader: Arc<WidgetApiLoader>,
        video_id: String,
        sink: EventSink,
        poll_interval: Duration,
    ) -> Self {
        let shared = Arc::new(WidgetShared {
            player: RwLock::new(None),
            ready: AtomicBool::new(false),
            wants_playing: AtomicBool::new(false),
            poll: Mutex::new(None),
            poll_interval,
            sink,
        });

        let task_shared = shared.clone();
        let task = tokio::spawn(async move {
            let api = match loader.ensure_loaded().await {
                Ok(api) => api,
                Err(e) => {
                    warn!("Embedded widget unavailable, playback stays inert: {:#}", e);
                    return;
                }
            };

            let (tx, mut rx) = mpsc::unbounded_channel();
            let widget = match api.create_player(&video_id, tx).await {
                Ok(widget) => widget,
                Err(e) => {
                    warn!("Failed to create widget for {}: {:#}", video_id, e);
                    return;
                }
            };
            *task_shared.player.write().await = Some(widget);
            debug!("Embedded widget created for {}", video_id);

            while let Some(event) = rx.recv().await {
                task_shared.handle_event(event).await;
            }
            trace!("Widget event stream closed");
        });

        Self {
            shared,
            task: Some(task),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.shared.ready.load(Ordering::SeqCst)
    }

    pub async fn is_polling(&self) -> bool {
        self.shared.is_polling().await
    }

    /// Swap the video on the live widget instead of rebuilding it.
    pub async fn load_source(&self, video_id: &str, source: SourceId) {
        self.shared.stop_polling().await;
        self.shared.sink.retarget(source);
        self.shared.sink.emit(BackendEvent::TimeUpdate(0.0));
        self.shared.sink.emit(BackendEvent::DurationChanged(0.0));

        let Some(widget) = self.shared.widget().await else {
            return;
        };
        match widget.load_video_by_id(video_id).await {
            Ok(()) => {
                debug!("Loaded {} into existing widget", video_id);
                self.shared.start_polling().await;
            }
            Err(e) => warn!("Failed to load {} into widget: {:#}", video_id, e),
        }
    }

    pub async fn play(&self) {
        self.shared.wants_playing.store(true, Ordering::SeqCst);
        if let Some(widget) = self.shared.widget().await
            && let Err(e) = widget.play_video().await
        {
            warn!("Failed to play widget: {:#}", e);
        }
    }

    pub async fn pause(&self) {
        self.shared.wants_playing.store(false, Ordering::SeqCst);
        if let Some(widget) = self.shared.widget().await
            && let Err(e) = widget.pause_video().await
        {
            warn!("Failed to pause widget: {:#}", e);
        }
    }

    /// Seek and report the target immediately; the next poll reconciles.
    pub async fn seek_to(&self, seconds: f64) -> Option<f64> {
        let widget = self.shared.widget().await?;
        let duration = self.shared.sample_duration(&widget).await;
        let target = clamp_time(seconds, duration);
        if let Err(e) = widget.seek_to(target, true).await {
            warn!("Failed to seek widget: {:#}", e);
            return None;
        }
        self.shared.sink.emit(BackendEvent::TimeUpdate(target));
        Some(target)
    }

    pub async fn current_time(&self) -> Option<f64> {
        let widget = self.shared.widget().await?;
        match widget.current_time().await {
            Ok(time) => Some(sanitize(time)),
            Err(e) => {
                warn!("Failed to read widget time: {:#}", e);
                None
            }
        }
    }

    pub async fn duration(&self) -> Option<f64> {
        let widget = self.shared.widget().await?;
        Some(self.shared.sample_duration(&widget).await)
    }

    /// Stop polling, drop the event stream and destroy the widget instance.
    pub async fn release(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.shared.stop_polling().await;
        self.shared.ready.store(false, Ordering::SeqCst);
        let widget = self.shared.player.write().await.take();
        if let Some(widget) = widget
            && let Err(e) = widget.destroy().await
        {
            warn!("Failed to destroy widget: {:#}", e);
        }
        debug!("Embedded widget released");
    }
}

impl Drop for EmbeddedWidgetBackend {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
