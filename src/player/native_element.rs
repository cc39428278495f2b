use super::host::{ElementEvent, MediaElement, MediaElementFactory};
use super::types::{BackendEvent, BackendState, EventSink, SourceId};
use crate::utils::time::{clamp_time, sanitize};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Backend driving the host's native media element.
///
/// The element pushes its own time, metadata and end notifications, so no
/// polling is involved.
pub struct NativeElementBackend {
    element: Arc<dyn MediaElement>,
    sink: EventSink,
    forwarder: Option<JoinHandle<()>>,
}

impl NativeElementBackend {
    pub async fn create(
        factory: &Arc<dyn MediaElementFactory>,
        source_url: &str,
        sink: EventSink,
    ) -> Result<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let element = factory.create(source_url, tx).await?;
        debug!("Native element created for {}", source_url);

        let forward_element = element.clone();
        let forward_sink = sink.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                forward_event(&forward_element, &forward_sink, event).await;
            }
            trace!("Native element event stream closed");
        });

        Ok(Self {
            element,
            sink,
            forwarder: Some(forwarder),
        })
    }

    pub async fn load_source(&self, source_url: &str, source: SourceId) {
        self.sink.retarget(source);
        self.sink.emit(BackendEvent::TimeUpdate(0.0));
        self.sink.emit(BackendEvent::DurationChanged(0.0));
        match self.element.set_source(source_url).await {
            Ok(()) => debug!("Native element switched to {}", source_url),
            Err(e) => warn!("Failed to switch native source: {:#}", e),
        }
    }

    pub async fn play(&self) {
        // Environment policy may reject playback; the intent stays recorded upstream
        if let Err(e) = self.element.play().await {
            warn!("Native play rejected: {:#}", e);
        }
    }

    pub async fn pause(&self) {
        if let Err(e) = self.element.pause().await {
            warn!("Failed to pause native element: {:#}", e);
        }
    }

    pub async fn seek_to(&self, seconds: f64) -> Option<f64> {
        let duration = sanitize(self.element.duration().await);
        let target = clamp_time(seconds, duration);
        if let Err(e) = self.element.set_current_time(target).await {
            warn!("Failed to seek native element: {:#}", e);
            return None;
        }
        self.sink.emit(BackendEvent::TimeUpdate(target));
        Some(target)
    }

    pub async fn toggle_picture_in_picture(&self) -> Option<bool> {
        match self.element.toggle_picture_in_picture().await {
            Ok(active) => {
                debug!("Picture-in-picture {}", if active { "entered" } else { "exited" });
                Some(active)
            }
            Err(e) => {
                warn!("Picture-in-picture request failed: {:#}", e);
                None
            }
        }
    }

    pub async fn current_time(&self) -> Option<f64> {
        Some(sanitize(self.element.current_time().await))
    }

    pub async fn duration(&self) -> Option<f64> {
        Some(sanitize(self.element.duration().await))
    }

    pub async fn release(mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
        self.element.release().await;
        debug!("Native element released");
    }
}

impl Drop for NativeElementBackend {
    fn drop(&mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
    }
}

async fn forward_event(element: &Arc<dyn MediaElement>, sink: &EventSink, event: ElementEvent) {
    match event {
        ElementEvent::TimeUpdate(time) => {
            let duration = sanitize(element.duration().await);
            sink.emit(BackendEvent::TimeUpdate(clamp_time(time, duration)));
        }
        ElementEvent::LoadedMetadata(duration) => {
            sink.emit(BackendEvent::DurationChanged(sanitize(duration)));
        }
        ElementEvent::Playing => sink.emit(BackendEvent::StateChanged(BackendState::Playing)),
        ElementEvent::Pause => sink.emit(BackendEvent::StateChanged(BackendState::Paused)),
        ElementEvent::Waiting => sink.emit(BackendEvent::StateChanged(BackendState::Buffering)),
        ElementEvent::Ended => {
            sink.emit(BackendEvent::StateChanged(BackendState::Ended));
            sink.emit(BackendEvent::Finished);
        }
    }
}
