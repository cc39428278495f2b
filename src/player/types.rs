use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

/// Identifies one attachment of a media source. Events from an older source are stale.
pub type SourceId = u64;

/// Playback state normalized across backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendState {
    Unstarted,
    Playing,
    Paused,
    Buffering,
    Ended,
}

impl BackendState {
    /// Map an embedded widget state code. Cued counts as unstarted.
    pub fn from_widget_code(code: i32) -> Option<Self> {
        match code {
            -1 | 5 => Some(BackendState::Unstarted),
            0 => Some(BackendState::Ended),
            1 => Some(BackendState::Playing),
            2 => Some(BackendState::Paused),
            3 => Some(BackendState::Buffering),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendState::Unstarted => "unstarted",
            BackendState::Playing => "playing",
            BackendState::Paused => "paused",
            BackendState::Buffering => "buffering",
            BackendState::Ended => "ended",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackendEvent {
    TimeUpdate(f64),
    DurationChanged(f64),
    StateChanged(BackendState),
    /// Emitted exactly once per end of playback, whatever the backend.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdapterEvent {
    pub source: SourceId,
    pub event: BackendEvent,
}

/// Outbound channel of a backend, stamping every event with the current source.
#[derive(Debug, Clone)]
pub struct EventSink {
    source: Arc<AtomicU64>,
    sender: mpsc::UnboundedSender<AdapterEvent>,
}

impl EventSink {
    pub fn new(source: SourceId, sender: mpsc::UnboundedSender<AdapterEvent>) -> Self {
        Self {
            source: Arc::new(AtomicU64::new(source)),
            sender,
        }
    }

    pub fn source(&self) -> SourceId {
        self.source.load(Ordering::SeqCst)
    }

    /// Point the sink at a newly loaded source on the same backend instance.
    pub fn retarget(&self, source: SourceId) {
        self.source.store(source, Ordering::SeqCst);
    }

    pub fn emit(&self, event: BackendEvent) {
        let _ = self.sender.send(AdapterEvent {
            source: self.source(),
            event,
        });
    }
}
