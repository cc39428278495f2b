use crate::core::session::PlayerStatus;
use serde::{Deserialize, Serialize};

/// Discrete notification published by the player session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerEvent {
    pub id: String,
    pub event_type: EventType,
    pub payload: EventPayload,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl PlayerEvent {
    pub fn new(event_type: EventType, payload: EventPayload) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_type,
            payload,
            timestamp: chrono::Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventType {
    // Session lifecycle
    VideoStarted,
    PlayerClosed,
    StatusChanged,

    // Playback
    PlaybackResumed,
    PlaybackPaused,
    PlaybackEnded,
    SeekCommitted,
    Skipped,
    PictureInPictureChanged,

    // Autoplay
    CountdownStarted,
    CountdownCancelled,
    AutoplayAdvanced,
    AutoplayExhausted,

    // Related list
    ListExpanded,
    ListCollapsed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SkipSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    Video {
        slug: String,
        title: String,
    },
    Status {
        from: PlayerStatus,
        to: PlayerStatus,
    },
    Playback {
        slug: String,
        position: f64,
        duration: f64,
    },
    Countdown {
        slug: String,
        seconds: u32,
    },
    Autoplay {
        from: String,
        to: Option<String>,
    },
    Seek {
        position: f64,
    },
    Skip {
        delta: f64,
        side: SkipSide,
        label: String,
    },
    PictureInPicture {
        active: bool,
    },
    Empty,
}

impl EventType {
    /// Get a string representation for filtering/routing
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::VideoStarted => "session.video_started",
            EventType::PlayerClosed => "session.closed",
            EventType::StatusChanged => "session.status_changed",
            EventType::PlaybackResumed => "playback.resumed",
            EventType::PlaybackPaused => "playback.paused",
            EventType::PlaybackEnded => "playback.ended",
            EventType::SeekCommitted => "playback.seek_committed",
            EventType::Skipped => "playback.skipped",
            EventType::PictureInPictureChanged => "playback.picture_in_picture",
            EventType::CountdownStarted => "autoplay.countdown_started",
            EventType::CountdownCancelled => "autoplay.countdown_cancelled",
            EventType::AutoplayAdvanced => "autoplay.advanced",
            EventType::AutoplayExhausted => "autoplay.exhausted",
            EventType::ListExpanded => "list.expanded",
            EventType::ListCollapsed => "list.collapsed",
        }
    }
}

impl SkipSide {
    pub fn for_delta(delta: f64) -> Self {
        if delta > 0.0 { SkipSide::Right } else { SkipSide::Left }
    }
}

/// Ripple label shown over the player: `+10s` / `-10s`.
pub fn skip_label(delta: f64) -> String {
    if delta > 0.0 {
        format!("+{}s", delta.round() as i64)
    } else {
        format!("{}s", delta.round() as i64)
    }
}
