use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Widget API unavailable: {0}")]
    WidgetApiUnavailable(String),

    #[error("Backend failed to initialize: {0}")]
    BackendInit(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Playback rejected by host: {0}")]
    PlaybackRejected(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0} controller disconnected")]
    ControllerDisconnected(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] serde_json::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
