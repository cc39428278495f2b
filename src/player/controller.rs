use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace};

use super::Player;
use super::loader::BackendEnvironment;
use super::types::{AdapterEvent, EventSink, SourceId};
use crate::models::{MediaKind, Video};

/// Commands that can be sent to the player controller
#[derive(Debug)]
pub enum PlayerCommand {
    /// Bind to a new media source, reusing or replacing the live backend
    Attach {
        video: Arc<Video>,
        respond_to: oneshot::Sender<SourceId>,
    },
    /// Start playback (remembered until the backend is ready)
    Play { respond_to: oneshot::Sender<()> },
    /// Pause playback
    Pause { respond_to: oneshot::Sender<()> },
    /// Seek to an absolute position in seconds
    SeekTo {
        seconds: f64,
        respond_to: oneshot::Sender<Option<f64>>,
    },
    /// Seek relative to the backend's current time
    Skip {
        delta: f64,
        respond_to: oneshot::Sender<Option<f64>>,
    },
    /// Float the native element or bring it back
    TogglePictureInPicture {
        respond_to: oneshot::Sender<Option<bool>>,
    },
    /// Tear down the live backend
    Release { respond_to: oneshot::Sender<()> },
    /// Get current position
    GetPosition {
        respond_to: oneshot::Sender<Option<f64>>,
    },
    /// Get media duration
    GetDuration {
        respond_to: oneshot::Sender<Option<f64>>,
    },
    /// Get buffered percentage
    GetBufferedPercentage { respond_to: oneshot::Sender<f64> },
    /// Which backend kind is live, if any
    GetActiveKind {
        respond_to: oneshot::Sender<Option<MediaKind>>,
    },
    /// Whether the live backend is polling for time
    IsPolling { respond_to: oneshot::Sender<bool> },
}

/// Handle for sending commands to the player controller
#[derive(Clone, Debug)]
pub struct PlayerHandle {
    sender: mpsc::UnboundedSender<PlayerCommand>,
}

/// Owns the single live backend and serializes every call into it.
///
/// Backend failures never leave this actor: they are logged and the call
/// becomes a no-op.
pub struct PlayerController {
    env: BackendEnvironment,
    player: Option<Player>,
    events: mpsc::UnboundedSender<AdapterEvent>,
    next_source: SourceId,
    receiver: mpsc::UnboundedReceiver<PlayerCommand>,
}

impl PlayerController {
    /// Create a new player controller and handle.
    ///
    /// Backend events are delivered on `events`, tagged with the source id
    /// returned by [`PlayerHandle::attach`].
    pub fn new(
        env: BackendEnvironment,
        events: mpsc::UnboundedSender<AdapterEvent>,
    ) -> (PlayerHandle, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();

        let controller = PlayerController {
            env,
            player: None,
            events,
            next_source: 0,
            receiver,
        };
        let handle = PlayerHandle { sender };

        (handle, controller)
    }

    /// Run the controller event loop
    pub async fn run(mut self) {
        debug!("PlayerController event loop started");

        while let Some(command) = self.receiver.recv().await {
            match command {
                PlayerCommand::Attach { video, respond_to } => {
                    let source = self.attach(&video).await;
                    let _ = respond_to.send(source);
                }
                PlayerCommand::Play { respond_to } => {
                    trace!("Starting playback");
                    if let Some(player) = &self.player {
                        player.play().await;
                    }
                    let _ = respond_to.send(());
                }
                PlayerCommand::Pause { respond_to } => {
                    trace!("Pausing playback");
                    if let Some(player) = &self.player {
                        player.pause().await;
                    }
                    let _ = respond_to.send(());
                }
                PlayerCommand::SeekTo {
                    seconds,
                    respond_to,
                } => {
                    trace!("Seeking to {:.2}s", seconds);
                    let target = match &self.player {
                        Some(player) => player.seek_to(seconds).await,
                        None => None,
                    };
                    let _ = respond_to.send(target);
                }
                PlayerCommand::Skip { delta, respond_to } => {
                    trace!("Skipping {:+.1}s", delta);
                    let target = match &self.player {
                        Some(player) => player.skip(delta).await,
                        None => None,
                    };
                    let _ = respond_to.send(target);
                }
                PlayerCommand::TogglePictureInPicture { respond_to } => {
                    let active = match &self.player {
                        Some(player) => player.toggle_picture_in_picture().await,
                        None => None,
                    };
                    let _ = respond_to.send(active);
                }
                PlayerCommand::Release { respond_to } => {
                    self.release().await;
                    let _ = respond_to.send(());
                }
                PlayerCommand::GetPosition { respond_to } => {
                    let position = match &self.player {
                        Some(player) => player.current_time().await,
                        None => None,
                    };
                    let _ = respond_to.send(position);
                }
                PlayerCommand::GetDuration { respond_to } => {
                    let duration = match &self.player {
                        Some(player) => player.duration().await,
                        None => None,
                    };
                    let _ = respond_to.send(duration);
                }
                PlayerCommand::GetBufferedPercentage { respond_to } => {
                    // No buffering model; always reports empty
                    let _ = respond_to.send(0.0);
                }
                PlayerCommand::GetActiveKind { respond_to } => {
                    let _ = respond_to.send(self.player.as_ref().map(Player::kind));
                }
                PlayerCommand::IsPolling { respond_to } => {
                    let polling = match &self.player {
                        Some(player) => player.is_polling().await,
                        None => false,
                    };
                    let _ = respond_to.send(polling);
                }
            }
        }

        self.release().await;
        debug!("PlayerController event loop ended");
    }

    async fn attach(&mut self, video: &Video) -> SourceId {
        self.next_source += 1;
        let source = self.next_source;

        if let Some(player) = &self.player
            && player.kind() == video.media_kind
            && player.supports_reuse()
        {
            debug!(
                "Reusing {} backend for {}",
                video.media_kind.as_str(),
                video.slug
            );
            player.load_source(video, source).await;
            return source;
        }

        // Never two backends at once: the old one is gone before the new one starts
        self.release().await;

        let sink = EventSink::new(source, self.events.clone());
        self.player = Player::create(&self.env, video, sink).await;
        source
    }

    async fn release(&mut self) {
        if let Some(player) = self.player.take() {
            info!("Releasing {} backend", player.kind().as_str());
            player.release().await;
        }
    }
}

impl PlayerHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> PlayerCommand,
    ) -> Result<T> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .map_err(|_| anyhow::anyhow!("Player controller disconnected"))?;
        response
            .await
            .map_err(|_| anyhow::anyhow!("Failed to receive response from player controller"))
    }

    /// Attach a video, returning the source id its events will carry
    pub async fn attach(&self, video: Arc<Video>) -> Result<SourceId> {
        self.request(|respond_to| PlayerCommand::Attach { video, respond_to })
            .await
    }

    /// Start playback
    pub async fn play(&self) -> Result<()> {
        self.request(|respond_to| PlayerCommand::Play { respond_to })
            .await
    }

    /// Pause playback
    pub async fn pause(&self) -> Result<()> {
        self.request(|respond_to| PlayerCommand::Pause { respond_to })
            .await
    }

    /// Seek to position, returning the clamped target if the backend was ready
    pub async fn seek_to(&self, seconds: f64) -> Result<Option<f64>> {
        self.request(|respond_to| PlayerCommand::SeekTo {
            seconds,
            respond_to,
        })
        .await
    }

    /// Skip by `delta` seconds from the backend's current time
    pub async fn skip(&self, delta: f64) -> Result<Option<f64>> {
        self.request(|respond_to| PlayerCommand::Skip { delta, respond_to })
            .await
    }

    /// Toggle picture-in-picture, returning the new state when the backend supports it
    pub async fn toggle_picture_in_picture(&self) -> Result<Option<bool>> {
        self.request(|respond_to| PlayerCommand::TogglePictureInPicture { respond_to })
            .await
    }

    /// Release the live backend
    pub async fn release(&self) -> Result<()> {
        self.request(|respond_to| PlayerCommand::Release { respond_to })
            .await
    }

    /// Get current position
    pub async fn get_position(&self) -> Result<Option<f64>> {
        self.request(|respond_to| PlayerCommand::GetPosition { respond_to })
            .await
    }

    /// Get media duration
    pub async fn get_duration(&self) -> Result<Option<f64>> {
        self.request(|respond_to| PlayerCommand::GetDuration { respond_to })
            .await
    }

    /// Get buffered percentage
    pub async fn buffered_percentage(&self) -> Result<f64> {
        self.request(|respond_to| PlayerCommand::GetBufferedPercentage { respond_to })
            .await
    }

    /// Get the live backend kind
    pub async fn active_kind(&self) -> Result<Option<MediaKind>> {
        self.request(|respond_to| PlayerCommand::GetActiveKind { respond_to })
            .await
    }

    /// Whether the live backend is polling for time
    pub async fn is_polling(&self) -> Result<bool> {
        self.request(|respond_to| PlayerCommand::IsPolling { respond_to })
            .await
    }
}
