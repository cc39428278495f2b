use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace, warn};

use super::property::{Property, PropertySubscriber, ReadOnlyProperty};
use super::seek::SeekState;
use super::timer::ScheduledTask;
use crate::config::PlayerConfig;
use crate::events::types::skip_label;
use crate::events::{EventBus, EventPayload, EventType, PlayerEvent, SkipSide};
use crate::gesture::Intent;
use crate::models::{Catalog, Video};
use crate::player::{
    AdapterEvent, BackendEnvironment, BackendEvent, BackendState, PlayerController, PlayerHandle,
    SourceId,
};
use crate::utils::time::sanitize;
use crate::utils::{AppError, AppResult};

/// Presentation mode of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerStatus {
    Closed,
    Full,
    Minimized,
}

impl PlayerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerStatus::Closed => "closed",
            PlayerStatus::Full => "full",
            PlayerStatus::Minimized => "minimized",
        }
    }
}

/// Autoplay countdown shown after a video ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub seconds_remaining: u32,
}

// Writable session fields, owned by the controller alone
#[derive(Debug)]
struct SessionProperties {
    current_video: Property<Option<Arc<Video>>>,
    status: Property<PlayerStatus>,
    is_playing: Property<bool>,
    current_time: Property<f64>,
    duration: Property<f64>,
    progress: Property<f64>,
    show_controls: Property<bool>,
    countdown: Property<Option<Countdown>>,
    list_expanded: Property<bool>,
    is_seeking: Property<bool>,
}

// Read side of the session fields, shared by every handle
#[derive(Clone, Debug)]
struct SessionView {
    current_video: ReadOnlyProperty<Option<Arc<Video>>>,
    status: ReadOnlyProperty<PlayerStatus>,
    is_playing: ReadOnlyProperty<bool>,
    current_time: ReadOnlyProperty<f64>,
    duration: ReadOnlyProperty<f64>,
    progress: ReadOnlyProperty<f64>,
    show_controls: ReadOnlyProperty<bool>,
    countdown: ReadOnlyProperty<Option<Countdown>>,
    list_expanded: ReadOnlyProperty<bool>,
    is_seeking: ReadOnlyProperty<bool>,
}

impl SessionProperties {
    fn new() -> Self {
        Self {
            current_video: Property::new(None, "current_video"),
            status: Property::new(PlayerStatus::Closed, "status"),
            is_playing: Property::new(false, "is_playing"),
            current_time: Property::new(0.0, "current_time"),
            duration: Property::new(0.0, "duration"),
            progress: Property::new(0.0, "progress"),
            show_controls: Property::new(true, "show_controls"),
            countdown: Property::new(None, "countdown"),
            list_expanded: Property::new(false, "list_expanded"),
            is_seeking: Property::new(false, "is_seeking"),
        }
    }

    fn view(&self) -> SessionView {
        SessionView {
            current_video: self.current_video.read_only(),
            status: self.status.read_only(),
            is_playing: self.is_playing.read_only(),
            current_time: self.current_time.read_only(),
            duration: self.duration.read_only(),
            progress: self.progress.read_only(),
            show_controls: self.show_controls.read_only(),
            countdown: self.countdown.read_only(),
            list_expanded: self.list_expanded.read_only(),
            is_seeking: self.is_seeking.read_only(),
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_video: self.current_video.get_sync(),
            status: self.status.get_sync(),
            is_playing: self.is_playing.get_sync(),
            current_time: self.current_time.get_sync(),
            duration: self.duration.get_sync(),
            progress: self.progress.get_sync(),
            show_controls: self.show_controls.get_sync(),
            countdown: self.countdown.get_sync(),
            list_expanded: self.list_expanded.get_sync(),
            is_seeking: self.is_seeking.get_sync(),
        }
    }
}

impl SessionView {
    fn subscribe(&self, property_name: &str) -> Option<PropertySubscriber> {
        match property_name {
            "current_video" => Some(self.current_video.subscribe()),
            "status" => Some(self.status.subscribe()),
            "is_playing" => Some(self.is_playing.subscribe()),
            "current_time" => Some(self.current_time.subscribe()),
            "duration" => Some(self.duration.subscribe()),
            "progress" => Some(self.progress.subscribe()),
            "show_controls" => Some(self.show_controls.subscribe()),
            "countdown" => Some(self.countdown.subscribe()),
            "list_expanded" => Some(self.list_expanded.subscribe()),
            "is_seeking" => Some(self.is_seeking.subscribe()),
            _ => None,
        }
    }
}

/// A consistent copy of every session field, taken between transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub current_video: Option<Arc<Video>>,
    pub status: PlayerStatus,
    pub is_playing: bool,
    pub current_time: f64,
    pub duration: f64,
    pub progress: f64,
    pub show_controls: bool,
    pub countdown: Option<Countdown>,
    pub list_expanded: bool,
    pub is_seeking: bool,
}

impl SessionSnapshot {
    /// The empty session at startup and after closing.
    pub fn initial() -> Self {
        SessionProperties::new().snapshot()
    }
}

/// A requested session transition.
#[derive(Debug, Clone)]
pub enum Transition {
    PlayVideo(Arc<Video>),
    Close,
    Minimize,
    Expand,
    TogglePlay,
    Play,
    Pause,
    StartCountdown,
    CancelCountdown,
    PlayNext,
    SeekStart,
    SeekChange(f64),
    SeekEnd(f64),
    SeekTo(f64),
    Skip(f64),
    TogglePictureInPicture,
    Interact,
    SetListExpanded(bool),
}

impl From<Intent> for Transition {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Minimize => Transition::Minimize,
            Intent::Close => Transition::Close,
            Intent::Expand => Transition::Expand,
            Intent::ExpandList => Transition::SetListExpanded(true),
            Intent::CollapseList => Transition::SetListExpanded(false),
            Intent::Skip(delta) => Transition::Skip(delta),
            Intent::Seek(seconds) => Transition::SeekTo(seconds),
            Intent::TogglePlay => Transition::TogglePlay,
            Intent::ResetControlsTimer => Transition::Interact,
        }
    }
}

/// Commands that can be sent to the session controller
#[derive(Debug)]
pub enum SessionCommand {
    Apply {
        transition: Transition,
        respond_to: oneshot::Sender<()>,
    },
    Snapshot {
        respond_to: oneshot::Sender<SessionSnapshot>,
    },
}

#[derive(Debug, Clone, Copy)]
enum TimerFired {
    CountdownTick { generation: u64 },
    HideControls { generation: u64 },
}

/// Handle for driving and observing the player session
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::UnboundedSender<SessionCommand>,
    view: SessionView,
    player: PlayerHandle,
    event_bus: Arc<EventBus>,
}

/// Single owner of the player session.
///
/// Applies transitions, backend reports and timer expiries strictly one at a
/// time. Timers never touch state themselves: they post a message tagged with
/// the generation that armed them, and stale generations are dropped.
pub struct SessionController {
    properties: SessionProperties,
    catalog: Arc<Catalog>,
    config: PlayerConfig,
    player: PlayerHandle,
    player_controller: Option<PlayerController>,
    event_bus: Arc<EventBus>,
    commands: mpsc::UnboundedReceiver<SessionCommand>,
    adapter_events: mpsc::UnboundedReceiver<AdapterEvent>,
    timer_tx: mpsc::UnboundedSender<TimerFired>,
    timer_rx: mpsc::UnboundedReceiver<TimerFired>,
    source: Option<SourceId>,
    countdown_task: Option<ScheduledTask>,
    countdown_generation: u64,
    controls_task: Option<ScheduledTask>,
    controls_generation: u64,
    controls_requested: bool,
    seek: SeekState,
}

impl SessionController {
    pub fn new(
        catalog: Arc<Catalog>,
        config: PlayerConfig,
        env: BackendEnvironment,
        event_bus: Arc<EventBus>,
    ) -> (SessionHandle, Self) {
        let (sender, commands) = mpsc::unbounded_channel();
        let (adapter_tx, adapter_events) = mpsc::unbounded_channel();
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let (player, player_controller) = PlayerController::new(env, adapter_tx);
        let properties = SessionProperties::new();

        let handle = SessionHandle {
            sender,
            view: properties.view(),
            player: player.clone(),
            event_bus: event_bus.clone(),
        };

        let controller = SessionController {
            properties,
            catalog,
            config,
            player,
            player_controller: Some(player_controller),
            event_bus,
            commands,
            adapter_events,
            timer_tx,
            timer_rx,
            source: None,
            countdown_task: None,
            countdown_generation: 0,
            controls_task: None,
            controls_generation: 0,
            controls_requested: true,
            seek: SeekState::default(),
        };

        (handle, controller)
    }

    /// Create the session and run it on the current runtime.
    pub fn spawn(
        catalog: Arc<Catalog>,
        config: PlayerConfig,
        env: BackendEnvironment,
        event_bus: Arc<EventBus>,
    ) -> SessionHandle {
        let (handle, controller) = Self::new(catalog, config, env, event_bus);
        tokio::spawn(controller.run());
        handle
    }

    /// Run the session event loop until every handle is dropped
    pub async fn run(mut self) {
        debug!("SessionController event loop started");
        if let Some(player_controller) = self.player_controller.take() {
            tokio::spawn(player_controller.run());
        }

        loop {
            tokio::select! {
                biased;
                command = self.commands.recv() => match command {
                    Some(SessionCommand::Apply { transition, respond_to }) => {
                        self.apply(transition).await;
                        let _ = respond_to.send(());
                    }
                    Some(SessionCommand::Snapshot { respond_to }) => {
                        let _ = respond_to.send(self.properties.snapshot());
                    }
                    None => break,
                },
                Some(event) = self.adapter_events.recv() => self.handle_adapter_event(event).await,
                Some(fired) = self.timer_rx.recv() => self.handle_timer(fired).await,
            }
        }

        self.cancel_countdown_task();
        self.controls_task = None;
        if let Err(e) = self.player.release().await {
            trace!("Player already gone at shutdown: {}", e);
        }
        debug!("SessionController event loop ended");
    }

    async fn apply(&mut self, transition: Transition) {
        trace!("Applying {:?}", transition);
        match transition {
            Transition::PlayVideo(video) => self.play_video(video).await,
            Transition::Close => self.close().await,
            Transition::Minimize => {
                self.set_status_from(PlayerStatus::Full, PlayerStatus::Minimized)
                    .await
            }
            Transition::Expand => {
                self.set_status_from(PlayerStatus::Minimized, PlayerStatus::Full)
                    .await
            }
            Transition::TogglePlay => {
                if self.is_open() {
                    let playing = !self.properties.is_playing.get_sync();
                    self.set_playing(playing).await;
                    self.restart_controls_timer();
                }
            }
            Transition::Play => {
                if self.is_open() && !self.properties.is_playing.get_sync() {
                    self.set_playing(true).await;
                }
            }
            Transition::Pause => {
                if self.is_open() && self.properties.is_playing.get_sync() {
                    self.set_playing(false).await;
                }
            }
            Transition::StartCountdown => self.start_countdown().await,
            Transition::CancelCountdown => {
                if self.properties.countdown.get_sync().is_some() {
                    self.clear_countdown();
                    self.emit(EventType::CountdownCancelled, EventPayload::Empty).await;
                }
            }
            Transition::PlayNext => self.play_next().await,
            Transition::SeekStart => {
                if self.is_open() {
                    self.seek.start();
                    self.controls_task = None;
                    self.controls_requested = true;
                    self.refresh_controls();
                    self.refresh_seek();
                }
            }
            Transition::SeekChange(percent) => {
                if self.is_open() {
                    self.seek.change(percent);
                    self.refresh_seek();
                }
            }
            Transition::SeekEnd(percent) => {
                if self.is_open() {
                    let seconds = self.seek.end(percent, self.properties.duration.get_sync());
                    self.refresh_seek();
                    self.commit_seek(seconds).await;
                }
            }
            Transition::SeekTo(seconds) => {
                if self.is_open() {
                    self.commit_seek(seconds).await;
                }
            }
            Transition::Skip(delta) => self.skip(delta).await,
            Transition::TogglePictureInPicture => self.toggle_picture_in_picture().await,
            Transition::Interact => {
                if self.is_open() {
                    self.restart_controls_timer();
                }
            }
            Transition::SetListExpanded(expanded) => {
                if self.is_open() {
                    self.set_list_expanded(expanded).await;
                }
            }
        }
    }

    fn is_open(&self) -> bool {
        self.properties.status.get_sync() != PlayerStatus::Closed
    }

    async fn play_video(&mut self, video: Arc<Video>) {
        info!("Playing {} ({})", video.title, video.slug);
        self.clear_countdown();

        let from = self.properties.status.get_sync();
        self.source = None;
        self.seek.reset();
        self.properties.current_video.set(Some(video.clone()));
        self.properties.status.set_if_changed(PlayerStatus::Full);
        self.properties.is_playing.set_if_changed(true);
        self.properties.current_time.set_if_changed(0.0);
        self.properties.duration.set_if_changed(0.0);
        self.refresh_seek();
        self.set_list_expanded(false).await;

        match self.player.attach(video.clone()).await {
            Ok(source) => {
                self.source = Some(source);
                if let Err(e) = self.player.play().await {
                    warn!("Failed to start playback: {}", e);
                }
            }
            Err(e) => warn!("Failed to attach {}: {}", video.slug, e),
        }
        self.restart_controls_timer();

        self.emit(
            EventType::VideoStarted,
            EventPayload::Video {
                slug: video.slug.to_string(),
                title: video.title.clone(),
            },
        )
        .await;
        if from != PlayerStatus::Full {
            self.emit_status(from, PlayerStatus::Full).await;
        }
    }

    async fn close(&mut self) {
        if !self.is_open() {
            return;
        }
        info!("Closing player");
        let from = self.properties.status.get_sync();

        self.clear_countdown();
        self.controls_task = None;
        self.source = None;
        self.seek.reset();
        self.controls_requested = true;

        self.properties.current_video.set(None);
        self.properties.status.set_if_changed(PlayerStatus::Closed);
        self.properties.is_playing.set_if_changed(false);
        self.properties.current_time.set_if_changed(0.0);
        self.properties.duration.set_if_changed(0.0);
        self.properties.list_expanded.set_if_changed(false);
        self.refresh_seek();
        self.refresh_controls();

        if let Err(e) = self.player.release().await {
            warn!("Failed to release player: {}", e);
        }

        self.emit(EventType::PlayerClosed, EventPayload::Empty).await;
        self.emit_status(from, PlayerStatus::Closed).await;
    }

    async fn set_status_from(&mut self, from: PlayerStatus, to: PlayerStatus) {
        let current = self.properties.status.get_sync();
        if current != from {
            trace!(
                "Ignoring {} -> {} while {}",
                from.as_str(),
                to.as_str(),
                current.as_str()
            );
            return;
        }
        debug!("Player {} -> {}", from.as_str(), to.as_str());
        self.properties.status.set(to);
        self.emit_status(from, to).await;
    }

    async fn set_playing(&mut self, playing: bool) {
        self.properties.is_playing.set(playing);
        let result = if playing {
            self.player.play().await
        } else {
            self.player.pause().await
        };
        if let Err(e) = result {
            warn!("Failed to drive player (playing={}): {}", playing, e);
        }

        let event_type = if playing {
            EventType::PlaybackResumed
        } else {
            EventType::PlaybackPaused
        };
        let payload = self.playback_payload();
        self.emit(event_type, payload).await;
    }

    async fn commit_seek(&mut self, seconds: f64) {
        match self.player.seek_to(seconds).await {
            Ok(Some(target)) => {
                debug!("Seek committed at {:.2}s", target);
                if let Err(e) = self.event_bus.emit_seek(target).await {
                    warn!("Failed to publish seek: {}", e);
                }
            }
            Ok(None) => trace!("Seek ignored, backend not ready"),
            Err(e) => warn!("Failed to seek: {}", e),
        }
        self.restart_controls_timer();
    }

    async fn skip(&mut self, delta: f64) {
        if !self.is_open() {
            return;
        }
        match self.player.skip(delta).await {
            Ok(Some(target)) => {
                debug!("Skipped {:+.0}s to {:.2}s", delta, target);
                self.emit(
                    EventType::Skipped,
                    EventPayload::Skip {
                        delta,
                        side: SkipSide::for_delta(delta),
                        label: skip_label(delta),
                    },
                )
                .await;
            }
            Ok(None) => trace!("Skip ignored, backend not ready"),
            Err(e) => warn!("Failed to skip: {}", e),
        }
        self.restart_controls_timer();
    }

    async fn toggle_picture_in_picture(&mut self) {
        if !self.is_open() {
            return;
        }
        match self.player.toggle_picture_in_picture().await {
            Ok(Some(active)) => {
                info!("Picture-in-picture {}", if active { "on" } else { "off" });
                self.emit(
                    EventType::PictureInPictureChanged,
                    EventPayload::PictureInPicture { active },
                )
                .await;
            }
            Ok(None) => trace!("Picture-in-picture unavailable for this backend"),
            Err(e) => warn!("Failed to toggle picture-in-picture: {}", e),
        }
    }

    async fn set_list_expanded(&mut self, expanded: bool) {
        if self.properties.list_expanded.set_if_changed(expanded) {
            let event_type = if expanded {
                EventType::ListExpanded
            } else {
                EventType::ListCollapsed
            };
            self.emit(event_type, EventPayload::Empty).await;
        }
    }

    async fn start_countdown(&mut self) {
        if !self.is_open() {
            return;
        }
        self.cancel_countdown_task();

        let total = self.config.countdown_seconds;
        self.properties.countdown.set(Some(Countdown {
            seconds_remaining: total,
        }));
        self.refresh_controls();
        self.set_list_expanded(false).await;

        self.countdown_generation += 1;
        let generation = self.countdown_generation;
        let timer_tx = self.timer_tx.clone();
        self.countdown_task = Some(ScheduledTask::every(self.config.countdown_tick(), move || {
            let sent = timer_tx.send(TimerFired::CountdownTick { generation }).is_ok();
            async move { sent }
        }));

        debug!("Countdown started ({}s)", total);
        let slug = self.current_slug();
        self.emit(
            EventType::CountdownStarted,
            EventPayload::Countdown {
                slug,
                seconds: total,
            },
        )
        .await;
    }

    async fn countdown_tick(&mut self) {
        let Some(countdown) = self.properties.countdown.get_sync() else {
            return;
        };
        let remaining = countdown.seconds_remaining.saturating_sub(1);
        if remaining == 0 {
            debug!("Countdown finished");
            self.play_next().await;
        } else {
            trace!("Countdown {}s", remaining);
            self.properties.countdown.set(Some(Countdown {
                seconds_remaining: remaining,
            }));
        }
    }

    /// Advance to the next video in the current category, or settle on the
    /// ended video when there is none.
    async fn play_next(&mut self) {
        let Some(current) = self.properties.current_video.get_sync() else {
            return;
        };
        self.clear_countdown();

        match self.catalog.next_video(&current) {
            Some(next) => {
                info!("Advancing from {} to {}", current.slug, next.slug);
                self.emit(
                    EventType::AutoplayAdvanced,
                    EventPayload::Autoplay {
                        from: current.slug.to_string(),
                        to: Some(next.slug.to_string()),
                    },
                )
                .await;
                self.play_video(next).await;
            }
            None => {
                debug!("No next video after {}", current.slug);
                self.controls_task = None;
                self.controls_requested = true;
                self.refresh_controls();
                self.emit(
                    EventType::AutoplayExhausted,
                    EventPayload::Autoplay {
                        from: current.slug.to_string(),
                        to: None,
                    },
                )
                .await;
            }
        }
    }

    fn cancel_countdown_task(&mut self) {
        if let Some(task) = self.countdown_task.take() {
            task.cancel();
        }
        // Ticks already queued for the old countdown are ignored
        self.countdown_generation += 1;
    }

    fn clear_countdown(&mut self) {
        self.cancel_countdown_task();
        if self.properties.countdown.set_if_changed(None) {
            self.refresh_controls();
        }
    }

    fn restart_controls_timer(&mut self) {
        self.controls_requested = true;
        self.refresh_controls();

        self.controls_generation += 1;
        let generation = self.controls_generation;
        let timer_tx = self.timer_tx.clone();
        self.controls_task = Some(ScheduledTask::after(
            self.config.controls_hide_delay(),
            move || async move {
                let _ = timer_tx.send(TimerFired::HideControls { generation });
            },
        ));
    }

    fn refresh_controls(&self) {
        let countdown_visible = self.properties.countdown.get_sync().is_some();
        self.properties
            .show_controls
            .set_if_changed(self.controls_requested && !countdown_visible);
    }

    fn refresh_seek(&self) {
        self.properties.is_seeking.set_if_changed(self.seek.is_seeking());
        let progress = self.seek.display_progress(
            self.properties.current_time.get_sync(),
            self.properties.duration.get_sync(),
        );
        self.properties.progress.set_if_changed(progress);
    }

    async fn handle_timer(&mut self, fired: TimerFired) {
        match fired {
            TimerFired::CountdownTick { generation } => {
                if generation == self.countdown_generation && self.is_open() {
                    self.countdown_tick().await;
                } else {
                    trace!("Dropping stale countdown tick");
                }
            }
            TimerFired::HideControls { generation } => {
                if generation != self.controls_generation {
                    return;
                }
                self.controls_task = None;
                // Controls only auto-hide while media is playing
                if self.is_open() && self.properties.is_playing.get_sync() {
                    self.controls_requested = false;
                    self.refresh_controls();
                }
            }
        }
    }

    async fn handle_adapter_event(&mut self, event: AdapterEvent) {
        if self.source != Some(event.source) {
            trace!("Dropping stale backend event {:?}", event.event);
            return;
        }

        match event.event {
            BackendEvent::TimeUpdate(time) => {
                if self.seek.is_seeking() {
                    return;
                }
                let duration = self.properties.duration.get_sync();
                let time = if duration > 0.0 {
                    sanitize(time).min(duration)
                } else {
                    sanitize(time)
                };
                self.properties.current_time.set_if_changed(time);
                self.refresh_seek();
            }
            BackendEvent::DurationChanged(duration) => {
                let duration = sanitize(duration);
                self.properties.duration.set_if_changed(duration);
                if duration > 0.0 {
                    let time = self.properties.current_time.get_sync();
                    if time > duration {
                        self.properties.current_time.set(duration);
                    }
                }
                self.refresh_seek();
            }
            BackendEvent::StateChanged(state) => {
                trace!("Backend reported {}", state.as_str());
                match state {
                    BackendState::Playing => {
                        if self.properties.is_playing.set_if_changed(true) {
                            self.restart_controls_timer();
                        }
                    }
                    BackendState::Paused => {
                        self.properties.is_playing.set_if_changed(false);
                    }
                    BackendState::Unstarted | BackendState::Buffering | BackendState::Ended => {}
                }
            }
            BackendEvent::Finished => {
                info!("Playback finished");
                let payload = self.playback_payload();
                self.emit(EventType::PlaybackEnded, payload).await;
                if self.config.autoplay {
                    self.start_countdown().await;
                } else {
                    self.controls_task = None;
                    self.controls_requested = true;
                    self.refresh_controls();
                }
            }
        }
    }

    fn current_slug(&self) -> String {
        self.properties
            .current_video
            .get_sync()
            .map(|v| v.slug.to_string())
            .unwrap_or_default()
    }

    fn playback_payload(&self) -> EventPayload {
        EventPayload::Playback {
            slug: self.current_slug(),
            position: self.properties.current_time.get_sync(),
            duration: self.properties.duration.get_sync(),
        }
    }

    async fn emit(&self, event_type: EventType, payload: EventPayload) {
        if let Err(e) = self
            .event_bus
            .publish(PlayerEvent::new(event_type, payload))
            .await
        {
            warn!("Failed to publish {}: {}", event_type.as_str(), e);
        }
    }

    async fn emit_status(&self, from: PlayerStatus, to: PlayerStatus) {
        if let Err(e) = self.event_bus.emit_status_changed(from, to).await {
            warn!("Failed to publish status change: {}", e);
        }
    }
}

impl SessionHandle {
    async fn apply(&self, transition: Transition) -> AppResult<()> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SessionCommand::Apply {
                transition,
                respond_to,
            })
            .map_err(|_| AppError::ControllerDisconnected("Session"))?;
        response
            .await
            .map_err(|_| AppError::ControllerDisconnected("Session"))
    }

    /// Open the player on `video`, replacing whatever was playing
    pub async fn play_video(&self, video: Arc<Video>) -> AppResult<()> {
        self.apply(Transition::PlayVideo(video)).await
    }

    pub async fn close_player(&self) -> AppResult<()> {
        self.apply(Transition::Close).await
    }

    pub async fn minimize_player(&self) -> AppResult<()> {
        self.apply(Transition::Minimize).await
    }

    pub async fn expand_player(&self) -> AppResult<()> {
        self.apply(Transition::Expand).await
    }

    pub async fn toggle_play(&self) -> AppResult<()> {
        self.apply(Transition::TogglePlay).await
    }

    pub async fn play(&self) -> AppResult<()> {
        self.apply(Transition::Play).await
    }

    pub async fn pause(&self) -> AppResult<()> {
        self.apply(Transition::Pause).await
    }

    pub async fn start_countdown(&self) -> AppResult<()> {
        self.apply(Transition::StartCountdown).await
    }

    pub async fn cancel_countdown(&self) -> AppResult<()> {
        self.apply(Transition::CancelCountdown).await
    }

    /// Play the next video in the category now (also the countdown's "play now")
    pub async fn play_next(&self) -> AppResult<()> {
        self.apply(Transition::PlayNext).await
    }

    pub async fn seek_start(&self) -> AppResult<()> {
        self.apply(Transition::SeekStart).await
    }

    pub async fn seek_change(&self, percent: f64) -> AppResult<()> {
        self.apply(Transition::SeekChange(percent)).await
    }

    pub async fn seek_end(&self, percent: f64) -> AppResult<()> {
        self.apply(Transition::SeekEnd(percent)).await
    }

    pub async fn seek_to(&self, seconds: f64) -> AppResult<()> {
        self.apply(Transition::SeekTo(seconds)).await
    }

    pub async fn skip(&self, delta: f64) -> AppResult<()> {
        self.apply(Transition::Skip(delta)).await
    }

    /// Float the native video over other content, or bring it back
    pub async fn toggle_picture_in_picture(&self) -> AppResult<()> {
        self.apply(Transition::TogglePictureInPicture).await
    }

    /// Any user interaction with the player surface: show controls, restart the idle timer
    pub async fn interact(&self) -> AppResult<()> {
        self.apply(Transition::Interact).await
    }

    pub async fn set_list_expanded(&self, expanded: bool) -> AppResult<()> {
        self.apply(Transition::SetListExpanded(expanded)).await
    }

    /// Apply an intent produced by the gesture interpreter
    pub async fn dispatch(&self, intent: Intent) -> AppResult<()> {
        self.apply(intent.into()).await
    }

    pub async fn snapshot(&self) -> AppResult<SessionSnapshot> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SessionCommand::Snapshot { respond_to })
            .map_err(|_| AppError::ControllerDisconnected("Session"))?;
        response
            .await
            .map_err(|_| AppError::ControllerDisconnected("Session"))
    }

    pub fn current_video(&self) -> &ReadOnlyProperty<Option<Arc<Video>>> {
        &self.view.current_video
    }

    pub fn status(&self) -> &ReadOnlyProperty<PlayerStatus> {
        &self.view.status
    }

    pub fn is_playing(&self) -> &ReadOnlyProperty<bool> {
        &self.view.is_playing
    }

    pub fn current_time(&self) -> &ReadOnlyProperty<f64> {
        &self.view.current_time
    }

    pub fn duration(&self) -> &ReadOnlyProperty<f64> {
        &self.view.duration
    }

    pub fn progress(&self) -> &ReadOnlyProperty<f64> {
        &self.view.progress
    }

    pub fn show_controls(&self) -> &ReadOnlyProperty<bool> {
        &self.view.show_controls
    }

    pub fn countdown(&self) -> &ReadOnlyProperty<Option<Countdown>> {
        &self.view.countdown
    }

    pub fn list_expanded(&self) -> &ReadOnlyProperty<bool> {
        &self.view.list_expanded
    }

    pub fn is_seeking(&self) -> &ReadOnlyProperty<bool> {
        &self.view.is_seeking
    }

    pub fn subscribe_to_property(&self, property_name: &str) -> Option<PropertySubscriber> {
        self.view.subscribe(property_name)
    }

    pub fn player(&self) -> &PlayerHandle {
        &self.player
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }
}
