//! In-process host environment with a simulated clock.
//!
//! Plays media by advancing a per-instance clock on a fixed tick, scaled by a
//! speed factor, and raises the same callbacks a real widget script or media
//! element would. Used by the demo binary and end-to-end tests.

use super::host::{
    ElementEvent, MediaElement, MediaElementFactory, WidgetApi, WidgetEvent, WidgetPlayer,
};
use super::loader::BackendEnvironment;
use crate::models::{Catalog, MediaKind};
use crate::utils::AppError;
use crate::utils::time::{clamp_time, parse_time_label};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

const SIM_TICK: Duration = Duration::from_millis(100);
const SIM_API_LOAD_DELAY: Duration = Duration::from_millis(50);
const DEFAULT_SIM_DURATION: f64 = 30.0;

#[derive(Debug, Default)]
struct Clock {
    time: f64,
    duration: f64,
    playing: bool,
}

impl Clock {
    /// Advance while playing. Returns true when this step reached the end.
    fn advance(&mut self, secs: f64) -> bool {
        if !self.playing {
            return false;
        }
        self.time = (self.time + secs).min(self.duration);
        if self.time >= self.duration {
            self.playing = false;
            return true;
        }
        false
    }

    fn reset(&mut self, duration: f64) {
        self.time = 0.0;
        self.duration = duration;
        self.playing = false;
    }
}

struct SharedClock(Mutex<Clock>);

impl SharedClock {
    fn new(duration: f64) -> Arc<Self> {
        Arc::new(Self(Mutex::new(Clock {
            duration,
            ..Clock::default()
        })))
    }

    fn lock(&self) -> MutexGuard<'_, Clock> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Debug, Clone)]
struct SimConfig {
    speed: f64,
    durations: HashMap<String, f64>,
    fail_widget_load: bool,
    reject_native_play: bool,
    picture_in_picture: bool,
}

/// Builder and owner of the simulated widget API and media element factory.
#[derive(Debug, Clone)]
pub struct SimulatedHost {
    config: Arc<SimConfig>,
}

impl SimulatedHost {
    /// `speed` is simulated seconds per real second.
    pub fn new(speed: f64) -> Self {
        Self {
            config: Arc::new(SimConfig {
                speed,
                durations: HashMap::new(),
                fail_widget_load: false,
                reject_native_play: false,
                picture_in_picture: true,
            }),
        }
    }

    /// Register durations for every video, keyed by widget id or media URL.
    pub fn from_catalog(catalog: &Catalog, speed: f64) -> Self {
        let mut host = Self::new(speed);
        for video in catalog.categories().iter().flat_map(|c| c.contents.iter()) {
            let Some(duration) = parse_time_label(&video.duration_label) else {
                continue;
            };
            let key = match video.media_kind {
                MediaKind::EmbeddedWidget => video.widget_id(),
                MediaKind::Native => Some(video.media_url.clone()),
            };
            if let Some(key) = key {
                host = host.with_duration(key, duration);
            }
        }
        host
    }

    pub fn with_duration(mut self, key: impl Into<String>, seconds: f64) -> Self {
        Arc::make_mut(&mut self.config)
            .durations
            .insert(key.into(), seconds);
        self
    }

    /// Make the widget script fail to load.
    pub fn with_failing_widget_api(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail_widget_load = true;
        self
    }

    /// Make native `play()` calls rejected, as an autoplay policy would.
    pub fn with_rejected_native_play(mut self) -> Self {
        Arc::make_mut(&mut self.config).reject_native_play = true;
        self
    }

    /// Behave like an environment without picture-in-picture support.
    pub fn without_picture_in_picture(mut self) -> Self {
        Arc::make_mut(&mut self.config).picture_in_picture = false;
        self
    }

    fn duration_for(&self, key: &str) -> f64 {
        self.config
            .durations
            .get(key)
            .copied()
            .unwrap_or(DEFAULT_SIM_DURATION)
    }

    fn step(&self) -> f64 {
        SIM_TICK.as_secs_f64() * self.config.speed
    }

    pub fn widget_api(&self) -> Arc<dyn WidgetApi> {
        Arc::new(SimulatedWidgetApi { host: self.clone() })
    }

    pub fn media_factory(&self) -> Arc<dyn MediaElementFactory> {
        Arc::new(SimulatedMediaFactory { host: self.clone() })
    }

    pub fn environment(&self, poll_interval: Duration) -> BackendEnvironment {
        BackendEnvironment::new(self.widget_api(), self.media_factory(), poll_interval)
    }
}

fn spawn_ticker<F>(clock: Arc<SharedClock>, step: f64, mut on_tick: F) -> JoinHandle<()>
where
    F: FnMut(&Clock, bool) -> bool + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SIM_TICK);
        loop {
            interval.tick().await;
            let keep_going = {
                let mut clock = clock.lock();
                let was_playing = clock.playing;
                let ended = clock.advance(step);
                if was_playing || ended {
                    on_tick(&clock, ended)
                } else {
                    true
                }
            };
            if !keep_going {
                break;
            }
        }
    })
}

struct SimulatedWidgetApi {
    host: SimulatedHost,
}

#[async_trait]
impl WidgetApi for SimulatedWidgetApi {
    async fn load(&self) -> Result<()> {
        tokio::time::sleep(SIM_API_LOAD_DELAY).await;
        if self.host.config.fail_widget_load {
            return Err(AppError::WidgetApiUnavailable("script blocked".into()).into());
        }
        debug!("Simulated widget API loaded");
        Ok(())
    }

    async fn create_player(
        &self,
        video_id: &str,
        events: mpsc::UnboundedSender<WidgetEvent>,
    ) -> Result<Arc<dyn WidgetPlayer>> {
        let clock = SharedClock::new(self.host.duration_for(video_id));
        let tick_events = events.clone();
        let ticker = spawn_ticker(clock.clone(), self.host.step(), move |_, ended| {
            if ended {
                return tick_events.send(WidgetEvent::StateChange(0)).is_ok();
            }
            !tick_events.is_closed()
        });

        let _ = events.send(WidgetEvent::Ready);
        Ok(Arc::new(SimulatedWidget {
            host: self.host.clone(),
            clock,
            events,
            ticker: Mutex::new(Some(ticker)),
        }))
    }
}

struct SimulatedWidget {
    host: SimulatedHost,
    clock: Arc<SharedClock>,
    events: mpsc::UnboundedSender<WidgetEvent>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl SimulatedWidget {
    fn ensure_alive(&self) -> Result<()> {
        let alive = self
            .ticker
            .lock()
            .map(|ticker| ticker.is_some())
            .unwrap_or(false);
        if alive {
            Ok(())
        } else {
            Err(AppError::Playback("widget destroyed".into()).into())
        }
    }
}

#[async_trait]
impl WidgetPlayer for SimulatedWidget {
    async fn play_video(&self) -> Result<()> {
        self.ensure_alive()?;
        {
            let mut clock = self.clock.lock();
            if clock.time >= clock.duration {
                clock.time = 0.0;
            }
            clock.playing = true;
        }
        let _ = self.events.send(WidgetEvent::StateChange(3));
        let _ = self.events.send(WidgetEvent::StateChange(1));
        Ok(())
    }

    async fn pause_video(&self) -> Result<()> {
        self.ensure_alive()?;
        self.clock.lock().playing = false;
        let _ = self.events.send(WidgetEvent::StateChange(2));
        Ok(())
    }

    async fn seek_to(&self, seconds: f64, _allow_seek_ahead: bool) -> Result<()> {
        self.ensure_alive()?;
        let mut clock = self.clock.lock();
        clock.time = clamp_time(seconds, clock.duration);
        Ok(())
    }

    async fn load_video_by_id(&self, video_id: &str) -> Result<()> {
        self.ensure_alive()?;
        {
            let mut clock = self.clock.lock();
            clock.reset(self.host.duration_for(video_id));
            clock.playing = true;
        }
        trace!("Simulated widget loading {}", video_id);
        let _ = self.events.send(WidgetEvent::StateChange(-1));
        let _ = self.events.send(WidgetEvent::StateChange(1));
        Ok(())
    }

    async fn current_time(&self) -> Result<f64> {
        self.ensure_alive()?;
        Ok(self.clock.lock().time)
    }

    async fn duration(&self) -> Result<f64> {
        self.ensure_alive()?;
        Ok(self.clock.lock().duration)
    }

    async fn destroy(&self) -> Result<()> {
        if let Ok(mut ticker) = self.ticker.lock()
            && let Some(handle) = ticker.take()
        {
            handle.abort();
        }
        Ok(())
    }
}

struct SimulatedMediaFactory {
    host: SimulatedHost,
}

#[async_trait]
impl MediaElementFactory for SimulatedMediaFactory {
    async fn create(
        &self,
        source_url: &str,
        events: mpsc::UnboundedSender<ElementEvent>,
    ) -> Result<Arc<dyn MediaElement>> {
        if source_url.is_empty() {
            return Err(AppError::BackendInit("empty media source".into()).into());
        }

        let clock = SharedClock::new(self.host.duration_for(source_url));
        let tick_events = events.clone();
        let ticker = spawn_ticker(clock.clone(), self.host.step(), move |clock, ended| {
            if tick_events.send(ElementEvent::TimeUpdate(clock.time)).is_err() {
                return false;
            }
            if ended {
                let _ = tick_events.send(ElementEvent::Ended);
            }
            true
        });

        let _ = events.send(ElementEvent::LoadedMetadata(clock.lock().duration));
        Ok(Arc::new(SimulatedElement {
            host: self.host.clone(),
            clock,
            events,
            ticker: Mutex::new(Some(ticker)),
            floating: AtomicBool::new(false),
        }))
    }
}

struct SimulatedElement {
    host: SimulatedHost,
    clock: Arc<SharedClock>,
    events: mpsc::UnboundedSender<ElementEvent>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    floating: AtomicBool,
}

#[async_trait]
impl MediaElement for SimulatedElement {
    async fn play(&self) -> Result<()> {
        if self.host.config.reject_native_play {
            return Err(AppError::PlaybackRejected("autoplay not allowed".into()).into());
        }
        {
            let mut clock = self.clock.lock();
            if clock.time >= clock.duration {
                clock.time = 0.0;
            }
            clock.playing = true;
        }
        let _ = self.events.send(ElementEvent::Playing);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.clock.lock().playing = false;
        let _ = self.events.send(ElementEvent::Pause);
        Ok(())
    }

    async fn set_current_time(&self, seconds: f64) -> Result<()> {
        let time = {
            let mut clock = self.clock.lock();
            clock.time = clamp_time(seconds, clock.duration);
            clock.time
        };
        let _ = self.events.send(ElementEvent::TimeUpdate(time));
        Ok(())
    }

    async fn current_time(&self) -> f64 {
        self.clock.lock().time
    }

    async fn duration(&self) -> f64 {
        self.clock.lock().duration
    }

    async fn set_source(&self, source_url: &str) -> Result<()> {
        let duration = self.host.duration_for(source_url);
        self.clock.lock().reset(duration);
        let _ = self.events.send(ElementEvent::LoadedMetadata(duration));
        Ok(())
    }

    async fn toggle_picture_in_picture(&self) -> Result<bool> {
        if !self.host.config.picture_in_picture {
            return Err(AppError::Playback("picture-in-picture not supported".into()).into());
        }
        let active = !self.floating.fetch_xor(true, Ordering::SeqCst);
        trace!("Simulated element floating: {}", active);
        Ok(active)
    }

    async fn release(&self) {
        if let Ok(mut ticker) = self.ticker.lock()
            && let Some(handle) = ticker.take()
        {
            handle.abort();
        }
    }
}
