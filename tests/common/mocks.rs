use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use feedreel::player::{
    ElementEvent, MediaElement, MediaElementFactory, WidgetApi, WidgetEvent, WidgetPlayer,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Scriptable widget script. Players are recorded so tests can drive their callbacks.
pub struct MockWidgetApi {
    pub load_calls: AtomicUsize,
    load_delay: Mutex<Duration>,
    failing_loads: AtomicUsize,
    default_duration: Mutex<f64>,
    pub players: Mutex<Vec<Arc<MockWidgetPlayer>>>,
}

impl MockWidgetApi {
    pub fn new() -> Self {
        Self {
            load_calls: AtomicUsize::new(0),
            load_delay: Mutex::new(Duration::ZERO),
            failing_loads: AtomicUsize::new(0),
            default_duration: Mutex::new(120.0),
            players: Mutex::new(Vec::new()),
        }
    }

    pub fn set_load_delay(&self, delay: Duration) {
        *self.load_delay.lock().unwrap() = delay;
    }

    /// The next `count` loads fail.
    pub fn fail_next_loads(&self, count: usize) {
        self.failing_loads.store(count, Ordering::SeqCst);
    }

    pub fn set_default_duration(&self, seconds: f64) {
        *self.default_duration.lock().unwrap() = seconds;
    }

    pub fn player_count(&self) -> usize {
        self.players.lock().unwrap().len()
    }

    pub fn latest(&self) -> Option<Arc<MockWidgetPlayer>> {
        self.players.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl WidgetApi for MockWidgetApi {
    async fn load(&self) -> Result<()> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.load_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let failing = self.failing_loads.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_loads.store(failing - 1, Ordering::SeqCst);
            bail!("widget script blocked");
        }
        Ok(())
    }

    async fn create_player(
        &self,
        video_id: &str,
        events: mpsc::UnboundedSender<WidgetEvent>,
    ) -> Result<Arc<dyn WidgetPlayer>> {
        let duration = *self.default_duration.lock().unwrap();
        let player = Arc::new(MockWidgetPlayer::new(video_id, events, duration));
        self.players.lock().unwrap().push(player.clone());
        Ok(player)
    }
}

pub struct MockWidgetPlayer {
    pub video_id: Mutex<String>,
    events: mpsc::UnboundedSender<WidgetEvent>,
    time: Mutex<f64>,
    duration: Mutex<f64>,
    pub calls: Mutex<Vec<String>>,
    destroyed: AtomicBool,
}

impl MockWidgetPlayer {
    fn new(video_id: &str, events: mpsc::UnboundedSender<WidgetEvent>, duration: f64) -> Self {
        Self {
            video_id: Mutex::new(video_id.to_string()),
            events,
            time: Mutex::new(0.0),
            duration: Mutex::new(duration),
            calls: Mutex::new(Vec::new()),
            destroyed: AtomicBool::new(false),
        }
    }

    pub fn emit(&self, event: WidgetEvent) {
        let _ = self.events.send(event);
    }

    pub fn set_time(&self, seconds: f64) {
        *self.time.lock().unwrap() = seconds;
    }

    pub fn set_duration(&self, seconds: f64) {
        *self.duration.lock().unwrap() = seconds;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn has_call(&self, call: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| c == call)
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    fn record(&self, call: String) -> Result<()> {
        if self.is_destroyed() {
            return Err(anyhow!("widget destroyed"));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl WidgetPlayer for MockWidgetPlayer {
    async fn play_video(&self) -> Result<()> {
        self.record("play".to_string())
    }

    async fn pause_video(&self) -> Result<()> {
        self.record("pause".to_string())
    }

    async fn seek_to(&self, seconds: f64, _allow_seek_ahead: bool) -> Result<()> {
        self.record(format!("seek:{}", seconds))
    }

    async fn load_video_by_id(&self, video_id: &str) -> Result<()> {
        self.record(format!("load:{}", video_id))?;
        *self.video_id.lock().unwrap() = video_id.to_string();
        *self.time.lock().unwrap() = 0.0;
        Ok(())
    }

    async fn current_time(&self) -> Result<f64> {
        Ok(*self.time.lock().unwrap())
    }

    async fn duration(&self) -> Result<f64> {
        Ok(*self.duration.lock().unwrap())
    }

    async fn destroy(&self) -> Result<()> {
        self.calls.lock().unwrap().push("destroy".to_string());
        self.destroyed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Native element factory whose elements are driven by the test.
pub struct MockMediaFactory {
    pub elements: Mutex<Vec<Arc<MockElement>>>,
    fail_create: AtomicBool,
    reject_play: AtomicBool,
    no_picture_in_picture: AtomicBool,
}

impl MockMediaFactory {
    pub fn new() -> Self {
        Self {
            elements: Mutex::new(Vec::new()),
            fail_create: AtomicBool::new(false),
            reject_play: AtomicBool::new(false),
            no_picture_in_picture: AtomicBool::new(false),
        }
    }

    pub fn fail_create(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    pub fn reject_play(&self) {
        self.reject_play.store(true, Ordering::SeqCst);
    }

    pub fn disable_picture_in_picture(&self) {
        self.no_picture_in_picture.store(true, Ordering::SeqCst);
    }

    pub fn element_count(&self) -> usize {
        self.elements.lock().unwrap().len()
    }

    pub fn latest(&self) -> Option<Arc<MockElement>> {
        self.elements.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl MediaElementFactory for MockMediaFactory {
    async fn create(
        &self,
        source_url: &str,
        events: mpsc::UnboundedSender<ElementEvent>,
    ) -> Result<Arc<dyn MediaElement>> {
        if self.fail_create.load(Ordering::SeqCst) {
            bail!("media element unavailable");
        }
        let element = Arc::new(MockElement {
            url: Mutex::new(source_url.to_string()),
            events,
            time: Mutex::new(0.0),
            duration: Mutex::new(f64::NAN),
            calls: Mutex::new(Vec::new()),
            reject_play: self.reject_play.load(Ordering::SeqCst),
            picture_in_picture: !self.no_picture_in_picture.load(Ordering::SeqCst),
            floating: AtomicBool::new(false),
            released: AtomicBool::new(false),
        });
        self.elements.lock().unwrap().push(element.clone());
        Ok(element)
    }
}

pub struct MockElement {
    pub url: Mutex<String>,
    events: mpsc::UnboundedSender<ElementEvent>,
    time: Mutex<f64>,
    duration: Mutex<f64>,
    pub calls: Mutex<Vec<String>>,
    reject_play: bool,
    picture_in_picture: bool,
    floating: AtomicBool,
    released: AtomicBool,
}

impl MockElement {
    pub fn emit(&self, event: ElementEvent) {
        let _ = self.events.send(event);
    }

    /// Report metadata the way a real element does once the source is parsed.
    pub fn load_metadata(&self, duration: f64) {
        *self.duration.lock().unwrap() = duration;
        self.emit(ElementEvent::LoadedMetadata(duration));
    }

    /// Move the playhead and report it.
    pub fn advance_to(&self, seconds: f64) {
        *self.time.lock().unwrap() = seconds;
        self.emit(ElementEvent::TimeUpdate(seconds));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn has_call(&self, call: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| c == call)
    }

    pub fn is_floating(&self) -> bool {
        self.floating.load(Ordering::SeqCst)
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaElement for MockElement {
    async fn play(&self) -> Result<()> {
        self.calls.lock().unwrap().push("play".to_string());
        if self.reject_play {
            bail!("playback requires a user gesture");
        }
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.calls.lock().unwrap().push("pause".to_string());
        Ok(())
    }

    async fn set_current_time(&self, seconds: f64) -> Result<()> {
        self.calls.lock().unwrap().push(format!("seek:{}", seconds));
        *self.time.lock().unwrap() = seconds;
        Ok(())
    }

    async fn current_time(&self) -> f64 {
        *self.time.lock().unwrap()
    }

    async fn duration(&self) -> f64 {
        *self.duration.lock().unwrap()
    }

    async fn set_source(&self, source_url: &str) -> Result<()> {
        self.calls.lock().unwrap().push(format!("source:{}", source_url));
        *self.url.lock().unwrap() = source_url.to_string();
        *self.time.lock().unwrap() = 0.0;
        *self.duration.lock().unwrap() = f64::NAN;
        Ok(())
    }

    async fn toggle_picture_in_picture(&self) -> Result<bool> {
        if !self.picture_in_picture {
            bail!("picture-in-picture is not enabled");
        }
        let active = !self.floating.fetch_xor(true, Ordering::SeqCst);
        let call = if active { "pip:enter" } else { "pip:exit" };
        self.calls.lock().unwrap().push(call.to_string());
        Ok(active)
    }

    async fn release(&self) {
        self.calls.lock().unwrap().push("release".to_string());
        self.released.store(true, Ordering::SeqCst);
    }
}
