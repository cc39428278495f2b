#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;

use feedreel::config::PlayerConfig;
use feedreel::constants::EVENT_BUS_CAPACITY;
use feedreel::core::{SessionController, SessionHandle};
use feedreel::events::{EventBus, EventType};
use feedreel::models::{Catalog, Video};
use feedreel::player::BackendEnvironment;
use fixtures::Fixtures;
use mocks::{MockMediaFactory, MockWidgetApi};
use std::sync::Arc;
use std::time::Duration;

pub struct TestSession {
    pub session: SessionHandle,
    pub widgets: Arc<MockWidgetApi>,
    pub media: Arc<MockMediaFactory>,
    pub event_bus: Arc<EventBus>,
    pub catalog: Arc<Catalog>,
}

impl TestSession {
    pub fn new() -> Self {
        Self::with_config(PlayerConfig::default())
    }

    pub fn with_config(config: PlayerConfig) -> Self {
        Self::build(config, MockWidgetApi::new(), MockMediaFactory::new())
    }

    pub fn build(config: PlayerConfig, widgets: MockWidgetApi, media: MockMediaFactory) -> Self {
        let widgets = Arc::new(widgets);
        let media = Arc::new(media);
        let catalog = Arc::new(Fixtures::catalog());
        let event_bus = Arc::new(EventBus::new(EVENT_BUS_CAPACITY));
        let env = BackendEnvironment::new(widgets.clone(), media.clone(), config.poll_interval());
        let session =
            SessionController::spawn(catalog.clone(), config, env, event_bus.clone());

        Self {
            session,
            widgets,
            media,
            event_bus,
            catalog,
        }
    }

    pub fn video(&self, slug: &str) -> Arc<Video> {
        Fixtures::video(&self.catalog, slug)
    }

    pub fn current_slug(&self) -> Option<String> {
        self.session
            .current_video()
            .get_sync()
            .map(|v| v.slug.to_string())
    }

    pub async fn count_events(&self, event_type: EventType) -> usize {
        self.event_bus
            .get_history()
            .await
            .iter()
            .filter(|e| e.event_type == event_type)
            .count()
    }
}

/// Poll `condition` in small steps until it holds; panics after ~2s.
pub async fn eventually<F>(what: &str, condition: F)
where
    F: Fn() -> bool,
{
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("timed out waiting for {}", what);
}

/// Let spawned tasks drain without moving the clock much.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}
