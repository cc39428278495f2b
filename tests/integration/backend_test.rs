use crate::common::mocks::{MockMediaFactory, MockWidgetApi};
use crate::common::{TestSession, eventually, settle};
use feedreel::config::PlayerConfig;
use feedreel::core::{Countdown, PlayerStatus};
use feedreel::events::{EventPayload, EventType};
use feedreel::models::MediaKind;
use feedreel::player::{ElementEvent, WidgetApiLoader, WidgetEvent};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_widget_api_loads_once_for_concurrent_callers() {
    let api = Arc::new(MockWidgetApi::new());
    api.set_load_delay(Duration::from_millis(50));
    let loader = Arc::new(WidgetApiLoader::new(api.clone()));

    let calls = (0..5).map(|_| {
        let loader = loader.clone();
        async move { loader.ensure_loaded().await.is_ok() }
    });
    let results = futures::future::join_all(calls).await;

    assert!(results.into_iter().all(|ok| ok));
    assert_eq!(api.load_calls.load(Ordering::SeqCst), 1);
    assert_eq!(loader.load_attempts(), 1);
    assert!(loader.is_loaded());

    loader.ensure_loaded().await.unwrap();
    assert_eq!(api.load_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_widget_api_load_is_retried() {
    let api = Arc::new(MockWidgetApi::new());
    api.fail_next_loads(1);
    let loader = WidgetApiLoader::new(api.clone());

    assert!(loader.ensure_loaded().await.is_err());
    assert!(!loader.is_loaded());

    assert!(loader.ensure_loaded().await.is_ok());
    assert!(loader.is_loaded());
    assert_eq!(loader.load_attempts(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_widget_init_failure_stays_inert() {
    let widgets = MockWidgetApi::new();
    widgets.fail_next_loads(1);
    let t = TestSession::build(PlayerConfig::default(), widgets, MockMediaFactory::new());

    t.session.play_video(t.video("v1")).await.unwrap();
    settle().await;

    // Session state reflects the user's intent even though nothing plays
    assert_eq!(t.session.status().get_sync(), PlayerStatus::Full);
    assert!(t.session.is_playing().get_sync());
    assert_eq!(t.widgets.player_count(), 0);
    assert_eq!(
        t.session.player().active_kind().await.unwrap(),
        Some(MediaKind::EmbeddedWidget)
    );

    // Seeks and skips are no-ops on an inert backend
    t.session.skip(10.0).await.unwrap();
    t.session.seek_to(30.0).await.unwrap();
    assert_eq!(t.session.current_time().get_sync(), 0.0);
    assert_eq!(t.count_events(EventType::Skipped).await, 0);
    assert_eq!(t.count_events(EventType::SeekCommitted).await, 0);

    // The next widget video loads the script again
    t.session.play_video(t.video("v2")).await.unwrap();
    eventually("widget created", || t.widgets.player_count() == 1).await;
    assert_eq!(t.widgets.load_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_native_init_failure_stays_inert() {
    let media = MockMediaFactory::new();
    media.fail_create();
    let t = TestSession::build(PlayerConfig::default(), MockWidgetApi::new(), media);

    t.session.play_video(t.video("m-native")).await.unwrap();

    assert_eq!(t.session.status().get_sync(), PlayerStatus::Full);
    assert!(t.session.is_playing().get_sync());
    assert_eq!(t.session.player().active_kind().await.unwrap(), None);
    assert_eq!(t.session.player().get_position().await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_native_play_keeps_intent() {
    let media = MockMediaFactory::new();
    media.reject_play();
    let t = TestSession::build(PlayerConfig::default(), MockWidgetApi::new(), media);

    t.session.play_video(t.video("m-native")).await.unwrap();

    let element = t.media.latest().unwrap();
    assert!(element.has_call("play"));
    assert!(t.session.is_playing().get_sync());
}

#[tokio::test(start_paused = true)]
async fn test_native_element_reports_time_and_end() {
    let t = TestSession::new();
    t.session.play_video(t.video("m-native")).await.unwrap();
    let element = t.media.latest().unwrap();
    assert_eq!(*element.url.lock().unwrap(), "https://cdn.example.com/video/m-native.mp4");

    element.load_metadata(60.0);
    element.emit(ElementEvent::Playing);
    element.advance_to(15.0);
    eventually("time", || t.session.current_time().get_sync() == 15.0).await;
    assert_eq!(t.session.duration().get_sync(), 60.0);
    assert_eq!(t.session.progress().get_sync(), 25.0);

    element.emit(ElementEvent::Pause);
    eventually("paused", || !t.session.is_playing().get_sync()).await;
    element.emit(ElementEvent::Playing);
    eventually("playing", || t.session.is_playing().get_sync()).await;

    element.emit(ElementEvent::Ended);
    eventually("countdown", || {
        t.session.countdown().get_sync() == Some(Countdown { seconds_remaining: 3 })
    })
    .await;
    assert_eq!(t.count_events(EventType::PlaybackEnded).await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_native_element_reused_for_native_video() {
    let t = TestSession::new();
    t.session.play_video(t.video("m-native")).await.unwrap();
    let element = t.media.latest().unwrap();
    element.load_metadata(60.0);
    element.advance_to(20.0);
    eventually("time", || t.session.current_time().get_sync() == 20.0).await;

    t.session.play_next().await.unwrap();

    assert_eq!(t.current_slug().as_deref(), Some("m-native-2"));
    assert_eq!(t.media.element_count(), 1);
    assert!(element.has_call("source:https://cdn.example.com/video/m-native-2.mp4"));
    assert!(!element.is_released());
    assert_eq!(t.session.current_time().get_sync(), 0.0);
    assert_eq!(t.session.duration().get_sync(), 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_switching_backend_kind_releases_previous() {
    let t = TestSession::new();
    t.session.play_video(t.video("m-widget")).await.unwrap();
    eventually("widget created", || t.widgets.player_count() == 1).await;
    let widget = t.widgets.latest().unwrap();
    widget.emit(WidgetEvent::Ready);
    widget.emit(WidgetEvent::StateChange(1));
    widget.set_time(30.0);
    eventually("polled time", || t.session.current_time().get_sync() == 30.0).await;
    assert!(t.session.player().is_polling().await.unwrap());

    t.session.play_video(t.video("m-native")).await.unwrap();

    // Fresh position until the new backend reports
    let snapshot = t.session.snapshot().await.unwrap();
    assert_eq!(snapshot.current_time, 0.0);
    assert_eq!(snapshot.duration, 0.0);

    assert!(widget.is_destroyed());
    assert!(!t.session.player().is_polling().await.unwrap());
    assert_eq!(
        t.session.player().active_kind().await.unwrap(),
        Some(MediaKind::Native)
    );
    assert_eq!(t.media.element_count(), 1);

    // A late sample from the old widget never reaches the session
    widget.set_time(90.0);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(t.session.current_time().get_sync(), 0.0);

    let element = t.media.latest().unwrap();
    element.load_metadata(45.0);
    eventually("new duration", || t.session.duration().get_sync() == 45.0).await;
}

#[tokio::test(start_paused = true)]
async fn test_superseded_widget_load_never_creates_player() {
    let widgets = MockWidgetApi::new();
    widgets.set_load_delay(Duration::from_millis(100));
    let t = TestSession::build(PlayerConfig::default(), widgets, MockMediaFactory::new());

    t.session.play_video(t.video("m-widget")).await.unwrap();
    t.session.play_video(t.video("m-native")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(t.widgets.player_count(), 0);
    assert_eq!(t.media.element_count(), 1);
    assert_eq!(
        t.session.player().active_kind().await.unwrap(),
        Some(MediaKind::Native)
    );
}

#[tokio::test(start_paused = true)]
async fn test_unready_widget_is_rebuilt_not_reused() {
    let t = TestSession::new();
    t.session.play_video(t.video("v1")).await.unwrap();
    eventually("first widget", || t.widgets.player_count() == 1).await;
    let first = t.widgets.latest().unwrap();

    t.session.play_video(t.video("v2")).await.unwrap();
    eventually("second widget", || t.widgets.player_count() == 2).await;

    assert!(first.is_destroyed());
    let second = t.widgets.latest().unwrap();
    assert_eq!(*second.video_id.lock().unwrap(), "v2");
    assert_eq!(t.widgets.load_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_widget_seek_reports_target_immediately() {
    let t = TestSession::new();
    t.session.play_video(t.video("v1")).await.unwrap();
    eventually("widget created", || t.widgets.player_count() == 1).await;
    let widget = t.widgets.latest().unwrap();
    widget.set_duration(200.0);
    widget.emit(WidgetEvent::Ready);
    eventually("duration", || t.session.duration().get_sync() == 200.0).await;

    // Widget still reports the old position; the target shows right away
    t.session.seek_to(80.0).await.unwrap();
    eventually("optimistic time", || t.session.current_time().get_sync() == 80.0).await;
    assert!(widget.has_call("seek:80"));

    t.session.seek_to(500.0).await.unwrap();
    assert!(widget.has_call("seek:200"));
    assert_eq!(t.count_events(EventType::SeekCommitted).await, 2);
}

#[tokio::test(start_paused = true)]
async fn test_native_picture_in_picture_toggles() {
    let t = TestSession::new();
    t.session.play_video(t.video("m-native")).await.unwrap();
    let element = t.media.latest().unwrap();

    t.session.toggle_picture_in_picture().await.unwrap();
    assert!(element.is_floating());
    t.session.toggle_picture_in_picture().await.unwrap();
    assert!(!element.is_floating());
    assert!(element.has_call("pip:enter"));
    assert!(element.has_call("pip:exit"));

    let states: Vec<bool> = t
        .event_bus
        .get_history()
        .await
        .into_iter()
        .filter_map(|e| match e.payload {
            EventPayload::PictureInPicture { active } => Some(active),
            _ => None,
        })
        .collect();
    assert_eq!(states, vec![true, false]);

    // Playback state is untouched
    assert_eq!(t.session.status().get_sync(), PlayerStatus::Full);
    assert!(t.session.is_playing().get_sync());
}

#[tokio::test(start_paused = true)]
async fn test_picture_in_picture_ignored_for_widget() {
    let t = TestSession::new();
    t.session.play_video(t.video("m-widget")).await.unwrap();
    eventually("widget created", || t.widgets.player_count() == 1).await;
    let widget = t.widgets.latest().unwrap();
    widget.emit(WidgetEvent::Ready);
    settle().await;
    let calls_before = widget.calls().len();

    t.session.toggle_picture_in_picture().await.unwrap();

    assert_eq!(widget.calls().len(), calls_before);
    assert_eq!(t.count_events(EventType::PictureInPictureChanged).await, 0);
    assert_eq!(t.session.player().toggle_picture_in_picture().await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_refused_picture_in_picture_is_logged_and_ignored() {
    let media = MockMediaFactory::new();
    media.disable_picture_in_picture();
    let t = TestSession::build(PlayerConfig::default(), MockWidgetApi::new(), media);
    t.session.play_video(t.video("m-native")).await.unwrap();

    t.session.toggle_picture_in_picture().await.unwrap();

    let element = t.media.latest().unwrap();
    assert!(!element.is_floating());
    assert_eq!(t.count_events(EventType::PictureInPictureChanged).await, 0);
    assert_eq!(t.session.status().get_sync(), PlayerStatus::Full);
}

#[tokio::test(start_paused = true)]
async fn test_picture_in_picture_needs_open_player() {
    let t = TestSession::new();
    t.session.play_video(t.video("m-native")).await.unwrap();
    let element = t.media.latest().unwrap();
    t.session.close_player().await.unwrap();

    t.session.toggle_picture_in_picture().await.unwrap();
    assert!(!element.has_call("pip:enter"));
}
