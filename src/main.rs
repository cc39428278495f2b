use anyhow::{Context, Result};
use feedreel::config::Config;
use feedreel::constants::EVENT_BUS_CAPACITY;
use feedreel::core::{PlayerStatus, SessionController, SessionHandle};
use feedreel::events::EventBus;
use feedreel::gesture::{DoubleTapDetector, DragInfo, GestureInterpreter, Intent};
use feedreel::models::Catalog;
use feedreel::player::simulated::SimulatedHost;
use feedreel::utils::format_time;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEMO_CATALOG: &str = include_str!("../demos/catalog.json");
/// Simulated playback runs this many times faster than real time.
const DEMO_SPEED: f64 = 8.0;
const SURFACE_WIDTH: f64 = 390.0;

struct Args {
    catalog: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        catalog: None,
        config: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config expects a path")?;
                args.config = Some(PathBuf::from(path));
            }
            _ => args.catalog = Some(PathBuf::from(arg)),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting feedreel demo session");

    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => Catalog::from_json(DEMO_CATALOG)?,
    };
    let catalog = Arc::new(catalog);

    let host = SimulatedHost::from_catalog(&catalog, DEMO_SPEED);
    let env = host.environment(config.player.poll_interval());
    let event_bus = Arc::new(EventBus::new(EVENT_BUS_CAPACITY));
    let session = SessionController::spawn(
        catalog.clone(),
        config.player.clone(),
        env,
        event_bus.clone(),
    );

    let mut events = event_bus.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!(event = event.event_type.as_str(), payload = ?event.payload, "Session event");
        }
    });

    run_script(&session, &catalog, &config).await?;

    let stats = event_bus.get_stats().await;
    info!(
        "Demo finished: {} events published, {} subscribers",
        stats.total_events, stats.subscriber_count
    );
    Ok(())
}

async fn run_script(session: &SessionHandle, catalog: &Catalog, config: &Config) -> Result<()> {
    let interpreter = GestureInterpreter::new(config.gestures.clone());
    let mut taps = DoubleTapDetector::new(
        config.gestures.double_tap_window(),
        config.player.skip_seconds,
    );

    let first = catalog
        .categories()
        .iter()
        .find_map(|c| c.contents.first().cloned())
        .context("Catalog has no videos")?;

    for related in catalog.related(&first) {
        info!("Related: {} ({})", related.title, related.duration_label);
    }

    session.play_video(first.clone()).await?;
    tokio::time::sleep(Duration::from_secs(1)).await;
    log_position(session, "after start");

    // Double-tap the right third
    let now = Instant::now();
    for offset in [0, 200] {
        let intent = taps.on_tap(
            SURFACE_WIDTH * 0.9,
            SURFACE_WIDTH,
            now + Duration::from_millis(offset),
        );
        session.dispatch(intent).await?;
    }
    log_position(session, "after skip");

    // Pull the player down, then tap the mini player to bring it back
    let pull = DragInfo::vertical(140.0, 80.0);
    info!(
        "Drag feedback at release: {:.2}",
        interpreter.drag_feedback(pull.offset.y)
    );
    if let Some(intent) = interpreter.classify_player_drag(&pull) {
        session.dispatch(intent).await?;
    }
    info!("Status: {}", session.status().get_sync().as_str());
    session.dispatch(Intent::Expand).await?;

    let expanded = session.list_expanded().get_sync();
    if let Some(intent) = interpreter.classify_list_drag(&DragInfo::vertical(-60.0, 0.0), expanded)
    {
        session.dispatch(intent).await?;
    }

    session.seek_start().await?;
    session.seek_change(40.0).await?;
    session.seek_change(70.0).await?;
    session.seek_end(70.0).await?;
    log_position(session, "after seek");

    // Let the video finish and the countdown move on
    let mut current = session.current_video().watch();
    let advanced = tokio::time::timeout(Duration::from_secs(30), async {
        loop {
            if current.changed().await.is_err() {
                return None;
            }
            let next = current.borrow_and_update().clone();
            if let Some(next) = next
                && next.slug != first.slug
            {
                return Some(next);
            }
        }
    })
    .await;

    match advanced {
        Ok(Some(next)) => info!("Autoplay advanced to {}", next.title),
        Ok(None) => warn!("Session ended before autoplay advanced"),
        Err(_) => warn!("Timed out waiting for autoplay"),
    }

    session.toggle_picture_in_picture().await?;

    // Swipe the mini player away
    session.minimize_player().await?;
    if let Some(intent) = interpreter.classify_mini_drag(&DragInfo::horizontal(150.0, 0.0)) {
        session.dispatch(intent).await?;
    }

    let snapshot = session.snapshot().await?;
    if snapshot.status != PlayerStatus::Closed {
        warn!("Session still open: {:?}", snapshot.status);
    }
    Ok(())
}

fn log_position(session: &SessionHandle, label: &str) {
    info!(
        "Position {}: {} / {} ({:.0}%)",
        label,
        format_time(session.current_time().get_sync()),
        format_time(session.duration().get_sync()),
        session.progress().get_sync()
    );
}
