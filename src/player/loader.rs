use super::host::{MediaElementFactory, WidgetApi};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Loads the embedded widget script at most once per process.
///
/// Concurrent callers during a load wait on the same in-flight attempt. A
/// failed load is not cached, so the next caller tries again.
pub struct WidgetApiLoader {
    api: Arc<dyn WidgetApi>,
    loaded: OnceCell<()>,
    attempts: AtomicUsize,
}

impl WidgetApiLoader {
    pub fn new(api: Arc<dyn WidgetApi>) -> Self {
        Self {
            api,
            loaded: OnceCell::new(),
            attempts: AtomicUsize::new(0),
        }
    }

    pub async fn ensure_loaded(&self) -> Result<Arc<dyn WidgetApi>> {
        self.loaded
            .get_or_try_init(|| async {
                let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
                info!("Loading embedded widget API (attempt {})", attempt);
                self.api
                    .load()
                    .await
                    .context("Failed to load embedded widget API")
            })
            .await?;
        debug!("Embedded widget API ready");
        Ok(self.api.clone())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }

    /// Number of load attempts actually issued against the host.
    pub fn load_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

/// Everything a backend needs from the host, shared by all backend instances.
#[derive(Clone)]
pub struct BackendEnvironment {
    pub widget_api: Arc<WidgetApiLoader>,
    pub media: Arc<dyn MediaElementFactory>,
    pub poll_interval: Duration,
}

impl BackendEnvironment {
    pub fn new(
        widget_api: Arc<dyn WidgetApi>,
        media: Arc<dyn MediaElementFactory>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            widget_api: Arc::new(WidgetApiLoader::new(widget_api)),
            media,
            poll_interval,
        }
    }
}
