use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A spawned one-shot or repeating job that is aborted when cancelled or dropped.
///
/// Owners keep the task in an `Option` and replace it to restart; the old task
/// is aborted before the replacement can fire.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Run `job` once after `delay`.
    pub fn after<F, Fut>(delay: Duration, job: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let deadline = tokio::time::Instant::now() + delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            job().await;
        });
        Self { handle }
    }

    /// Run `tick` every `period`, first call one period from now.
    ///
    /// The loop stops as soon as `tick` returns `false`.
    pub fn every<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let start = tokio::time::Instant::now() + period;
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !tick().await {
                    break;
                }
            }
        });
        Self { handle }
    }

    pub fn cancel(self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
