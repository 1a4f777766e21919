//! Cache Sweep Task
//!
//! Background task that periodically removes expired response cache entries.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Shortest period the sweep runs at; a zero interval is raised to this.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Owned handle to the running sweep task.
///
/// Call [`SweepTask::stop`] for an orderly shutdown. Dropping the handle
/// aborts the task, so it never outlives its owner.
#[derive(Debug)]
pub struct SweepTask {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl SweepTask {
    /// Spawns the sweep loop on the current runtime.
    ///
    /// The first sweep runs one full `interval` after spawning.
    pub fn spawn(cache: SharedCache, interval: Duration) -> Self {
        let interval = interval.max(MIN_INTERVAL);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            info!("Starting cache sweep task with interval of {:?}", interval);

            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        debug!("Cache sweep task received shutdown");
                        break;
                    }
                    _ = ticker.tick() => {
                        let removed = {
                            let mut cache_guard = cache.write().await;
                            cache_guard.sweep()
                        };

                        if removed > 0 {
                            info!("Cache sweep: removed {} expired entries", removed);
                        } else {
                            debug!("Cache sweep: no expired entries found");
                        }
                    }
                }
            }
        });

        Self {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Signals the task to stop and waits for it to finish.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        info!("Cache sweep task stopped");
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for SweepTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
