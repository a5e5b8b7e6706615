//! Cancellable periodic refresh task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::debug;

use super::Reconciler;

/// Handle for a running refresh poller.
///
/// [`stop`](Self::stop) consumes the handle, so cancellation can only be
/// requested once. Dropping the handle without calling `stop` also ends the
/// task at its next tick boundary.
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop the poll loop and wait for the task to finish.
    ///
    /// A refresh already in flight runs to completion first; its result lands
    /// in the shared cache.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

/// Spawn the refresh poll loop: one immediate refresh, then one per `period`.
pub fn spawn_poller(reconciler: Arc<Reconciler>, period: Duration) -> PollerHandle {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = interval(period);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    reconciler.refresh().await;
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        debug!("Refresh poller stopped");
                        break;
                    }
                }
            }
        }
    });

    PollerHandle {
        shutdown: shutdown_tx,
        task,
    }
}
