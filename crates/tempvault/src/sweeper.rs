//! Background sweep task.
//!
//! Lazy expiry on read is what guarantees an expired vault is never
//! returned; the sweeper only reclaims space for vaults nobody reads again.

use std::time::Duration;

use tempvault_store::Store;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use crate::vault::Vault;

/// Handle to a running sweeper. Dropping it also stops the task.
pub struct SweeperHandle {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Whether the task is still running.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the sweeper and wait for it to finish its current pass.
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Err(e) = (&mut self.task).await {
            warn!(error = %e, "sweeper task ended abnormally");
        }
    }
}

impl<S: Store + 'static> Vault<S> {
    /// Run [`Vault::sweep_expired`] every `config().sweep_interval`.
    ///
    /// The first pass happens one interval after spawning. Failed passes are
    /// logged and retried on the next tick. Must be called from within a
    /// tokio runtime.
    pub fn spawn_sweeper(&self) -> SweeperHandle {
        let vault = self.clone();
        // tokio rejects a zero period.
        let interval = self.config().sweep_interval.max(Duration::from_millis(1));
        let (stop_tx, mut stop_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await; // skip first immediate tick

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        if let Err(e) = vault.sweep_expired().await {
                            warn!(error = %e, "background sweep error");
                        }
                    }
                }
            }
            debug!("sweeper stopped");
        });

        debug!(?interval, "sweeper started");
        SweeperHandle {
            stop: Some(stop_tx),
            task,
        }
    }
}
