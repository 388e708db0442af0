use log::{debug, info, warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};

use super::retryable_task::RetryableTask;
use super::shared::DispatcherSharedState;
use crate::task::Task;


/// The single scheduling loop that holds failed tasks until they are due.
///
/// On every tick it drains newly arrived retries from the holding queue into
/// an in-memory pending list, then re-injects every task whose scheduled
/// time has passed back onto the ready queue. The tick is coarse: the actual
/// delay is the retry interval rounded up to the next tick.
pub(crate) struct RetryManager {
    shared: DispatcherSharedState,
    retry_rx: mpsc::Receiver<RetryableTask>,
    shutdown_rx: watch::Receiver<bool>,
    pending: Vec<RetryableTask>,
}

impl RetryManager {
    pub fn spawn(
        shared: DispatcherSharedState,
        retry_rx: mpsc::Receiver<RetryableTask>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let manager = Self {
            shared,
            retry_rx,
            shutdown_rx,
            pending: Vec::new(),
        };
        tokio::spawn(manager.run())
    }

    async fn run(mut self) {
        info!("Retry manager started");

        let mut tick = interval(self.shared.options.retry_tick);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown_rx.changed() => break,
                _ = tick.tick() => {}
            }

            self.drain_incoming();
            self.requeue_due().await;
        }

        // Lossy shutdown: anything still waiting is discarded.
        if !self.pending.is_empty() {
            warn!(
                "Retry manager stopping with {} pending task(s), dropping them",
                self.pending.len()
            );
        }
        info!("Retry manager stopped");
    }

    /// Move newly arrived retries from the holding queue to the pending list.
    fn drain_incoming(&mut self) {
        while let Ok(task) = self.retry_rx.try_recv() {
            debug!(
                "Holding task '{}' for retry {} until its scheduled time",
                task.task.task_type(),
                task.retry_count
            );
            self.pending.push(task);
        }
    }

    /// Push every due task back onto the ready queue for worker pickup.
    async fn requeue_due(&mut self) {
        let now = Instant::now();

        let mut i = 0;
        while i < self.pending.len() {
            if !self.pending[i].is_due(now) {
                i += 1;
                continue;
            }

            let task = self.pending.swap_remove(i);
            debug!(
                "Re-queueing task '{}' for retry {}",
                task.task.task_type(),
                task.retry_count
            );
            if self.shared.ready_tx.send(task).await.is_err() {
                warn!("Ready queue closed, retry manager exiting");
                return;
            }
        }
    }
}
