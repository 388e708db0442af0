use log::{error, warn};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

use super::options::DispatcherOptions;
use super::retryable_task::RetryableTask;
use crate::task::{Handler, Task};

/// State shared by the workers and the retry manager.
#[derive(Clone)]
pub(crate) struct DispatcherSharedState {
    /// Registry snapshot taken at start; read-only from here on.
    pub handlers: Arc<HashMap<String, Arc<dyn Handler>>>,
    /// Producer side of the ready queue, used to re-inject due retries.
    pub ready_tx: mpsc::Sender<RetryableTask>,
    /// Producer side of the retry holding queue.
    pub retry_tx: mpsc::Sender<RetryableTask>,
    /// Set once by `stop()`; checked before accepting or rescheduling work.
    pub shutting_down: Arc<RwLock<bool>>,
    pub options: DispatcherOptions,
}

impl DispatcherSharedState {
    pub fn is_shutting_down(&self) -> bool {
        *self.shutting_down.read().unwrap()
    }

    /// Reschedule a failed task onto the retry holding queue.
    ///
    /// Blocks (awaits) when the holding queue is full; that backpressure is
    /// deliberate. A retry arriving after shutdown has begun is dropped.
    pub async fn submit_retry(&self, mut task: RetryableTask) {
        let task_type = task.task.task_type().to_string();

        if self.is_shutting_down() {
            warn!(
                "Dispatcher is shutting down, dropping retry of task '{}'",
                task_type
            );
            return;
        }

        task.mark_retry(self.options.retry_interval);
        let attempt = task.retry_count;

        if self.retry_tx.send(task).await.is_err() {
            error!(
                "Retry queue closed, dropping task '{}' (retry {})",
                task_type, attempt
            );
        }
    }
}
