use log::{error, info};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use super::retryable_task::RetryableTask;
use super::shared::DispatcherSharedState;
use crate::task::{Handler, Task};

#[cfg(test)]
mod tests;

/// One execution loop of the pool.
///
/// Workers are fully symmetric: any of them may run any task type for which
/// a handler was registered. They share the single ready-queue receiver
/// behind an async mutex; the lock is held only while waiting for the next
/// task, so handler execution proceeds concurrently across the pool.
pub(crate) struct Worker {
    id: usize,
    shared: DispatcherSharedState,
    ready_rx: Arc<Mutex<mpsc::Receiver<RetryableTask>>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Worker {
    pub fn spawn(
        id: usize,
        shared: DispatcherSharedState,
        ready_rx: Arc<Mutex<mpsc::Receiver<RetryableTask>>>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let worker = Self {
            id,
            shared,
            ready_rx,
            shutdown_rx,
        };
        tokio::spawn(worker.run())
    }

    async fn run(mut self) {
        info!("Worker {} started", self.id);

        loop {
            if *self.shutdown_rx.borrow() {
                break;
            }

            // Hold the receiver lock only while waiting for the next task.
            let task = {
                let mut ready_rx = self.ready_rx.lock().await;
                tokio::select! {
                    _ = self.shutdown_rx.changed() => break,
                    task = ready_rx.recv() => task,
                }
            };

            match task {
                Some(task) => self.execute_task(task).await,
                // Queue closed; nothing more will arrive.
                None => break,
            }
        }

        info!("Worker {} stopped", self.id);
    }

    /// Run one attempt and route the outcome: discard on success, reschedule
    /// while retry budget remains, drop permanently once it is exhausted.
    async fn execute_task(&self, task: RetryableTask) {
        let task_type = task.task.task_type().to_string();

        let Some(handler) = self.shared.handlers.get(&task_type) else {
            error!(
                "Worker {}: no handler registered for task type '{}', dropping task",
                self.id, task_type
            );
            return;
        };

        let max_attempts = self.shared.options.max_retries + 1;
        let attempt = task.retry_count + 1;
        info!(
            "Worker {} running task '{}' (attempt {}/{})",
            self.id, task_type, attempt, max_attempts
        );

        let payload = task.task.payload();
        let outcome = timeout(self.shared.options.task_timeout, handler.handle(&payload)).await;

        let failure = match outcome {
            Ok(Ok(())) => {
                if task.is_retry {
                    info!(
                        "Task '{}' completed on attempt {} ({:?} after submission)",
                        task_type,
                        attempt,
                        task.submitted_at.elapsed()
                    );
                } else {
                    info!("Task '{}' completed", task_type);
                }
                return;
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!(
                "attempt timed out after {:?}",
                self.shared.options.task_timeout
            ),
        };

        error!(
            "Worker {}: task '{}' failed on attempt {}: {}",
            self.id, task_type, attempt, failure
        );

        if task.retry_count < self.shared.options.max_retries {
            self.shared.submit_retry(task).await;
        } else {
            error!(
                "Task '{}' dropped after {} attempts ({:?} since submission)",
                task_type,
                attempt,
                task.submitted_at.elapsed()
            );
        }
    }
}
