use log::{error, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;

use super::error::SubmitError;
use super::options::DispatcherOptions;
use super::retry_manager::RetryManager;
use super::retryable_task::RetryableTask;
use super::shared::DispatcherSharedState;
use super::worker::Worker;
use crate::task::{Handler, Task};


/// Owns the handler registry, the two bounded queues, the worker pool and
/// the shutdown protocol.
///
/// Expected lifecycle: register every handler, call [`start`](Self::start)
/// once, submit tasks from anywhere, call [`stop`](Self::stop) once.
pub struct Dispatcher {
    /// Handler per type tag; last registration wins. Snapshotted at start.
    handlers: HashMap<String, Arc<dyn Handler>>,
    options: DispatcherOptions,
    ready_tx: mpsc::Sender<RetryableTask>,
    /// Consumed by the worker pool at start.
    ready_rx: Option<mpsc::Receiver<RetryableTask>>,
    retry_tx: mpsc::Sender<RetryableTask>,
    /// Consumed by the retry manager at start.
    retry_rx: Option<mpsc::Receiver<RetryableTask>>,
    shutting_down: Arc<RwLock<bool>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    join_handles: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    pub fn new(options: DispatcherOptions) -> Self {
        let (ready_tx, ready_rx) = mpsc::channel(options.queue_capacity);
        let (retry_tx, retry_rx) = mpsc::channel(options.queue_capacity);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            handlers: HashMap::new(),
            options,
            ready_tx,
            ready_rx: Some(ready_rx),
            retry_tx,
            retry_rx: Some(retry_rx),
            shutting_down: Arc::new(RwLock::new(false)),
            shutdown_tx,
            shutdown_rx,
            join_handles: Vec::new(),
        }
    }

    /// Register the handler for a task type. Startup-only: handlers
    /// registered after [`start`](Self::start) are not seen by the workers.
    pub fn register(&mut self, task_type: impl Into<String>, handler: Arc<dyn Handler>) {
        let task_type = task_type.into();

        if self.ready_rx.is_none() {
            warn!(
                "Handler for task type '{}' registered after start, workers will not see it",
                task_type
            );
        }
        if self.handlers.insert(task_type.clone(), handler).is_some() {
            warn!("Replacing existing handler for task type '{}'", task_type);
        }
    }

    /// Spawn the worker pool and the retry manager.
    pub fn start(&mut self) {
        let (Some(ready_rx), Some(retry_rx)) = (self.ready_rx.take(), self.retry_rx.take())
        else {
            warn!("Dispatcher already started");
            return;
        };

        let shared = DispatcherSharedState {
            handlers: Arc::new(self.handlers.clone()),
            ready_tx: self.ready_tx.clone(),
            retry_tx: self.retry_tx.clone(),
            shutting_down: self.shutting_down.clone(),
            options: self.options.clone(),
        };

        let ready_rx = Arc::new(Mutex::new(ready_rx));
        for worker_id in 1..=self.options.max_workers {
            self.join_handles.push(Worker::spawn(
                worker_id,
                shared.clone(),
                ready_rx.clone(),
                self.shutdown_rx.clone(),
            ));
        }

        self.join_handles.push(RetryManager::spawn(
            shared,
            retry_rx,
            self.shutdown_rx.clone(),
        ));

        info!("Started {} workers", self.options.max_workers);
    }

    /// Queue a task for execution.
    ///
    /// Blocks (awaits) when the ready queue is full; that backpressure is the
    /// only flow-control mechanism, so latency-sensitive callers should
    /// submit from a detached context. Fails once shutdown has begun.
    pub async fn submit(&self, task: Box<dyn Task>) -> Result<(), SubmitError> {
        if self.is_shutting_down() {
            return Err(SubmitError::ShuttingDown);
        }

        let retryable = RetryableTask::new(task);
        self.ready_tx
            .send(retryable)
            .await
            .map_err(|_| SubmitError::QueueClosed)
    }

    /// Stop accepting work, signal every loop, and wait for them to exit.
    ///
    /// Tasks still sitting in either queue are dropped, not executed.
    pub async fn stop(&mut self) {
        info!("Stopping dispatcher");

        {
            let mut flag = self.shutting_down.write().unwrap();
            *flag = true;
        }
        let _ = self.shutdown_tx.send(true);

        for handle in self.join_handles.drain(..) {
            if let Err(e) = handle.await {
                error!("Background loop panicked during shutdown: {}", e);
            }
        }

        info!("Dispatcher stopped");
    }

    fn is_shutting_down(&self) -> bool {
        *self.shutting_down.read().unwrap()
    }
}
