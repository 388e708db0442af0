use log::info;
use std::sync::Arc;

use crate::dispatcher::{Dispatcher, DispatcherOptions, SubmitError};
use crate::task::{Handler, Task};

/// Thin lifecycle wrapper around one [`Dispatcher`].
///
/// The surrounding application constructs a single `TaskManager`, registers
/// its domain handlers, starts it, and shares it with the request path for
/// fire-and-forget submission.
pub struct TaskManager {
    dispatcher: Dispatcher,
}

impl TaskManager {
    pub fn new(options: DispatcherOptions) -> Self {
        let dispatcher = Dispatcher::new(options);
        info!("Task manager initialized");
        Self { dispatcher }
    }

    /// Register a handler for a task type; must happen before `start`.
    pub fn register(&mut self, task_type: impl Into<String>, handler: Arc<dyn Handler>) {
        self.dispatcher.register(task_type, handler);
    }

    pub fn start(&mut self) {
        self.dispatcher.start();
        info!("Task manager started");
    }

    pub async fn stop(&mut self) {
        self.dispatcher.stop().await;
        info!("Task manager stopped");
    }

    /// Queue a task for background execution.
    ///
    /// Returns before the task runs; completion is only observable through
    /// the handler itself and the dispatcher's logs.
    pub async fn submit_task(&self, task: Box<dyn Task>) -> Result<(), SubmitError> {
        let task_type = task.task_type().to_string();
        self.dispatcher.submit(task).await?;
        info!("Task '{}' submitted", task_type);
        Ok(())
    }
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new(DispatcherOptions::default())
    }
}
