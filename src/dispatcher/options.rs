use std::time::Duration;

/// Tuning knobs for a [`Dispatcher`](super::Dispatcher).
///
/// The defaults reproduce the reference deployment: 5 workers, queue
/// capacity 100, up to 10 retries spaced 5 seconds apart, a 30 second
/// per-attempt timeout, and a 1 second retry-scheduler tick.
#[derive(Debug, Clone)]
pub struct DispatcherOptions {
    /// Number of concurrent worker loops.
    pub max_workers: usize,
    /// Capacity of the ready queue and of the retry holding queue.
    pub queue_capacity: usize,
    /// Maximum number of re-attempts after the initial one.
    pub max_retries: u32,
    /// Delay before a failed task becomes runnable again.
    pub retry_interval: Duration,
    /// Deadline for a single handler invocation.
    pub task_timeout: Duration,
    /// How often the retry manager scans for due tasks. The effective retry
    /// delay is `retry_interval` rounded up to the next tick.
    pub retry_tick: Duration,
}

impl Default for DispatcherOptions {
    fn default() -> Self {
        Self {
            max_workers: 5,
            queue_capacity: 100,
            max_retries: 10,
            retry_interval: Duration::from_secs(5),
            task_timeout: Duration::from_secs(30),
            retry_tick: Duration::from_secs(1),
        }
    }
}

impl DispatcherOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_workers(mut self, value: usize) -> Self {
        self.max_workers = value;
        self
    }

    pub fn with_queue_capacity(mut self, value: usize) -> Self {
        self.queue_capacity = value;
        self
    }

    pub fn with_max_retries(mut self, value: u32) -> Self {
        self.max_retries = value;
        self
    }

    pub fn with_retry_interval(mut self, value: Duration) -> Self {
        self.retry_interval = value;
        self
    }

    pub fn with_task_timeout(mut self, value: Duration) -> Self {
        self.task_timeout = value;
        self
    }

    pub fn with_retry_tick(mut self, value: Duration) -> Self {
        self.retry_tick = value;
        self
    }
}
