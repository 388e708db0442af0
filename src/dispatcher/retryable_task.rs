use std::time::Duration;

use tokio::time::Instant;

use crate::task::Task;


/// A task plus its retry bookkeeping.
///
/// Ownership transfers whole between the submitter, the queues, a worker and
/// the retry manager; it is never shared between two components at once.
pub(crate) struct RetryableTask {
    /// The wrapped unit of work.
    pub task: Box<dyn Task>,
    /// Number of failed attempts so far; never exceeds `max_retries`.
    pub retry_count: u32,
    /// When the most recent failed attempt was rescheduled.
    pub last_attempt: Option<Instant>,
    /// Earliest point the task may run again; `None` means immediately.
    pub next_attempt: Option<Instant>,
    /// False until the first failure.
    pub is_retry: bool,
    /// Fixed at submission; used only for total time-to-resolution logging.
    pub submitted_at: Instant,
}

impl RetryableTask {
    /// Wrap a freshly submitted task.
    pub fn new(task: Box<dyn Task>) -> Self {
        Self {
            task,
            retry_count: 0,
            last_attempt: None,
            next_attempt: None,
            is_retry: false,
            submitted_at: Instant::now(),
        }
    }

    /// Record a failed attempt and schedule the next one after `delay`.
    pub fn mark_retry(&mut self, delay: Duration) {
        let now = Instant::now();
        self.retry_count += 1;
        self.last_attempt = Some(now);
        self.next_attempt = Some(now + delay);
        self.is_retry = true;
    }

    /// Whether the task may run at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.next_attempt {
            Some(at) => at <= now,
            None => true,
        }
    }
}
