use thiserror::Error;

/// Errors reported to callers of `submit`.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The dispatcher has begun shutting down and no longer accepts work.
    #[error("dispatcher is shutting down")]
    ShuttingDown,
    /// The ready queue has been closed; the dispatcher is already stopped.
    #[error("task queue is closed")]
    QueueClosed,
}
