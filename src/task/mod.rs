use async_trait::async_trait;
use serde_json::Value;
use std::error::Error;

pub mod example_task;

#[cfg(test)]
mod tests;

/// A unit of background work identified by a type tag.
///
/// The dispatcher never inspects the payload; it only uses the type tag to
/// find the matching [`Handler`].
pub trait Task: Send + Sync {
    /// Stable identifier used to look up the registered handler.
    fn task_type(&self) -> &str;

    /// Payload handed to the handler unmodified.
    fn payload(&self) -> Value;
}

/// The executable behavior registered against a task type.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Execute one attempt for the given payload.
    ///
    /// Returning an error marks the attempt failed and counts against the
    /// retry budget. The worker imposes a per-attempt deadline; an attempt
    /// that overruns is cancelled and counted as a failure.
    async fn handle(&self, payload: &Value) -> Result<(), Box<dyn Error + Send + Sync>>;
}
