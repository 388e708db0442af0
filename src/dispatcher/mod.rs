mod dispatcher;
mod error;
mod options;
mod retry_manager;
mod retryable_task;
mod shared;
mod worker;

pub use dispatcher::Dispatcher;
pub use error::SubmitError;
pub use options::DispatcherOptions;
