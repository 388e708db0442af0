//! # Task Dispatcher
//!
//! An asynchronous background task dispatcher for Rust backends: submit
//! typed units of work from the request path, execute them on a bounded
//! pool of workers, and retry failures with a fixed delay up to a maximum
//! attempt count.
//!
//! ## Features
//!
//! - Type-tag based dispatch to registered handlers
//! - Bounded ready queue with blocking backpressure on submit
//! - Fixed worker pool, any worker runs any task type
//! - Delayed retries with a configurable interval and budget
//! - Per-attempt handler timeout
//! - Graceful (but lossy) shutdown
//!
//! ## Usage
//!
//! Add the following to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! task_dispatcher = "0.1"
//! ```
//!
//! ## Example
//!
//! ```rust
//! use serde_json::{json, Value};
//! use std::sync::Arc;
//! use task_dispatcher::{DispatcherOptions, Handler, Task, TaskManager};
//!
//! struct PingTask;
//!
//! impl Task for PingTask {
//!     fn task_type(&self) -> &str {
//!         "ping"
//!     }
//!
//!     fn payload(&self) -> Value {
//!         json!({})
//!     }
//! }
//!
//! struct PingHandler;
//!
//! #[async_trait::async_trait]
//! impl Handler for PingHandler {
//!     async fn handle(
//!         &self,
//!         _payload: &Value,
//!     ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!         println!("pong");
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut manager = TaskManager::new(DispatcherOptions::default());
//!     manager.register("ping", Arc::new(PingHandler));
//!     manager.start();
//!
//!     manager.submit_task(Box::new(PingTask)).await.unwrap();
//!
//!     // Give the background workers a moment before shutting down.
//!     tokio::time::sleep(std::time::Duration::from_millis(100)).await;
//!     manager.stop().await;
//! }
//! ```
//!
//! ## License
//!
//! Licensed under the MIT license. See the [LICENSE](LICENSE) file for details.

pub mod dispatcher;
pub mod manager;
pub mod task;

pub use dispatcher::{Dispatcher, DispatcherOptions, SubmitError};
pub use manager::TaskManager;
pub use task::{Handler, Task};
