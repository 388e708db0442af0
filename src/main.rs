use async_trait::async_trait;
use serde_json::Value;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use task_dispatcher::task::example_task::GenerateTagsTask;
use task_dispatcher::{DispatcherOptions, Handler, TaskManager};

/// Demo handler: decodes the payload and pretends to call an AI service.
struct GenerateTagsHandler;

#[async_trait]
impl Handler for GenerateTagsHandler {
    async fn handle(&self, payload: &Value) -> Result<(), Box<dyn Error + Send + Sync>> {
        let task: GenerateTagsTask = serde_json::from_value(payload.clone())?;

        println!(
            "Generating tags for article {} ({} bytes of content)",
            task.article_id,
            task.content.len()
        );
        // Stand-in for the actual AI call.
        tokio::time::sleep(Duration::from_millis(200)).await;
        println!("Tags ready for article {}", task.article_id);

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // Initialize logging if needed.
    env_logger::init();
    println!("Starting the task dispatcher demo...");

    // Step 1: Create the manager with the reference configuration.
    let mut manager = TaskManager::new(
        DispatcherOptions::default()
            .with_max_workers(5)
            .with_queue_capacity(100),
    );

    // Step 2: Register a handler for every task type before starting.
    manager.register(GenerateTagsTask::TASK_TYPE, Arc::new(GenerateTagsHandler));

    // Step 3: Start the worker pool.
    manager.start();

    // Step 4: Submit some work, fire-and-forget.
    for article_id in 1..=3 {
        manager
            .submit_task(Box::new(GenerateTagsTask::new(
                article_id,
                "Rust is a systems programming language.",
            )))
            .await?;
    }

    // Step 5: Give the background work time to finish, then shut down.
    tokio::time::sleep(Duration::from_secs(1)).await;
    manager.stop().await;

    println!("Done.");
    Ok(())
}
