#[cfg(test)]
mod tests {
    use super::super::Worker;
    use crate::dispatcher::retryable_task::RetryableTask;
    use crate::dispatcher::shared::DispatcherSharedState;
    use crate::dispatcher::DispatcherOptions;
    use crate::task::{Handler, Task};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, RwLock};
    use std::time::Duration;
    use tokio::sync::{mpsc, watch, Mutex};
    use tokio::time::{sleep, timeout};

    struct StubTask {
        tag: &'static str,
    }

    impl Task for StubTask {
        fn task_type(&self) -> &str {
            self.tag
        }

        fn payload(&self) -> Value {
            json!({ "tag": self.tag })
        }
    }

    struct CountingHandler {
        calls: Arc<AtomicUsize>,
        fail: bool,
        delay: Duration,
    }

    #[async_trait]
    impl Handler for CountingHandler {
        async fn handle(&self, _payload: &Value) -> Result<(), Box<dyn Error + Send + Sync>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                sleep(self.delay).await;
            }
            if self.fail {
                Err("handler failed deliberately".into())
            } else {
                Ok(())
            }
        }
    }

    struct TestRig {
        ready_tx: mpsc::Sender<RetryableTask>,
        retry_rx: mpsc::Receiver<RetryableTask>,
        shutdown_tx: watch::Sender<bool>,
    }

    fn spawn_worker(
        options: DispatcherOptions,
        handlers: HashMap<String, Arc<dyn Handler>>,
    ) -> TestRig {
        let (ready_tx, ready_rx) = mpsc::channel(options.queue_capacity);
        let (retry_tx, retry_rx) = mpsc::channel(options.queue_capacity);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let shared = DispatcherSharedState {
            handlers: Arc::new(handlers),
            ready_tx: ready_tx.clone(),
            retry_tx,
            shutting_down: Arc::new(RwLock::new(false)),
            options,
        };

        Worker::spawn(1, shared, Arc::new(Mutex::new(ready_rx)), shutdown_rx);

        TestRig {
            ready_tx,
            retry_rx,
            shutdown_tx,
        }
    }

    #[tokio::test]
    async fn successful_task_is_discarded() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handlers: HashMap<String, Arc<dyn Handler>> = HashMap::new();
        handlers.insert(
            "ok".to_string(),
            Arc::new(CountingHandler {
                calls: calls.clone(),
                fail: false,
                delay: Duration::ZERO,
            }),
        );

        let mut rig = spawn_worker(DispatcherOptions::default(), handlers);

        rig.ready_tx
            .send(RetryableTask::new(Box::new(StubTask { tag: "ok" })))
            .await
            .unwrap();

        sleep(Duration::from_millis(50)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Nothing should have been rescheduled.
        assert!(rig.retry_rx.try_recv().is_err());

        let _ = rig.shutdown_tx.send(true);
    }

    #[tokio::test]
    async fn missing_handler_drops_task_without_retry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handlers: HashMap<String, Arc<dyn Handler>> = HashMap::new();
        handlers.insert(
            "known".to_string(),
            Arc::new(CountingHandler {
                calls: calls.clone(),
                fail: false,
                delay: Duration::ZERO,
            }),
        );

        let mut rig = spawn_worker(DispatcherOptions::default(), handlers);

        rig.ready_tx
            .send(RetryableTask::new(Box::new(StubTask { tag: "unknown" })))
            .await
            .unwrap();

        sleep(Duration::from_millis(50)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(rig.retry_rx.try_recv().is_err());

        let _ = rig.shutdown_tx.send(true);
    }

    #[tokio::test]
    async fn failed_attempt_is_rescheduled_with_bookkeeping() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handlers: HashMap<String, Arc<dyn Handler>> = HashMap::new();
        handlers.insert(
            "flaky".to_string(),
            Arc::new(CountingHandler {
                calls: calls.clone(),
                fail: true,
                delay: Duration::ZERO,
            }),
        );

        let mut rig = spawn_worker(DispatcherOptions::default(), handlers);

        rig.ready_tx
            .send(RetryableTask::new(Box::new(StubTask { tag: "flaky" })))
            .await
            .unwrap();

        let rescheduled = timeout(Duration::from_secs(1), rig.retry_rx.recv())
            .await
            .expect("expected the task on the retry queue")
            .expect("retry queue closed unexpectedly");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(rescheduled.retry_count, 1);
        assert!(rescheduled.is_retry);
        assert!(rescheduled.last_attempt.is_some());
        assert!(rescheduled.next_attempt.is_some());

        let _ = rig.shutdown_tx.send(true);
    }

    #[tokio::test]
    async fn exhausted_task_is_dropped_permanently() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handlers: HashMap<String, Arc<dyn Handler>> = HashMap::new();
        handlers.insert(
            "doomed".to_string(),
            Arc::new(CountingHandler {
                calls: calls.clone(),
                fail: true,
                delay: Duration::ZERO,
            }),
        );

        let options = DispatcherOptions::default().with_max_retries(2);
        let mut rig = spawn_worker(options, handlers);

        // Simulate a task that already used up its retry budget.
        let mut task = RetryableTask::new(Box::new(StubTask { tag: "doomed" }));
        task.mark_retry(Duration::ZERO);
        task.mark_retry(Duration::ZERO);
        assert_eq!(task.retry_count, 2);

        rig.ready_tx.send(task).await.unwrap();

        sleep(Duration::from_millis(50)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(rig.retry_rx.try_recv().is_err());

        let _ = rig.shutdown_tx.send(true);
    }

    #[tokio::test]
    async fn timed_out_attempt_counts_as_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handlers: HashMap<String, Arc<dyn Handler>> = HashMap::new();
        handlers.insert(
            "slow".to_string(),
            Arc::new(CountingHandler {
                calls: calls.clone(),
                fail: false,
                delay: Duration::from_millis(500),
            }),
        );

        let options = DispatcherOptions::default().with_task_timeout(Duration::from_millis(20));
        let mut rig = spawn_worker(options, handlers);

        rig.ready_tx
            .send(RetryableTask::new(Box::new(StubTask { tag: "slow" })))
            .await
            .unwrap();

        let rescheduled = timeout(Duration::from_secs(1), rig.retry_rx.recv())
            .await
            .expect("expected the task on the retry queue")
            .expect("retry queue closed unexpectedly");

        assert_eq!(rescheduled.retry_count, 1);

        let _ = rig.shutdown_tx.send(true);
    }
}
