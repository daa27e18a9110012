use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::error;

/// Runs queued tasks with a fixed concurrency ceiling. Queueing is
/// unbounded; at most `concurrency` tasks hold a permit at once. Results
/// fan back in through [`WorkQueue::settle`], so tasks never share a
/// mutable accumulator.
pub struct WorkQueue<T> {
    permits: Arc<Semaphore>,
    handles: Vec<JoinHandle<T>>,
}

impl<T: Send + 'static> WorkQueue<T> {
    pub fn new(concurrency: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(concurrency)),
            handles: Vec::new(),
        }
    }

    /// Queue one task. It starts as soon as a permit frees up and runs to
    /// completion; there is no cancellation or per-task timeout.
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        self.handles.push(tokio::spawn(async move {
            let _permit = permits.acquire_owned().await.expect("semaphore closed");
            task.await
        }));
    }

    /// Wait until every queued task has settled, returning their outputs
    /// in spawn order. A panicked task is logged and yields no output.
    pub async fn settle(&mut self) -> Vec<T> {
        let mut results = Vec::with_capacity(self.handles.len());
        for handle in self.handles.drain(..) {
            match handle.await {
                Ok(value) => results.push(value),
                Err(e) => error!("Queued task failed to settle: {}", e),
            }
        }
        results
    }
}
