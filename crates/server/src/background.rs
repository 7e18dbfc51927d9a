//! Background persistence executor.
//!
//! Upload ingestion and hub federation respond to the caller before their
//! index rows are durable; the deferred writes run here. Failures are
//! logged, never surfaced to the original caller, and a slow write may
//! outlive the request it was derived from. Tasks are tracked so tests can
//! drain them deterministically.

use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Tracked executor for fire-and-forget persistence tasks.
#[derive(Clone, Default)]
pub struct BackgroundTasks {
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl BackgroundTasks {
    /// Create a new executor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit a task. An `Err` outcome is logged against `task` and
    /// otherwise dropped.
    pub fn submit<F, E>(&self, task: &'static str, fut: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: std::fmt::Display,
    {
        let handle = tokio::spawn(async move {
            if let Err(e) = fut.await {
                tracing::error!(task, error = %e, "background task failed");
            }
        });

        let mut tasks = self.tasks.lock().expect("background task registry poisoned");
        // Sweep finished handles so the registry does not grow unbounded.
        tasks.retain(|h| !h.is_finished());
        tasks.push(handle);
    }

    /// Wait for every submitted task to finish. Test hook; the server never
    /// blocks on background work.
    pub async fn wait_idle(&self) {
        loop {
            let drained: Vec<JoinHandle<()>> = {
                let mut tasks = self.tasks.lock().expect("background task registry poisoned");
                tasks.drain(..).collect()
            };
            if drained.is_empty() {
                return;
            }
            for handle in drained {
                if let Err(e) = handle.await {
                    if e.is_panic() {
                        tracing::error!(error = ?e, "background task panicked");
                    }
                }
            }
        }
    }
}
