//! Background worker supervision
//!
//! The supervisor owns one cancellation token shared by every worker it
//! spawns. Shutdown cancels the token and waits for the workers to return,
//! aborting those that outlive the grace period.

use crate::error_ext::ErrorContext;
use gatehouse_domain::error::{Error, Result};
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Owns the cancellation token and join handles of background workers
#[derive(Debug, Default)]
pub struct WorkerSupervisor {
    cancel: CancellationToken,
    workers: Mutex<Vec<(String, JoinHandle<()>)>>,
}

impl WorkerSupervisor {
    /// Create a supervisor with a fresh token
    pub fn new() -> Self {
        Self::default()
    }

    /// Token observed by supervised workers
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Whether shutdown was requested
    pub fn is_shutting_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Spawn a worker; `work` receives the shared cancellation token
    pub fn spawn<F, Fut>(&self, name: impl Into<String>, work: F) -> Result<()>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        let handle = tokio::spawn(work(self.cancel.clone()));
        info!(worker = %name, "Worker started");
        self.workers
            .lock()
            .map_err(|_| Error::internal("Worker registry lock poisoned"))?
            .push((name, handle));
        Ok(())
    }

    /// Number of spawned workers not yet collected by [`shutdown`](Self::shutdown)
    pub fn worker_count(&self) -> usize {
        self.workers.lock().map(|w| w.len()).unwrap_or(0)
    }

    /// Cancel every worker and wait up to `timeout` for all of them
    ///
    /// Workers still running at the deadline are aborted and reported as an
    /// error. A panicked worker is logged.
    pub async fn shutdown(&self, timeout: Duration) -> Result<()> {
        self.cancel.cancel();
        let workers = std::mem::take(
            &mut *self
                .workers
                .lock()
                .map_err(|_| Error::internal("Worker registry lock poisoned"))?,
        );
        info!(count = workers.len(), "Stopping background workers");

        let deadline = tokio::time::Instant::now() + timeout;
        let mut stuck = Vec::new();
        for (name, mut handle) in workers {
            match tokio::time::timeout_at(deadline, &mut handle).await {
                Ok(joined) => match joined.context(format!("Worker '{name}' failed")) {
                    Ok(()) => info!(worker = %name, "Worker stopped"),
                    Err(e) => error!(worker = %name, error = %e, "Worker ended abnormally"),
                },
                Err(_) => {
                    warn!(worker = %name, "Worker did not stop in time, aborting");
                    handle.abort();
                    stuck.push(name);
                }
            }
        }

        if stuck.is_empty() {
            Ok(())
        } else {
            Err(Error::infrastructure(format!(
                "Workers did not stop within {:?}: {}",
                timeout,
                stuck.join(", ")
            )))
        }
    }
}
