//! Background retention sweeper.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{debug, info};

use switchboard_core::config::JobConfig;

use crate::job::JobStore;

/// Periodically runs [`JobStore::sweep`] until shut down.
pub struct JobSweeper {
    store: Arc<JobStore>,
    config: JobConfig,
    shutdown: Arc<Notify>,
}

impl JobSweeper {
    pub fn new(store: Arc<JobStore>, config: JobConfig) -> Self {
        Self {
            store,
            config,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Handle for stopping the sweeper from another task.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    /// Run the sweep loop. Returns when the shutdown handle is notified.
    pub async fn run(self) {
        let interval = Duration::from_secs(self.config.sweep_interval_secs);
        info!(interval_secs = self.config.sweep_interval_secs, "Job sweeper started");
        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    let stats = self.store.sweep(
                        self.config.stuck_after_secs,
                        self.config.purge_terminal_after_secs,
                    );
                    debug!(
                        stuck_failed = stats.stuck_failed,
                        purged = stats.purged,
                        "Sweep pass complete"
                    );
                }
                _ = self.shutdown.notified() => {
                    info!("Job sweeper shutting down");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sweeper_shuts_down() {
        let store = Arc::new(JobStore::new());
        let sweeper = JobSweeper::new(store, JobConfig::default());
        let shutdown = sweeper.shutdown_handle();

        let handle = tokio::spawn(sweeper.run());
        shutdown.notify_one();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper should stop promptly")
            .unwrap();
    }

    #[tokio::test]
    async fn test_sweeper_sweeps_on_interval() {
        let store = Arc::new(JobStore::new());
        let job = store.create(None, "cli:alice", "x").unwrap();
        store.finish(&job.id).unwrap();

        let config = JobConfig {
            sweep_interval_secs: 0,
            stuck_after_secs: 3600,
            purge_terminal_after_secs: -1,
            max_submissions_per_minute: 30,
        };
        let sweeper = JobSweeper::new(store.clone(), config);
        let shutdown = sweeper.shutdown_handle();
        let handle = tokio::spawn(sweeper.run());

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.notify_one();
        let _ = tokio::time::timeout(Duration::from_secs(1), handle).await;

        // purge_terminal_after_secs of -1 purges immediately
        assert!(store.snapshot(&job.id).is_none());
    }
}
