//! The pipeline facade: submit text, track the job, query the outcome.

use std::sync::Arc;

use tracing::{debug, info};

use switchboard_core::{Result, SwitchboardConfig, SwitchboardError};
use switchboard_extract::Extractor;

use crate::executor::Executor;
use crate::job::{JobStore, JobSweeper};
use crate::registry::CapabilityRegistry;
use crate::safety::SafetyGate;
use crate::throttle::SubmissionThrottle;
use crate::types::{ExecutionContext, JobSnapshot, JobState};
use crate::variables::VariableStore;

/// End-to-end action pipeline.
///
/// `submit` accepts raw text, creates a job, and processes it on a
/// background task: extraction, then execution of each invocation in
/// source order. Callers poll `job` for progress and results.
pub struct Pipeline {
    extractor: Extractor,
    jobs: Arc<JobStore>,
    executor: Arc<Executor>,
    throttle: SubmissionThrottle,
    config: SwitchboardConfig,
}

impl Pipeline {
    pub fn new(
        registry: Arc<CapabilityRegistry>,
        gate: Arc<SafetyGate>,
        variables: Arc<dyn VariableStore>,
        config: SwitchboardConfig,
    ) -> Self {
        let executor = Arc::new(Executor::new(
            registry,
            gate,
            variables,
            config.executor.clone(),
        ));
        Self {
            extractor: Extractor::new(),
            jobs: Arc::new(JobStore::new()),
            executor,
            throttle: SubmissionThrottle::new(config.jobs.max_submissions_per_minute),
            config,
        }
    }

    /// The underlying job store, for embedding in a larger service.
    pub fn jobs(&self) -> Arc<JobStore> {
        self.jobs.clone()
    }

    /// Submit text for processing. Returns the job id immediately;
    /// processing happens on a spawned task.
    ///
    /// Must be called within a tokio runtime.
    pub fn submit(
        &self,
        job_id: Option<String>,
        submitter_id: &str,
        text: &str,
    ) -> Result<String> {
        if !self.throttle.try_acquire(submitter_id) {
            return Err(SwitchboardError::RateLimited(submitter_id.to_string()));
        }

        let job = self.jobs.create(job_id, submitter_id, text)?;
        let id = job.id.clone();
        info!(job_id = %id, %submitter_id, "Job submitted");

        let jobs = self.jobs.clone();
        let executor = self.executor.clone();
        let extractor = self.extractor.clone();
        let task_id = id.clone();
        let submitter = submitter_id.to_string();
        let text = text.to_string();
        tokio::spawn(async move {
            process_job(jobs, executor, extractor, task_id, submitter, text).await;
        });

        Ok(id)
    }

    /// Point-in-time view of a job.
    pub fn job(&self, id: &str) -> Option<JobSnapshot> {
        self.jobs.snapshot(id)
    }

    /// Cancel a job. Invocations already dispatched run to completion
    /// but their results are discarded; nothing further is dispatched.
    pub fn cancel(&self, id: &str, reason: Option<String>) -> bool {
        self.jobs.cancel(id, reason)
    }

    /// Append context to a job still in flight.
    pub fn add_context(&self, id: &str, text: &str) -> bool {
        self.jobs.add_context(id, text)
    }

    /// Spawn the retention sweeper. Returns the shutdown handle.
    pub fn start_sweeper(&self) -> Arc<tokio::sync::Notify> {
        let sweeper = JobSweeper::new(self.jobs.clone(), self.config.jobs.clone());
        let shutdown = sweeper.shutdown_handle();
        tokio::spawn(sweeper.run());
        shutdown
    }
}

async fn process_job(
    jobs: Arc<JobStore>,
    executor: Arc<Executor>,
    extractor: Extractor,
    job_id: String,
    submitter_id: String,
    text: String,
) {
    let invocations = extractor.extract(&text);

    if invocations.is_empty() {
        debug!(job_id = %job_id, "No invocations extracted");
        jobs.set_partial_output(&job_id, "No actionable request was found.");
        let _ = jobs.finish(&job_id);
        return;
    }

    if jobs.mark_processing(&job_id).is_err() {
        // Cancelled between submission and pickup
        debug!(job_id = %job_id, "Job no longer pending, skipping");
        return;
    }

    let ctx = ExecutionContext::new(job_id.clone(), submitter_id).with_text(text);

    for invocation in &invocations {
        if jobs.state(&job_id) != Some(JobState::Processing) {
            debug!(job_id = %job_id, "Job left processing, stopping dispatch");
            return;
        }
        let result = executor.execute(invocation, &ctx).await;
        if !jobs.append_result(&job_id, result) {
            // Terminal mid-flight; the result was discarded
            return;
        }
    }

    let _ = jobs.finish(&job_id);
}
