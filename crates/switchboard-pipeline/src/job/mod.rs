//! Job tracking: creation, state transitions, result accumulation, and
//! retention sweeps.

pub mod state_machine;
mod sweeper;

pub use sweeper::JobSweeper;

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{debug, info, warn};
use uuid::Uuid;

use switchboard_core::Timestamp;

use crate::error::JobError;
use crate::types::{ExecutionResult, Job, JobSnapshot, JobState};
use state_machine::validate_transition;

/// Counts from one retention sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Non-terminal jobs force-failed for exceeding the stuck threshold.
    pub stuck_failed: usize,
    /// Terminal jobs purged for exceeding the retention window.
    pub purged: usize,
}

/// In-memory job store. All mutation goes through methods that enforce
/// the state machine; terminal jobs are immutable until purged.
#[derive(Default)]
pub struct JobStore {
    jobs: Mutex<HashMap<String, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Job>> {
        self.jobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create a Pending job. A caller-supplied id must be unused;
    /// without one, a UUID is generated.
    pub fn create(
        &self,
        id: Option<String>,
        submitter_id: &str,
        text: &str,
    ) -> Result<Job, JobError> {
        let mut jobs = self.lock();
        let id = match id {
            Some(id) => {
                if jobs.contains_key(&id) {
                    return Err(JobError::DuplicateId(id));
                }
                id
            }
            None => Uuid::new_v4().to_string(),
        };
        let job = Job::new(id.clone(), submitter_id, text);
        debug!(job_id = %id, %submitter_id, "Job created");
        jobs.insert(id, job.clone());
        Ok(job)
    }

    pub fn snapshot(&self, id: &str) -> Option<JobSnapshot> {
        self.lock().get(id).map(JobSnapshot::from)
    }

    pub fn state(&self, id: &str) -> Option<JobState> {
        self.lock().get(id).map(|j| j.state)
    }

    /// Move a Pending job into Processing.
    pub fn mark_processing(&self, id: &str) -> Result<(), JobError> {
        let mut jobs = self.lock();
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| JobError::NotFound(id.to_string()))?;
        validate_transition(job.state, JobState::Processing)?;
        job.state = JobState::Processing;
        job.updated_at = Timestamp::now();
        Ok(())
    }

    /// Append an execution result and refresh the partial output.
    ///
    /// Returns false when the job is gone or already terminal; the
    /// caller's result is discarded, which is how late results from a
    /// cancelled job are kept out of its frozen record.
    pub fn append_result(&self, id: &str, result: ExecutionResult) -> bool {
        let mut jobs = self.lock();
        let Some(job) = jobs.get_mut(id) else {
            warn!(job_id = %id, "Result for unknown job discarded");
            return false;
        };
        if job.state.is_terminal() {
            warn!(job_id = %id, state = %job.state, "Late result discarded");
            return false;
        }
        if let Some(output) = &result.output {
            job.partial_output = Some(match output {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            });
        }
        job.results.push(result);
        job.updated_at = Timestamp::now();
        true
    }

    /// Set the partial output of a non-terminal job directly.
    pub fn set_partial_output(&self, id: &str, text: &str) -> bool {
        let mut jobs = self.lock();
        let Some(job) = jobs.get_mut(id) else {
            return false;
        };
        if job.state.is_terminal() {
            return false;
        }
        job.partial_output = Some(text.to_string());
        job.updated_at = Timestamp::now();
        true
    }

    /// Append submitter-provided context to a job still in flight.
    pub fn add_context(&self, id: &str, text: &str) -> bool {
        let mut jobs = self.lock();
        let Some(job) = jobs.get_mut(id) else {
            return false;
        };
        if job.state.is_terminal() {
            return false;
        }
        job.additional_context.push(text.to_string());
        job.updated_at = Timestamp::now();
        true
    }

    /// Close out a job based on its accumulated results: Completed when
    /// at least one result succeeded (or there were no invocations at
    /// all), Failed otherwise.
    pub fn finish(&self, id: &str) -> Result<JobState, JobError> {
        let mut jobs = self.lock();
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| JobError::NotFound(id.to_string()))?;

        let target = if job.results.is_empty() || job.results.iter().any(|r| r.succeeded) {
            JobState::Completed
        } else {
            JobState::Failed
        };
        validate_transition(job.state, target)?;

        if target == JobState::Failed {
            let reasons: Vec<String> = job
                .results
                .iter()
                .filter_map(|r| r.failure_reason.clone())
                .collect();
            job.failure_reason = Some(reasons.join("; "));
        }
        job.state = target;
        let now = Timestamp::now();
        job.updated_at = now;
        job.completed_at = Some(now);
        info!(job_id = %id, state = %target, results = job.results.len(), "Job finished");
        Ok(target)
    }

    /// Cancel a non-terminal job. Returns false if the job is unknown or
    /// already terminal.
    pub fn cancel(&self, id: &str, reason: Option<String>) -> bool {
        let mut jobs = self.lock();
        let Some(job) = jobs.get_mut(id) else {
            return false;
        };
        if validate_transition(job.state, JobState::Cancelled).is_err() {
            return false;
        }
        job.state = JobState::Cancelled;
        job.cancellation_reason = reason;
        let now = Timestamp::now();
        job.updated_at = now;
        job.completed_at = Some(now);
        info!(job_id = %id, "Job cancelled");
        true
    }

    /// Retention sweep: force-fail non-terminal jobs older than
    /// `stuck_after_secs`, then purge terminal jobs whose completion is
    /// older than `purge_after_secs`.
    pub fn sweep(&self, stuck_after_secs: i64, purge_after_secs: i64) -> SweepStats {
        let mut jobs = self.lock();
        let mut stats = SweepStats::default();
        let now = Timestamp::now();

        for job in jobs.values_mut() {
            if !job.state.is_terminal() && now.0 - job.created_at.0 > stuck_after_secs {
                warn!(job_id = %job.id, age_secs = now.0 - job.created_at.0, "Stuck job force-failed");
                job.state = JobState::Failed;
                job.failure_reason = Some("job exceeded the stuck threshold".to_string());
                job.updated_at = now;
                job.completed_at = Some(now);
                stats.stuck_failed += 1;
            }
        }

        let before = jobs.len();
        jobs.retain(|_, job| {
            if !job.state.is_terminal() {
                return true;
            }
            let completed = job.completed_at.unwrap_or(job.created_at);
            now.0 - completed.0 <= purge_after_secs
        });
        stats.purged = before - jobs.len();

        if stats != SweepStats::default() {
            info!(
                stuck_failed = stats.stuck_failed,
                purged = stats.purged,
                "Retention sweep"
            );
        }
        stats
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
