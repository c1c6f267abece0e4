//! Shared data types for execution and job tracking.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use switchboard_core::Timestamp;
use switchboard_extract::CandidateInvocation;

// ============================================================================
// Execution
// ============================================================================

/// Ambient context carried through every execution attempt of a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionContext {
    /// Job this execution belongs to.
    pub job_id: String,
    /// Opaque identifier of whoever submitted the text.
    pub submitter_id: String,
    /// The full submitted text, made available to safety review.
    pub submitted_text: String,
}

impl ExecutionContext {
    pub fn new(job_id: impl Into<String>, submitter_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            submitter_id: submitter_id.into(),
            submitted_text: String::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.submitted_text = text.into();
        self
    }
}

/// Outcome of executing one invocation, after all retries and fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// The invocation as originally extracted, before cleaning.
    pub invocation: CandidateInvocation,
    pub succeeded: bool,
    /// Handler or fallback output. A fallback that could not recover the
    /// invocation still produces explanatory output here.
    pub output: Option<Value>,
    pub failure_reason: Option<String>,
    /// Dispatch attempts actually made, including the first.
    pub attempt_count: u32,
    pub used_fallback: bool,
    pub completed_at: Timestamp,
}

impl ExecutionResult {
    pub fn success(invocation: CandidateInvocation, output: Value, attempt_count: u32) -> Self {
        Self {
            invocation,
            succeeded: true,
            output: Some(output),
            failure_reason: None,
            attempt_count,
            used_fallback: false,
            completed_at: Timestamp::now(),
        }
    }

    pub fn failure(
        invocation: CandidateInvocation,
        reason: impl Into<String>,
        attempt_count: u32,
    ) -> Self {
        Self {
            invocation,
            succeeded: false,
            output: None,
            failure_reason: Some(reason.into()),
            attempt_count,
            used_fallback: false,
            completed_at: Timestamp::now(),
        }
    }
}

// ============================================================================
// Jobs
// ============================================================================

/// Lifecycle state of a submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl JobState {
    /// Terminal states never transition again; their results are frozen.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::Failed | JobState::Cancelled
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Pending => "pending",
            JobState::Processing => "processing",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
            JobState::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for JobState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(JobState::Pending),
            "processing" => Ok(JobState::Processing),
            "completed" => Ok(JobState::Completed),
            "failed" => Ok(JobState::Failed),
            "cancelled" => Ok(JobState::Cancelled),
            _ => Err(format!("Unknown job state: {}", s)),
        }
    }
}

/// A tracked unit of asynchronous work: one submitted text and everything
/// that came of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub submitter_id: String,
    pub text: String,
    /// Clarifying context appended by the submitter mid-flight.
    pub additional_context: Vec<String>,
    pub state: JobState,
    pub results: Vec<ExecutionResult>,
    /// Latest human-readable progress output, updated as results land.
    pub partial_output: Option<String>,
    /// Populated when the job ends up Failed.
    pub failure_reason: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl Job {
    pub fn new(id: impl Into<String>, submitter_id: impl Into<String>, text: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            id: id.into(),
            submitter_id: submitter_id.into(),
            text: text.into(),
            additional_context: Vec::new(),
            state: JobState::Pending,
            results: Vec::new(),
            partial_output: None,
            failure_reason: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }
}

/// Point-in-time view of a job handed to callers of the query surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub id: String,
    pub state: JobState,
    pub partial_output: Option<String>,
    pub results: Vec<ExecutionResult>,
    /// Aggregated failure description, present only for Failed jobs.
    pub error: Option<String>,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl From<&Job> for JobSnapshot {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id.clone(),
            state: job.state,
            partial_output: job.partial_output.clone(),
            results: job.results.clone(),
            error: job.failure_reason.clone(),
            created_at: job.created_at,
            completed_at: job.completed_at,
        }
    }
}
