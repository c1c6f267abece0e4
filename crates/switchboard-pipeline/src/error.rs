//! Error types for capability resolution, execution, and job tracking.

use switchboard_core::SwitchboardError;
use thiserror::Error;

use crate::types::JobState;

/// Errors raised while registering or resolving capabilities.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("capability family '{0}' is already registered")]
    DuplicateFamily(String),

    #[error("unknown capability family '{family}' (registered: {})", .known.join(", "))]
    UnknownFamily { family: String, known: Vec<String> },

    #[error("unknown verb '{verb}' for family '{family}' (valid verbs: {})", .valid.join(", "))]
    UnknownVerb {
        family: String,
        verb: String,
        valid: Vec<String>,
    },
}

/// Errors raised by a single execution attempt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("safety gate denied the invocation: {0}")]
    SafetyDenied(String),

    #[error("handler failed: {0}")]
    HandlerFailed(String),

    #[error("missing required parameter '{0}'")]
    MissingParameter(String),

    #[error("handler produced invalid output: {0}")]
    InvalidOutput(String),

    #[error("handler timed out after {0} ms")]
    Timeout(u64),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ExecutionError {
    /// Whether another attempt at the same invocation could plausibly
    /// succeed. Resolution failures and safety denials are deterministic,
    /// so retrying them only burns attempts.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            ExecutionError::Registry(_) | ExecutionError::SafetyDenied(_)
        )
    }
}

/// Errors raised by the job store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JobError {
    #[error("job not found: {0}")]
    NotFound(String),

    #[error("job id already in use: {0}")]
    DuplicateId(String),

    #[error("invalid job state transition: {from} -> {to}")]
    InvalidTransition { from: JobState, to: JobState },
}

impl From<RegistryError> for SwitchboardError {
    fn from(err: RegistryError) -> Self {
        SwitchboardError::Registry(err.to_string())
    }
}

impl From<ExecutionError> for SwitchboardError {
    fn from(err: ExecutionError) -> Self {
        SwitchboardError::Execution(err.to_string())
    }
}

impl From<JobError> for SwitchboardError {
    fn from(err: JobError) -> Self {
        SwitchboardError::Job(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_verb_lists_valid_verbs() {
        let err = RegistryError::UnknownVerb {
            family: "calculator".to_string(),
            verb: "explode".to_string(),
            valid: vec!["calculate".to_string(), "evaluate".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("explode"));
        assert!(msg.contains("calculate, evaluate"));
    }

    #[test]
    fn test_registry_errors_are_not_retryable() {
        let err = ExecutionError::Registry(RegistryError::UnknownFamily {
            family: "nope".to_string(),
            known: vec![],
        });
        assert!(!err.is_retryable());
        assert!(!ExecutionError::SafetyDenied("blocked".to_string()).is_retryable());
    }

    #[test]
    fn test_transient_errors_are_retryable() {
        assert!(ExecutionError::HandlerFailed("flaky".to_string()).is_retryable());
        assert!(ExecutionError::Timeout(10_000).is_retryable());
        assert!(ExecutionError::InvalidOutput("null".to_string()).is_retryable());
    }

    #[test]
    fn test_conversion_to_core_error() {
        let err: SwitchboardError = JobError::NotFound("abc".to_string()).into();
        assert!(err.to_string().contains("abc"));
    }
}
