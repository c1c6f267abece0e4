//! Execution half of the Switchboard pipeline.
//!
//! `switchboard-extract` turns raw text into candidate invocations; this
//! crate resolves them against the capability registry, gates them for
//! safety, executes them with retry and fallback, and tracks every
//! submission as an asynchronous job.

pub mod error;
pub mod executor;
pub mod job;
pub mod pipeline;
pub mod registry;
pub mod safety;
pub mod throttle;
pub mod types;
pub mod variables;

pub use error::{ExecutionError, JobError, RegistryError};
pub use executor::Executor;
pub use job::{JobStore, JobSweeper};
pub use pipeline::Pipeline;
pub use registry::{
    builtin::register_builtins, CapabilityHandler, CapabilityRegistration, CapabilityRegistry,
};
pub use safety::{ReviewOutcome, SafetyGate, SafetyReviewer, SafetyVerdict};
pub use types::{ExecutionContext, ExecutionResult, Job, JobSnapshot, JobState};
pub use variables::{InMemoryVariableStore, VariableStore};
