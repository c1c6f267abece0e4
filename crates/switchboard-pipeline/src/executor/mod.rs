//! Invocation executor: clean, interpolate, safety-review, dispatch,
//! validate, retry, fall back.
//!
//! Every attempt re-runs the full stage sequence, including safety
//! review, so a retry can never slip past the gate with state the first
//! attempt did not have.

pub mod clean;
pub mod fallback;
pub mod interpolate;
pub mod retry;
pub mod validate;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use switchboard_core::config::ExecutorConfig;
use switchboard_core::Timestamp;
use switchboard_extract::CandidateInvocation;

use crate::error::ExecutionError;
use crate::registry::{CapabilityRegistry, Resolution};
use crate::safety::SafetyGate;
use crate::types::{ExecutionContext, ExecutionResult};
use crate::variables::VariableStore;
use fallback::FallbackOutcome;
use retry::RetryPolicy;

pub struct Executor {
    registry: Arc<CapabilityRegistry>,
    gate: Arc<SafetyGate>,
    variables: Arc<dyn VariableStore>,
    config: ExecutorConfig,
}

impl Executor {
    pub fn new(
        registry: Arc<CapabilityRegistry>,
        gate: Arc<SafetyGate>,
        variables: Arc<dyn VariableStore>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            registry,
            gate,
            variables,
            config,
        }
    }

    fn policy_for(&self, resolution: &Result<Resolution, crate::error::RegistryError>) -> RetryPolicy {
        let base = Duration::from_millis(self.config.backoff_base_ms);
        match resolution {
            Ok(res) if res.registration.irreversible => {
                RetryPolicy::new(self.config.irreversible_max_attempts, base)
            }
            _ => RetryPolicy::new(self.config.max_attempts, base),
        }
    }

    /// Run one invocation to completion. Infallible by construction:
    /// every failure mode ends in an [`ExecutionResult`] rather than an
    /// error, so one bad invocation never aborts its job.
    pub async fn execute(
        &self,
        invocation: &CandidateInvocation,
        ctx: &ExecutionContext,
    ) -> ExecutionResult {
        let resolution = self.registry.resolve(&invocation.family, &invocation.verb);
        let policy = self.policy_for(&resolution);

        let mut attempt = 0u32;
        let last_prepared: CandidateInvocation;
        let last_error: ExecutionError;

        loop {
            attempt += 1;
            let registration = resolution.as_ref().ok().map(|r| r.registration.as_ref());
            let cleaned = clean::clean(invocation, registration, attempt);
            let prepared =
                interpolate::interpolate(cleaned, self.variables.as_ref(), &ctx.submitter_id);

            let verdict = self.gate.review(&prepared, &ctx.submitted_text).await;
            if !verdict.allowed {
                // Denials are final: no retry and no fallback, since a
                // fallback answer would sidestep the gate.
                return ExecutionResult::failure(
                    invocation.clone(),
                    format!("safety gate denied the invocation: {}", verdict.reason),
                    attempt,
                );
            }

            let attempt_outcome = match &resolution {
                Err(e) => Err(ExecutionError::Registry(e.clone())),
                Ok(res) => self.dispatch(res, &prepared, ctx).await,
            };

            match attempt_outcome {
                Ok(output) => {
                    debug!(
                        job_id = %ctx.job_id,
                        family = %invocation.family,
                        verb = %invocation.verb,
                        attempt,
                        "Invocation succeeded"
                    );
                    return ExecutionResult::success(invocation.clone(), output, attempt);
                }
                Err(e) => {
                    warn!(
                        job_id = %ctx.job_id,
                        family = %invocation.family,
                        verb = %invocation.verb,
                        attempt,
                        error = %e,
                        "Invocation attempt failed"
                    );
                    if e.is_retryable() && policy.has_more(attempt) {
                        tokio::time::sleep(policy.delay_after(attempt)).await;
                        continue;
                    }
                    last_error = e;
                    last_prepared = prepared;
                    break;
                }
            }
        }

        match fallback::fallback_for(&last_prepared) {
            FallbackOutcome::Recovered(output) => {
                debug!(
                    job_id = %ctx.job_id,
                    family = %invocation.family,
                    "Fallback recovered invocation"
                );
                ExecutionResult {
                    invocation: invocation.clone(),
                    succeeded: true,
                    output: Some(output),
                    failure_reason: None,
                    attempt_count: attempt,
                    used_fallback: true,
                    completed_at: Timestamp::now(),
                }
            }
            FallbackOutcome::Unavailable(output) => ExecutionResult {
                invocation: invocation.clone(),
                succeeded: false,
                output: Some(output),
                failure_reason: Some(last_error.to_string()),
                attempt_count: attempt,
                used_fallback: true,
                completed_at: Timestamp::now(),
            },
        }
    }

    async fn dispatch(
        &self,
        resolution: &Resolution,
        prepared: &CandidateInvocation,
        ctx: &ExecutionContext,
    ) -> Result<serde_json::Value, ExecutionError> {
        for name in &resolution.registration.required_parameters {
            if !prepared.parameters.contains_key(name.as_str()) {
                return Err(ExecutionError::MissingParameter(name.clone()));
            }
        }

        // Dispatch with the canonical verb, whatever the submitter wrote.
        let mut dispatched = prepared.clone();
        dispatched.verb = resolution.verb.clone();

        let timeout = Duration::from_millis(self.config.handler_timeout_ms);
        let output = tokio::time::timeout(
            timeout,
            resolution.registration.handler.invoke(&dispatched, ctx),
        )
        .await
        .map_err(|_| ExecutionError::Timeout(self.config.handler_timeout_ms))??;

        validate::validate(&prepared.family, &output)?;
        Ok(output)
    }
}
