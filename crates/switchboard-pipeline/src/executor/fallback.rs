//! Last-resort handling once retries are exhausted.
//!
//! Two shapes of fallback. Families with a deterministic local answer
//! (calculator arithmetic, clock time) are genuinely recovered and count
//! as successes. Every other family gets a templated explanation of what
//! could not be done; the result carries that output but still reports
//! failure, so callers are never misled about whether the action ran.

use serde_json::Value;
use tracing::debug;

use crate::registry::builtin;
use switchboard_extract::CandidateInvocation;

/// What the fallback produced for a failed invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackOutcome {
    /// A local evaluator answered the invocation; treat it as a success.
    Recovered(Value),
    /// Nothing local could answer; explanatory output for a failed result.
    Unavailable(Value),
}

/// Build the fallback outcome for an invocation whose attempts are spent.
pub fn fallback_for(invocation: &CandidateInvocation) -> FallbackOutcome {
    match invocation.family.as_str() {
        "calculator" => {
            if let Some(expression) = builtin::expression_of(invocation) {
                if let Ok(value) = builtin::evaluate(&expression) {
                    debug!(%expression, value, "Arithmetic fallback recovered invocation");
                    return FallbackOutcome::Recovered(builtin::render_number(value));
                }
            }
            FallbackOutcome::Unavailable(Value::String(format!(
                "The expression '{}' could not be evaluated.",
                builtin::expression_of(invocation).unwrap_or_default()
            )))
        }
        "clock" => FallbackOutcome::Recovered(Value::String(builtin::current_time())),
        family => FallbackOutcome::Unavailable(Value::String(format!(
            "The {} service is unavailable right now; '{}' was not executed.",
            family, invocation.verb
        ))),
    }
}
