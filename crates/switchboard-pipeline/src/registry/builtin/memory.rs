//! Memory capability: per-submitter key-value recall.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ExecutionError;
use crate::registry::CapabilityHandler;
use crate::types::ExecutionContext;
use crate::variables::VariableStore;
use switchboard_extract::CandidateInvocation;

/// Handler for the `memory` family. Verbs: `remember`, `recall`, `forget`.
///
/// Writes go through the shared [`VariableStore`], which also feeds
/// `{{var}}` interpolation, so remembered values are usable by later
/// invocations in the same or subsequent jobs.
pub struct MemoryHandler {
    store: Arc<dyn VariableStore>,
}

impl MemoryHandler {
    pub fn new(store: Arc<dyn VariableStore>) -> Self {
        Self { store }
    }
}

fn string_parameter(invocation: &CandidateInvocation, name: &str) -> Option<String> {
    invocation.parameters.get(name).map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Key to operate on: the `key` parameter, falling back to the payload.
fn key_of(invocation: &CandidateInvocation) -> Result<String, ExecutionError> {
    string_parameter(invocation, "key")
        .or_else(|| invocation.payload.clone())
        .ok_or_else(|| ExecutionError::MissingParameter("key".to_string()))
}

#[async_trait]
impl CapabilityHandler for MemoryHandler {
    async fn invoke(
        &self,
        invocation: &CandidateInvocation,
        ctx: &ExecutionContext,
    ) -> Result<Value, ExecutionError> {
        match invocation.verb.as_str() {
            "remember" => {
                // Either key/value parameters, or a free-text payload
                // stored under a well-known key.
                let (key, value) = match (
                    string_parameter(invocation, "key"),
                    string_parameter(invocation, "value"),
                ) {
                    (Some(key), Some(value)) => (key, value),
                    _ => {
                        let note = invocation.payload.clone().ok_or_else(|| {
                            ExecutionError::MissingParameter("value".to_string())
                        })?;
                        ("note".to_string(), note)
                    }
                };
                self.store.set(&ctx.submitter_id, &key, value.clone());
                Ok(Value::String(format!("Remembered {} = {}", key, value)))
            }
            "recall" => {
                let key = key_of(invocation)?;
                match self.store.get(&ctx.submitter_id, &key) {
                    Some(value) => Ok(Value::String(value)),
                    None => Err(ExecutionError::HandlerFailed(format!(
                        "nothing stored under '{}'",
                        key
                    ))),
                }
            }
            "forget" => {
                let key = key_of(invocation)?;
                match self.store.remove(&ctx.submitter_id, &key) {
                    Some(_) => Ok(Value::String(format!("Forgot {}", key))),
                    None => Err(ExecutionError::HandlerFailed(format!(
                        "nothing stored under '{}'",
                        key
                    ))),
                }
            }
            other => Err(ExecutionError::HandlerFailed(format!(
                "memory does not implement verb '{}'",
                other
            ))),
        }
    }
}
