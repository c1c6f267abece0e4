//! Web search capability.
//!
//! No network backend ships with the pipeline; this handler acknowledges
//! the query deterministically so the rest of the stack (resolution,
//! validation, job tracking) can exercise a fourth family end to end.
//! Deployments wire a real backend by registering their own handler
//! instead of this one.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ExecutionError;
use crate::registry::CapabilityHandler;
use crate::types::ExecutionContext;
use switchboard_extract::CandidateInvocation;

/// Handler for the `web` family. Verb: `search`.
pub struct WebSearchHandler;

#[async_trait]
impl CapabilityHandler for WebSearchHandler {
    async fn invoke(
        &self,
        invocation: &CandidateInvocation,
        _ctx: &ExecutionContext,
    ) -> Result<Value, ExecutionError> {
        let query = invocation
            .parameters
            .get("query")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .or_else(|| invocation.payload.clone())
            .ok_or_else(|| ExecutionError::MissingParameter("query".to_string()))?;

        Ok(Value::String(format!(
            "No search backend is configured; the query '{}' was recorded but not executed.",
            query
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_echoes_query() {
        let inv = CandidateInvocation::bare("web", "search", 0).with_payload("rust jobs");
        let ctx = ExecutionContext::new("j-1", "cli:test");

        let out = WebSearchHandler.invoke(&inv, &ctx).await.unwrap();
        assert!(out.as_str().unwrap().contains("rust jobs"));
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let inv = CandidateInvocation::bare("web", "search", 0);
        let ctx = ExecutionContext::new("j-1", "cli:test");

        let err = WebSearchHandler.invoke(&inv, &ctx).await.unwrap_err();
        assert!(matches!(err, ExecutionError::MissingParameter(_)));
    }
}
