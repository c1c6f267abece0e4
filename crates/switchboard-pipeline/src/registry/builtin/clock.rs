//! Clock capability: current time queries.

use async_trait::async_trait;
use chrono::SecondsFormat;
use serde_json::Value;
use switchboard_core::Timestamp;

use crate::error::ExecutionError;
use crate::registry::CapabilityHandler;
use crate::types::ExecutionContext;
use switchboard_extract::CandidateInvocation;

/// Current UTC time as an RFC 3339 string.
pub fn current_time() -> String {
    Timestamp::now()
        .to_datetime()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Handler for the `clock` family. Verb: `now`.
pub struct ClockHandler;

#[async_trait]
impl CapabilityHandler for ClockHandler {
    async fn invoke(
        &self,
        _invocation: &CandidateInvocation,
        _ctx: &ExecutionContext,
    ) -> Result<Value, ExecutionError> {
        Ok(Value::String(current_time()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clock_returns_rfc3339() {
        let inv = CandidateInvocation::bare("clock", "now", 0);
        let ctx = ExecutionContext::new("j-1", "cli:test");

        let out = ClockHandler.invoke(&inv, &ctx).await.unwrap();
        let text = out.as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(text).is_ok());
    }
}
