//! Safety gate: every invocation is reviewed before dispatch, on every
//! attempt.
//!
//! Two layers. Immediate rules (deny lists for host-touching families,
//! an allow list for side-effect-free families) answer synchronously.
//! Everything else goes to a pluggable deferred reviewer under a short
//! timeout. The gate fails closed: no reviewer, a reviewer error, or a
//! reviewer timeout all deny.

pub mod rules;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use switchboard_core::config::SafetyGateConfig;
use switchboard_extract::CandidateInvocation;

/// The gate's decision for one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyVerdict {
    /// The invocation the verdict applies to, as reviewed.
    pub invocation: CandidateInvocation,
    pub allowed: bool,
    pub reason: String,
    /// True when the verdict came from the synchronous rules rather than
    /// deferred review.
    pub immediate: bool,
}

/// A deferred review decision.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub allowed: bool,
    pub reason: String,
}

/// External review hook for invocations the immediate rules do not
/// decide. Implementations might consult a policy service or a human
/// approval queue.
#[async_trait]
pub trait SafetyReviewer: Send + Sync {
    async fn review(
        &self,
        invocation: &CandidateInvocation,
        submitted_text: &str,
    ) -> Result<ReviewOutcome, String>;
}

pub struct SafetyGate {
    config: SafetyGateConfig,
    reviewer: Option<Arc<dyn SafetyReviewer>>,
}

impl SafetyGate {
    pub fn new(config: SafetyGateConfig) -> Self {
        Self {
            config,
            reviewer: None,
        }
    }

    pub fn with_reviewer(mut self, reviewer: Arc<dyn SafetyReviewer>) -> Self {
        self.reviewer = Some(reviewer);
        self
    }

    /// Review one invocation. Never errors: any uncertainty becomes a
    /// denial.
    pub async fn review(
        &self,
        invocation: &CandidateInvocation,
        submitted_text: &str,
    ) -> SafetyVerdict {
        if let Some((allowed, reason)) = rules::immediate_verdict(&self.config, invocation) {
            if !allowed {
                warn!(
                    family = %invocation.family,
                    verb = %invocation.verb,
                    %reason,
                    "Invocation denied by immediate rules"
                );
            }
            return SafetyVerdict {
                invocation: invocation.clone(),
                allowed,
                reason,
                immediate: true,
            };
        }

        let deferred = match &self.reviewer {
            Some(reviewer) => {
                let timeout = Duration::from_millis(self.config.review_timeout_ms);
                match tokio::time::timeout(
                    timeout,
                    reviewer.review(invocation, submitted_text),
                )
                .await
                {
                    Ok(Ok(outcome)) => (outcome.allowed, outcome.reason),
                    Ok(Err(e)) => (false, format!("review failed: {}", e)),
                    Err(_) => (
                        false,
                        format!(
                            "review did not answer within {} ms",
                            self.config.review_timeout_ms
                        ),
                    ),
                }
            }
            None => (
                false,
                "no reviewer configured for a family outside the allow list".to_string(),
            ),
        };

        let (allowed, reason) = deferred;
        if !allowed {
            warn!(
                family = %invocation.family,
                verb = %invocation.verb,
                %reason,
                "Invocation denied by deferred review"
            );
        }
        SafetyVerdict {
            invocation: invocation.clone(),
            allowed,
            reason,
            immediate: false,
        }
    }
}
