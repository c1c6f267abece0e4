//! Strategy orchestration for action extraction.

use std::fmt;

use tracing::debug;

use crate::invocation::CandidateInvocation;
use crate::{fuzzy, markdown, natural, tag};

/// Which strategy produced a batch of candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    Tag,
    FuzzyTag,
    Markdown,
    Natural,
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionStrategy::Tag => write!(f, "tag"),
            ExtractionStrategy::FuzzyTag => write!(f, "fuzzy_tag"),
            ExtractionStrategy::Markdown => write!(f, "markdown"),
            ExtractionStrategy::Natural => write!(f, "natural"),
        }
    }
}

/// Extraction front door applying the four strategies in strict precedence.
///
/// Later strategies are fallbacks, not supplements: the first strategy
/// that yields at least one candidate wins and the rest never run.
#[derive(Debug, Clone, Default)]
pub struct Extractor;

impl Extractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract candidate invocations from raw text, ordered by position.
    ///
    /// An empty result is not an error; it means no action was requested.
    pub fn extract(&self, text: &str) -> Vec<CandidateInvocation> {
        self.extract_with_strategy(text)
            .map(|(_, candidates)| candidates)
            .unwrap_or_default()
    }

    /// Extract candidates along with the strategy that produced them.
    pub fn extract_with_strategy(
        &self,
        text: &str,
    ) -> Option<(ExtractionStrategy, Vec<CandidateInvocation>)> {
        let strategies: [(ExtractionStrategy, fn(&str) -> Vec<CandidateInvocation>); 4] = [
            (ExtractionStrategy::Tag, tag::extract),
            (ExtractionStrategy::FuzzyTag, fuzzy::extract),
            (ExtractionStrategy::Markdown, markdown::extract),
            (ExtractionStrategy::Natural, natural::extract),
        ];

        for (strategy, run) in strategies {
            let mut candidates = run(text);
            if !candidates.is_empty() {
                candidates.sort_by_key(|inv| inv.source_offset);
                debug!(
                    strategy = %strategy,
                    count = candidates.len(),
                    "Extraction strategy matched"
                );
                return Some((strategy, candidates));
            }
        }

        None
    }
}
