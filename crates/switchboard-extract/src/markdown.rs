//! Strategy 3: markdown-style markers.
//!
//! A bold or emphasized label at the start of a line (optionally behind a
//! list bullet) maps through a fixed table to a (family, verb) pair, with
//! the rest of the line as payload. Examples:
//!
//! `**Calculate:** 5+5`
//! `- __remember__: the standup moved to 9:30`

use std::sync::LazyLock;

use regex::Regex;

use crate::invocation::CandidateInvocation;

/// Label table: lowercase marker label to (family, verb).
const LABELS: &[(&str, &str, &str)] = &[
    ("calculate", "calculator", "calculate"),
    ("calc", "calculator", "calculate"),
    ("remember", "memory", "remember"),
    ("memorize", "memory", "remember"),
    ("recall", "memory", "recall"),
    ("forget", "memory", "forget"),
    ("search", "web", "search"),
    ("find", "web", "search"),
    ("time", "clock", "now"),
    ("clock", "clock", "now"),
];

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alts: Vec<&str> = LABELS.iter().map(|(label, _, _)| *label).collect();
    Regex::new(&format!(
        r"(?mi)^\s*(?:[-*+]\s+)?(?:\*\*|__)\s*({})\s*:?\s*(?:\*\*|__)\s*:?\s*(.*)$",
        alts.join("|")
    ))
    .expect("Invalid markdown marker regex")
});

/// Extract invocations from markdown labels, in text order.
pub fn extract(text: &str) -> Vec<CandidateInvocation> {
    let mut candidates = Vec::new();

    for caps in MARKER_RE.captures_iter(text) {
        let whole = caps.get(0).expect("whole marker match");
        let label = caps.get(1).map_or("", |m| m.as_str()).to_lowercase();
        let rest = caps.get(2).map_or("", |m| m.as_str());

        if let Some((_, family, verb)) = LABELS.iter().find(|(l, _, _)| *l == label) {
            candidates.push(
                CandidateInvocation::bare(*family, *verb, whole.start()).with_payload(rest),
            );
        }
    }

    candidates
}
