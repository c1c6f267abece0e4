//! Strategy 4: natural-language pattern matching.
//!
//! Last-resort keyword heuristics per supported family: arithmetic
//! expressions, remember/recall phrases, search/find phrases, and time
//! queries. Each pattern contributes at most one candidate per hit, and
//! overlapping hits keep the earlier, more specific pattern.

use std::sync::LazyLock;

use regex::Regex;

use crate::invocation::CandidateInvocation;

struct NaturalPattern {
    regex: Regex,
    family: &'static str,
    verb: &'static str,
    /// Strip whitespace from the captured payload (arithmetic expressions).
    compact_payload: bool,
}

static PATTERNS: LazyLock<Vec<NaturalPattern>> = LazyLock::new(|| {
    let mk = |pat: &str, family: &'static str, verb: &'static str, compact: bool| NaturalPattern {
        regex: Regex::new(pat).expect("Invalid natural-language regex"),
        family,
        verb,
        compact_payload: compact,
    };

    vec![
        // Arithmetic: an explicit verb followed by an expression, or a bare
        // expression with at least one operator.
        mk(
            r"(?i)\b(?:calculate|compute|evaluate|what\s+is|what's)\s+([0-9(][0-9\s.+\-*/%^()]*[0-9)])",
            "calculator",
            "calculate",
            true,
        ),
        mk(
            r"(?:^|[^\w.])([0-9]+(?:\.[0-9]+)?\s*[+\-*/]\s*[0-9(][0-9\s.+\-*/%^()]*)",
            "calculator",
            "calculate",
            true,
        ),
        // Memory: remember/recall phrasing.
        mk(
            r"(?i)\bremember\s+(?:that\s+)?(.+?)(?:[.!?]|$)",
            "memory",
            "remember",
            false,
        ),
        mk(
            r"(?i)\b(?:recall|what\s+do\s+you\s+(?:know|remember)\s+about)\s+(.+?)(?:[.!?]|$)",
            "memory",
            "recall",
            false,
        ),
        // Web search: search/find/look up phrasing.
        mk(
            r"(?i)\b(?:search|look\s*up|google)\s+(?:for\s+)?(.+?)(?:[.!?]|$)",
            "web",
            "search",
            false,
        ),
        mk(
            r"(?i)\bfind\s+(?:me\s+)?(.+?)(?:[.!?]|$)",
            "web",
            "search",
            false,
        ),
        // Time queries: no payload.
        mk(
            r"(?i)\bwhat\s+time\s+is\s+it\b|\bcurrent\s+time\b|\btime\s+(?:right\s+)?now\b",
            "clock",
            "now",
            false,
        ),
    ]
});

/// Extract invocations from natural-language heuristics, in text order.
pub fn extract(text: &str) -> Vec<CandidateInvocation> {
    let mut hits: Vec<(usize, usize, CandidateInvocation)> = Vec::new();

    for pattern in PATTERNS.iter() {
        let Some(caps) = pattern.regex.captures(text) else {
            continue;
        };
        let whole = caps.get(0).expect("whole natural match");

        let payload = caps.get(1).map(|m| {
            if pattern.compact_payload {
                m.as_str().split_whitespace().collect::<String>()
            } else {
                m.as_str().trim().to_string()
            }
        });
        let payload = payload.filter(|p| !p.is_empty());

        let mut inv = CandidateInvocation::bare(pattern.family, pattern.verb, whole.start());
        inv.payload = payload;
        hits.push((whole.start(), whole.end(), inv));
    }

    // Earlier patterns are more specific; drop later hits that overlap an
    // accepted span so one phrase does not yield duplicate candidates.
    let mut accepted: Vec<(usize, usize)> = Vec::new();
    let mut candidates = Vec::new();
    for (start, end, inv) in hits {
        let overlaps = accepted.iter().any(|(s, e)| start < *e && *s < end);
        if !overlaps {
            accepted.push((start, end));
            candidates.push(inv);
        }
    }

    candidates.sort_by_key(|inv| inv.source_offset);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_phrase() {
        let out = extract("calculate 5 + 5");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].family, "calculator");
        assert_eq!(out[0].verb, "calculate");
        assert_eq!(out[0].payload.as_deref(), Some("5+5"));
    }

    #[test]
    fn test_what_is_arithmetic() {
        let out = extract("what is 12 * (3 + 4)");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].payload.as_deref(), Some("12*(3+4)"));
    }

    #[test]
    fn test_bare_expression() {
        let out = extract("hmm, 40 / 8 maybe?");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].family, "calculator");
        assert_eq!(out[0].payload.as_deref(), Some("40/8"));
    }

    #[test]
    fn test_explicit_and_bare_do_not_duplicate() {
        // Both arithmetic patterns hit the same span; only one candidate.
        let out = extract("calculate 5 + 5 please");
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_remember_phrase() {
        let out = extract("please remember that the wifi password is hunter2");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].family, "memory");
        assert_eq!(out[0].verb, "remember");
        assert_eq!(
            out[0].payload.as_deref(),
            Some("the wifi password is hunter2")
        );
    }

    #[test]
    fn test_recall_phrase() {
        let out = extract("recall the wifi password");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].verb, "recall");
        assert_eq!(out[0].payload.as_deref(), Some("the wifi password"));
    }

    #[test]
    fn test_search_phrase() {
        let out = extract("search for rust async tutorials.");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].family, "web");
        assert_eq!(out[0].verb, "search");
        assert_eq!(out[0].payload.as_deref(), Some("rust async tutorials"));
    }

    #[test]
    fn test_find_phrase() {
        let out = extract("find me a decent espresso grinder");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].family, "web");
        assert_eq!(out[0].payload.as_deref(), Some("a decent espresso grinder"));
    }

    #[test]
    fn test_time_query_no_payload() {
        let out = extract("hey, what time is it?");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].family, "clock");
        assert_eq!(out[0].verb, "now");
        assert!(out[0].payload.is_none());
    }

    #[test]
    fn test_no_patterns_in_plain_prose() {
        assert!(extract("the weather was lovely this morning").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_distinct_phrases_keep_text_order() {
        let out = extract("remember that I parked on level three. what time is it?");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].family, "memory");
        assert_eq!(out[1].family, "clock");
        assert!(out[0].source_offset < out[1].source_offset);
    }
}
