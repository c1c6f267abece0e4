//! Strategy 2: malformed/fuzzy tag syntax.
//!
//! Recovers tag-shaped markers the strict parser rejects: unquoted or
//! single-quoted attribute values, unescaped/unclosed quotes, unclosed
//! tags (payload reconstructed up to the next `<` or end of text), and a
//! bare verb token in place of the `verb` attribute.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::invocation::{coerce_value, CandidateInvocation};

static FUZZY_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<\s*([A-Za-z][A-Za-z0-9_-]*)([^<>]*)(>?)").expect("Invalid fuzzy open regex")
});

// Attribute values: double-quoted (tolerating a missing closing quote),
// single-quoted, or an unquoted token.
static ATTR_LOOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][A-Za-z0-9_-]*)\s*=\s*(?:"([^"]*)"?|'([^']*)'?|([^\s"'<>]+))"#)
        .expect("Invalid loose attribute regex")
});

static BARE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("Invalid bare token regex"));

/// Extract invocations from malformed tag markers, in text order.
pub fn extract(text: &str) -> Vec<CandidateInvocation> {
    let mut candidates = Vec::new();

    for caps in FUZZY_OPEN_RE.captures_iter(text) {
        let whole = caps.get(0).expect("whole fuzzy match");
        let family = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let attr_blob = caps.get(2).map_or("", |m| m.as_str());
        let closed_bracket = !caps.get(3).map_or("", |m| m.as_str()).is_empty();

        let (mut verb, parameters, bare_tokens) = parse_attrs(attr_blob);

        if verb.is_none() {
            verb = bare_tokens.into_iter().next();
        }

        // Reconstruct the payload: everything after `>` up to the next tag
        // marker (or end of text for an unclosed body).
        let mut payload: Option<String> = None;
        if closed_bracket {
            let rest = &text[whole.end()..];
            let end = rest.find('<').unwrap_or(rest.len());
            let body = rest[..end].trim();
            if !body.is_empty() {
                payload = Some(body.to_string());
            }
        }

        // Verb embedded as free text near the marker: first word of the
        // body, with the remainder kept as payload.
        if verb.is_none() {
            if let Some(body) = payload.take() {
                let mut parts = body.splitn(2, char::is_whitespace);
                let head = parts.next().unwrap_or("").trim_matches(':');
                if BARE_TOKEN_RE.is_match(head) {
                    verb = Some(head.to_string());
                    payload = parts
                        .next()
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string);
                } else {
                    payload = Some(body);
                }
            }
        }

        match verb {
            Some(verb) => candidates.push(CandidateInvocation {
                family,
                verb,
                parameters,
                payload,
                source_offset: whole.start(),
            }),
            None => {
                debug!(family = %family, "Fuzzy tag has no recoverable verb; skipping");
            }
        }
    }

    candidates
}

/// Split an attribute blob into (verb, typed parameters, bare tokens).
fn parse_attrs(
    attr_blob: &str,
) -> (
    Option<String>,
    BTreeMap<String, serde_json::Value>,
    Vec<String>,
) {
    let mut verb = None;
    let mut parameters = BTreeMap::new();
    let mut consumed = vec![false; attr_blob.len()];

    for caps in ATTR_LOOSE_RE.captures_iter(attr_blob) {
        let whole = caps.get(0).expect("whole attr match");
        consumed[whole.start()..whole.end()]
            .iter_mut()
            .for_each(|c| *c = true);

        let key = &caps[1];
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or("", |m| m.as_str());
        if key == "verb" {
            verb = Some(value.to_string());
        } else {
            parameters.insert(key.to_string(), coerce_value(value));
        }
    }

    // Anything not consumed by key=value pairs is a bare token; the first
    // one stands in for the verb when no verb attribute exists.
    let mut bare_tokens = Vec::new();
    let mut current = String::new();
    for (i, ch) in attr_blob.char_indices() {
        if consumed[i] || ch.is_whitespace() || ch == '/' {
            if !current.is_empty() {
                bare_tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        bare_tokens.push(current);
    }
    bare_tokens.retain(|t| BARE_TOKEN_RE.is_match(t));

    (verb, parameters, bare_tokens)
}
