//! Variable interpolation: `{{var}}` and `${var}` references in string
//! parameters and payloads resolve against the submitter's variable store.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;
use switchboard_extract::CandidateInvocation;

use crate::variables::VariableStore;

static VAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}|\$\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}")
        .expect("variable reference regex must compile")
});

fn interpolate_str(text: &str, store: &dyn VariableStore, submitter_id: &str) -> String {
    VAR_RE
        .replace_all(text, |caps: &Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            // Unknown variables stay as written so the handler (or the
            // submitter, reading the output) can see what was unresolved.
            store
                .get(submitter_id, name)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .to_string()
}

/// Interpolate every string-valued parameter and the payload.
pub fn interpolate(
    invocation: CandidateInvocation,
    store: &dyn VariableStore,
    submitter_id: &str,
) -> CandidateInvocation {
    let mut out = invocation;
    for value in out.parameters.values_mut() {
        if let Some(s) = value.as_str() {
            let replaced = interpolate_str(s, store, submitter_id);
            if replaced != s {
                *value = Value::String(replaced);
            }
        }
    }
    if let Some(payload) = out.payload.as_deref() {
        let replaced = interpolate_str(payload, store, submitter_id);
        if replaced != payload {
            out.payload = Some(replaced);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::InMemoryVariableStore;

    fn store_with(key: &str, value: &str) -> InMemoryVariableStore {
        let store = InMemoryVariableStore::new();
        store.set("cli:alice", key, value.to_string());
        store
    }

    #[test]
    fn test_braces_syntax() {
        let store = store_with("city", "Lisbon");
        let inv = CandidateInvocation::bare("web", "search", 0)
            .with_payload("weather in {{city}}");

        let out = interpolate(inv, &store, "cli:alice");
        assert_eq!(out.payload.as_deref(), Some("weather in Lisbon"));
    }

    #[test]
    fn test_dollar_syntax() {
        let store = store_with("city", "Lisbon");
        let mut inv = CandidateInvocation::bare("web", "search", 0);
        inv.parameters
            .insert("query".to_string(), Value::from("hotels in ${city}"));

        let out = interpolate(inv, &store, "cli:alice");
        assert_eq!(out.parameters["query"], Value::from("hotels in Lisbon"));
    }

    #[test]
    fn test_unknown_variable_left_verbatim() {
        let store = InMemoryVariableStore::new();
        let inv = CandidateInvocation::bare("web", "search", 0)
            .with_payload("weather in {{city}}");

        let out = interpolate(inv, &store, "cli:alice");
        assert_eq!(out.payload.as_deref(), Some("weather in {{city}}"));
    }

    #[test]
    fn test_interpolation_is_per_submitter() {
        let store = store_with("city", "Lisbon");
        let inv = CandidateInvocation::bare("web", "search", 0).with_payload("{{city}}");

        let out = interpolate(inv, &store, "cli:bob");
        assert_eq!(out.payload.as_deref(), Some("{{city}}"));
    }

    #[test]
    fn test_multiple_references_and_whitespace() {
        let store = store_with("a", "1");
        store.set("cli:alice", "b", "2".to_string());
        let inv = CandidateInvocation::bare("calculator", "calculate", 0)
            .with_payload("{{ a }} + ${ b }");

        let out = interpolate(inv, &store, "cli:alice");
        assert_eq!(out.payload.as_deref(), Some("1 + 2"));
    }

    #[test]
    fn test_non_string_parameters_untouched() {
        let store = store_with("limit", "9");
        let mut inv = CandidateInvocation::bare("web", "search", 0);
        inv.parameters.insert("limit".to_string(), Value::from(5));

        let out = interpolate(inv, &store, "cli:alice");
        assert_eq!(out.parameters["limit"], Value::from(5));
    }
}
