//! Strategy 1: well-formed tag syntax.
//!
//! `<family verb="x" key="value" .../>` or
//! `<family verb="x">payload</family>`. The tag name is the capability
//! family; the `verb` attribute is mandatory. A match without a verb is
//! discarded on its own -- other tags in the same text are still parsed.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::invocation::{coerce_value, CandidateInvocation};

static OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<([A-Za-z][A-Za-z0-9_-]*)((?:\s+[A-Za-z_][A-Za-z0-9_-]*\s*=\s*"[^"]*")*)\s*(/?)>"#,
    )
    .expect("Invalid tag open regex")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][A-Za-z0-9_-]*)\s*=\s*"([^"]*)""#).expect("Invalid attribute regex")
});

static CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</\s*([A-Za-z][A-Za-z0-9_-]*)\s*>").expect("Invalid close regex"));

/// Extract invocations from well-formed tags, in text order.
pub fn extract(text: &str) -> Vec<CandidateInvocation> {
    let mut candidates = Vec::new();
    let mut scan_from = 0usize;

    while let Some(caps) = OPEN_RE.captures_at(text, scan_from) {
        let open = caps.get(0).expect("whole open match");
        let family = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let attr_blob = caps.get(2).map_or("", |m| m.as_str());
        let self_closing = !caps.get(3).map_or("", |m| m.as_str()).is_empty();

        let mut verb = None;
        let mut parameters = std::collections::BTreeMap::new();
        for attr in ATTR_RE.captures_iter(attr_blob) {
            let key = &attr[1];
            let value = &attr[2];
            if key == "verb" {
                verb = Some(value.to_string());
            } else {
                parameters.insert(key.to_string(), coerce_value(value));
            }
        }

        // Payload requires a matching closing tag; an unclosed body is not
        // well-formed and is left for the fuzzy strategy.
        let mut payload: Option<String> = None;
        let mut next_scan = open.end();
        if !self_closing {
            let close = CLOSE_RE
                .captures_iter(&text[open.end()..])
                .find(|c| &c[1] == family);
            match close {
                Some(c) => {
                    let m = c.get(0).expect("whole close match");
                    let inner = &text[open.end()..open.end() + m.start()];
                    let trimmed = inner.trim();
                    if !trimmed.is_empty() {
                        payload = Some(trimmed.to_string());
                    }
                    next_scan = open.end() + m.end();
                }
                None => {
                    scan_from = open.end();
                    continue;
                }
            }
        }

        match verb {
            Some(verb) => candidates.push(CandidateInvocation {
                family,
                verb,
                parameters,
                payload,
                source_offset: open.start(),
            }),
            None => {
                debug!(family = %family, "Discarding tag without verb attribute");
            }
        }
        scan_from = next_scan;
    }

    candidates
}
