//! Candidate invocation type and attribute value coercion.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A structured action request recovered from raw text.
///
/// Immutable once produced. `source_offset` is the byte position of the
/// producing match in the original text; it establishes execution order
/// when one text yields multiple invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateInvocation {
    pub family: String,
    pub verb: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
    pub payload: Option<String>,
    pub source_offset: usize,
}

impl CandidateInvocation {
    /// Build an invocation with no parameters or payload.
    pub fn bare(family: impl Into<String>, verb: impl Into<String>, source_offset: usize) -> Self {
        Self {
            family: family.into(),
            verb: verb.into(),
            parameters: BTreeMap::new(),
            payload: None,
            source_offset,
        }
    }

    /// Set the payload if the given text is non-empty after trimming.
    pub fn with_payload(mut self, text: &str) -> Self {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.payload = Some(trimmed.to_string());
        }
        self
    }
}

/// Coerce a raw attribute value into its typed JSON form.
///
/// Integers, floats, and booleans become their typed values; everything
/// else stays a string.
pub fn coerce_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_finite() {
            return Value::from(f);
        }
    }
    match trimmed {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}
