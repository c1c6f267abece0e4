//! Invocation cleaning: normalize what extraction produced into what a
//! handler wants to see.

use switchboard_extract::{coerce_value, CandidateInvocation};

use crate::registry::CapabilityRegistration;

/// Characters allowed in an arithmetic expression.
fn is_expression_char(c: char) -> bool {
    c.is_ascii_digit() || "+-*/%^(). ".contains(c)
}

/// Produce the cleaned invocation for one attempt.
///
/// Trims string parameters and promotes the payload into the first
/// declared required parameter that is missing, so a payload-only
/// extraction like `calculate 5 + 5` satisfies a family that requires an
/// `expression` parameter. On retry attempts the calculator family
/// additionally gets non-expression characters stripped, which recovers
/// expressions that arrived wrapped in prose.
pub fn clean(
    invocation: &CandidateInvocation,
    registration: Option<&CapabilityRegistration>,
    attempt: u32,
) -> CandidateInvocation {
    let mut cleaned = invocation.clone();

    for value in cleaned.parameters.values_mut() {
        if let Some(s) = value.as_str() {
            let trimmed = s.trim();
            if trimmed != s {
                *value = coerce_value(trimmed);
            }
        }
    }

    if let Some(registration) = registration {
        if let Some(payload) = cleaned.payload.clone() {
            let missing = registration
                .required_parameters
                .iter()
                .find(|name| !cleaned.parameters.contains_key(name.as_str()));
            if let Some(name) = missing {
                cleaned
                    .parameters
                    .insert(name.clone(), coerce_value(&payload));
            }
        }
    }

    if cleaned.family == "calculator" && attempt > 1 {
        for value in cleaned.parameters.values_mut() {
            if let Some(s) = value.as_str() {
                let stripped: String = s.chars().filter(|c| is_expression_char(*c)).collect();
                *value = coerce_value(stripped.trim());
            }
        }
        if let Some(payload) = cleaned.payload.as_mut() {
            *payload = payload
                .chars()
                .filter(|c| is_expression_char(*c))
                .collect::<String>()
                .trim()
                .to_string();
        }
    }

    cleaned
}
