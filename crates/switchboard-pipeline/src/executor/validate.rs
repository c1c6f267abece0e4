//! Per-family output validation.
//!
//! A handler that returns without erroring can still produce output the
//! pipeline should not surface. Validation runs after every dispatch;
//! failures count as attempt failures and are retried like any other.

use serde_json::Value;

use crate::error::ExecutionError;

/// Validate handler output for the given family.
///
/// calculator output must be numeric (a number, or a string that parses
/// as one). memory, clock, and web must produce a non-empty string.
/// Unknown families only need to produce something non-null.
pub fn validate(family: &str, output: &Value) -> Result<(), ExecutionError> {
    match family {
        "calculator" => {
            let numeric = match output {
                Value::Number(_) => true,
                Value::String(s) => s.trim().parse::<f64>().is_ok(),
                _ => false,
            };
            if !numeric {
                return Err(ExecutionError::InvalidOutput(format!(
                    "calculator output is not numeric: {}",
                    output
                )));
            }
        }
        "memory" | "clock" | "web" => {
            let ok = matches!(output, Value::String(s) if !s.trim().is_empty());
            if !ok {
                return Err(ExecutionError::InvalidOutput(format!(
                    "{} output is not a non-empty string: {}",
                    family, output
                )));
            }
        }
        _ => {
            if output.is_null() {
                return Err(ExecutionError::InvalidOutput(
                    "handler produced null output".to_string(),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_calculator_accepts_numbers() {
        assert!(validate("calculator", &json!(10)).is_ok());
        assert!(validate("calculator", &json!(2.5)).is_ok());
        assert!(validate("calculator", &json!("42")).is_ok());
    }

    #[test]
    fn test_calculator_rejects_non_numeric() {
        assert!(validate("calculator", &json!("ten")).is_err());
        assert!(validate("calculator", &json!(null)).is_err());
        assert!(validate("calculator", &json!({"value": 10})).is_err());
    }

    #[test]
    fn test_string_families() {
        assert!(validate("memory", &json!("Remembered city = Lisbon")).is_ok());
        assert!(validate("clock", &json!("2026-08-29T12:00:00Z")).is_ok());
        assert!(validate("web", &json!("")).is_err());
        assert!(validate("memory", &json!(17)).is_err());
    }

    #[test]
    fn test_unknown_family_rejects_only_null() {
        assert!(validate("thermostat", &json!({"target": 21})).is_ok());
        assert!(validate("thermostat", &json!(null)).is_err());
    }
}
