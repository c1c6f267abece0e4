//! Synchronous rule evaluation for the safety gate.

use serde_json::Value;
use switchboard_core::config::SafetyGateConfig;
use switchboard_extract::CandidateInvocation;

/// Families whose effects touch the host and are subject to the deny
/// lists.
pub const RESTRICTED_FAMILIES: &[&str] = &["filesystem", "shell"];

/// Every string the invocation carries that deny rules should inspect.
fn inspectable_strings(invocation: &CandidateInvocation) -> Vec<&str> {
    let mut out: Vec<&str> = invocation
        .parameters
        .values()
        .filter_map(Value::as_str)
        .collect();
    if let Some(payload) = invocation.payload.as_deref() {
        out.push(payload);
    }
    out
}

/// Immediate verdict, if the rules produce one.
///
/// Deny rules run first: a restricted-family invocation that mentions a
/// denied path prefix or command substring is rejected outright, even if
/// its family were also allow-listed. Allow-listed families pass without
/// review. Anything else gets no immediate verdict and falls through to
/// deferred review.
pub fn immediate_verdict(
    config: &SafetyGateConfig,
    invocation: &CandidateInvocation,
) -> Option<(bool, String)> {
    if RESTRICTED_FAMILIES.contains(&invocation.family.as_str()) {
        for text in inspectable_strings(invocation) {
            for prefix in &config.deny_path_prefixes {
                if text.contains(prefix.as_str()) {
                    return Some((
                        false,
                        format!("references denied path prefix '{}'", prefix),
                    ));
                }
            }
            for substring in &config.deny_command_substrings {
                if text.contains(substring.as_str()) {
                    return Some((
                        false,
                        format!("contains denied command pattern '{}'", substring),
                    ));
                }
            }
        }
    }

    if config
        .allow_families
        .iter()
        .any(|f| f == &invocation.family)
    {
        return Some((true, "family is allow-listed".to_string()));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SafetyGateConfig {
        SafetyGateConfig::default()
    }

    #[test]
    fn test_allow_listed_family_passes() {
        let inv = CandidateInvocation::bare("calculator", "calculate", 0).with_payload("5+5");
        let (allowed, _) = immediate_verdict(&config(), &inv).unwrap();
        assert!(allowed);
    }

    #[test]
    fn test_denied_path_prefix() {
        let mut inv = CandidateInvocation::bare("filesystem", "write_file", 0);
        inv.parameters.insert(
            "path".to_string(),
            Value::from("/etc/passwd"),
        );
        let (allowed, reason) = immediate_verdict(&config(), &inv).unwrap();
        assert!(!allowed);
        assert!(reason.contains("/etc"));
    }

    #[test]
    fn test_denied_command_substring() {
        let inv =
            CandidateInvocation::bare("shell", "run", 0).with_payload("rm -rf /home/someone");
        let (allowed, reason) = immediate_verdict(&config(), &inv).unwrap();
        assert!(!allowed);
        assert!(reason.contains("rm -rf"));
    }

    #[test]
    fn test_denied_substring_in_payload_of_clean_parameters() {
        let mut inv = CandidateInvocation::bare("shell", "run", 0).with_payload("dd if=/dev/sda");
        inv.parameters
            .insert("cwd".to_string(), Value::from("/tmp"));
        let (allowed, _) = immediate_verdict(&config(), &inv).unwrap();
        assert!(!allowed);
    }

    #[test]
    fn test_restricted_family_with_clean_arguments_defers() {
        let inv = CandidateInvocation::bare("shell", "run", 0).with_payload("ls /tmp");
        assert!(immediate_verdict(&config(), &inv).is_none());
    }

    #[test]
    fn test_unknown_family_defers() {
        let inv = CandidateInvocation::bare("thermostat", "set", 0);
        assert!(immediate_verdict(&config(), &inv).is_none());
    }

    #[test]
    fn test_deny_rules_ignore_unrestricted_families() {
        // An allow-listed family carrying a scary-looking string is still
        // allowed; it cannot touch the host.
        let inv = CandidateInvocation::bare("memory", "remember", 0)
            .with_payload("the command was rm -rf /");
        let (allowed, _) = immediate_verdict(&config(), &inv).unwrap();
        assert!(allowed);
    }
}
