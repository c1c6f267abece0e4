use thiserror::Error;

/// Top-level error type for the Switchboard pipeline.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for
/// SwitchboardError` so that the `?` operator works seamlessly across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SwitchboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Job error: {0}")]
    Job(String),

    #[error("Rate limit exceeded for submitter: {0}")]
    RateLimited(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for SwitchboardError {
    fn from(e: toml::de::Error) -> Self {
        SwitchboardError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for SwitchboardError {
    fn from(e: serde_json::Error) -> Self {
        SwitchboardError::Serialization(e.to_string())
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, SwitchboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SwitchboardError::Config("missing section".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing section");

        let err = SwitchboardError::Registry("duplicate family".to_string());
        assert_eq!(err.to_string(), "Registry error: duplicate family");

        let err = SwitchboardError::RateLimited("discord:42".to_string());
        assert_eq!(
            err.to_string(),
            "Rate limit exceeded for submitter: discord:42"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SwitchboardError = io.into();
        assert!(matches!(err, SwitchboardError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let bad = serde_json::from_str::<serde_json::Value>("{not json");
        let err: SwitchboardError = bad.unwrap_err().into();
        assert!(matches!(err, SwitchboardError::Serialization(_)));
    }

    #[test]
    fn test_error_from_toml() {
        let bad = toml::from_str::<toml::Value>("= broken =");
        let err: SwitchboardError = bad.unwrap_err().into();
        assert!(matches!(err, SwitchboardError::Config(_)));
    }

    #[test]
    fn test_errors_implement_debug() {
        let err = SwitchboardError::Execution("handler panicked".to_string());
        let dbg = format!("{:?}", err);
        assert!(dbg.contains("Execution"));
    }
}
