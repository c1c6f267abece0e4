use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, SwitchboardError};

/// Top-level configuration for the Switchboard pipeline.
///
/// Loaded from a TOML file. Each section corresponds to one pipeline
/// component or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwitchboardConfig {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub safety: SafetyGateConfig,
    #[serde(default)]
    pub jobs: JobConfig,
}

impl SwitchboardConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SwitchboardConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SwitchboardError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// Verb resolution settings for the capability registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Minimum similarity score for accepting a fuzzy verb match.
    pub similarity_threshold: f64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.6,
        }
    }
}

/// Retry and dispatch settings for the executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Maximum dispatch attempts per invocation (including the first).
    pub max_attempts: u32,
    /// Attempt cap for capabilities flagged as irreversible.
    pub irreversible_max_attempts: u32,
    /// Base backoff delay in milliseconds; doubles per attempt.
    pub backoff_base_ms: u64,
    /// Per-call handler timeout in milliseconds.
    pub handler_timeout_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            irreversible_max_attempts: 1,
            backoff_base_ms: 100,
            handler_timeout_ms: 10_000,
        }
    }
}

/// Safety gate rules and external-review settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyGateConfig {
    /// Timeout for the deferred external review in milliseconds.
    pub review_timeout_ms: u64,
    /// Path prefixes that immediately deny filesystem/shell invocations.
    pub deny_path_prefixes: Vec<String>,
    /// Command substrings that immediately deny filesystem/shell invocations.
    pub deny_command_substrings: Vec<String>,
    /// Families known to be side-effect-free; allowed without review.
    pub allow_families: Vec<String>,
}

impl Default for SafetyGateConfig {
    fn default() -> Self {
        Self {
            review_timeout_ms: 200,
            deny_path_prefixes: vec![
                "/etc".to_string(),
                "/usr".to_string(),
                "/boot".to_string(),
                "/dev".to_string(),
                "~/.ssh".to_string(),
                "C:\\Windows".to_string(),
            ],
            deny_command_substrings: vec![
                "rm -rf".to_string(),
                "mkfs".to_string(),
                "dd if=".to_string(),
                "format ".to_string(),
                "> /dev/".to_string(),
                "shutdown".to_string(),
            ],
            allow_families: vec![
                "calculator".to_string(),
                "clock".to_string(),
                "memory".to_string(),
                "web".to_string(),
            ],
        }
    }
}

/// Job tracker retention and throttling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Interval between retention sweeps, in seconds.
    pub sweep_interval_secs: u64,
    /// Pending/Processing jobs older than this are force-failed.
    pub stuck_after_secs: i64,
    /// Terminal jobs older than this are deleted.
    pub purge_terminal_after_secs: i64,
    /// Token-bucket cap on submissions per submitter per minute.
    pub max_submissions_per_minute: u32,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 300,
            stuck_after_secs: 3600,
            purge_terminal_after_secs: 900,
            max_submissions_per_minute: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = SwitchboardConfig::default();
        assert_eq!(config.executor.max_attempts, 3);
        assert_eq!(config.executor.irreversible_max_attempts, 1);
        assert_eq!(config.executor.backoff_base_ms, 100);
        assert_eq!(config.safety.review_timeout_ms, 200);
        assert_eq!(config.jobs.sweep_interval_secs, 300);
        assert!((config.registry.similarity_threshold - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_safety_lists_populated() {
        let config = SafetyGateConfig::default();
        assert!(config.deny_path_prefixes.iter().any(|p| p == "/etc"));
        assert!(config
            .deny_command_substrings
            .iter()
            .any(|c| c == "rm -rf"));
        assert!(config.allow_families.iter().any(|f| f == "calculator"));
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = SwitchboardConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let rt: SwitchboardConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(rt.executor.max_attempts, config.executor.max_attempts);
        assert_eq!(
            rt.safety.deny_path_prefixes,
            config.safety.deny_path_prefixes
        );
    }

    #[test]
    fn test_partial_toml_uses_section_defaults() {
        let toml_str = r#"
            [executor]
            max_attempts = 5
            irreversible_max_attempts = 1
            backoff_base_ms = 50
            handler_timeout_ms = 2000
        "#;
        let config: SwitchboardConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.executor.max_attempts, 5);
        // Unspecified sections fall back to defaults
        assert_eq!(config.safety.review_timeout_ms, 200);
        assert_eq!(config.jobs.max_submissions_per_minute, 30);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = SwitchboardConfig::load(Path::new("/nonexistent/switchboard.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config =
            SwitchboardConfig::load_or_default(Path::new("/nonexistent/switchboard.toml"));
        assert_eq!(config.executor.max_attempts, 3);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("switchboard.toml");

        let mut config = SwitchboardConfig::default();
        config.jobs.stuck_after_secs = 7200;
        config.save(&path).unwrap();

        let loaded = SwitchboardConfig::load(&path).unwrap();
        assert_eq!(loaded.jobs.stuck_after_secs, 7200);
    }

    #[test]
    fn test_load_or_default_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not [ valid { toml").unwrap();

        let config = SwitchboardConfig::load_or_default(&path);
        assert_eq!(config.executor.max_attempts, 3);
    }
}
