//! Configuration loading, validation, and management for deskflow.
//!
//! Loads configuration from a TOML file with environment variable overrides
//! (`DESKFLOW_API_KEY`, `DESKFLOW_FALLBACK_API_KEY`, `DESKFLOW_MODEL`).
//! Validates all settings at load time.

use deskflow_core::channel::{Channel, ChannelClass};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// The root configuration structure.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Primary completion-service API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Secondary (fallback) API key, used once when the final streamed
    /// call is rate-limited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_api_key: Option<String>,

    /// Model identifier sent to the completion service
    #[serde(default = "default_model")]
    pub model: String,

    /// Engine behavior
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            fallback_api_key: None,
            model: default_model(),
            engine: EngineConfig::default(),
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("fallback_api_key", &redact(&self.fallback_api_key))
            .field("model", &self.model)
            .field("engine", &self.engine)
            .finish()
    }
}

/// Orchestration loop behavior. All fields have documented defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Whether the agent engine runs at all (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum tool rounds per run — bounds completion-service calls
    /// (default: 5)
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// Maximum tool executions per run, cumulative across rounds
    /// (default: 10)
    #[serde(default = "default_max_total_tool_calls")]
    pub max_total_tool_calls: usize,

    /// Wall-clock budget in milliseconds, checked at round boundaries
    /// (default: 60000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Base inter-chunk delay for the incremental answer reveal
    /// (default: 35)
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,

    /// Random jitter added on top of the base delay (default: 25)
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,

    /// Escalation gate thresholds
    #[serde(default)]
    pub escalation: EscalationThresholds,
}

fn default_true() -> bool {
    true
}
fn default_max_rounds() -> u32 {
    5
}
fn default_max_total_tool_calls() -> usize {
    10
}
fn default_timeout_ms() -> u64 {
    60_000
}
fn default_chunk_delay_ms() -> u64 {
    35
}
fn default_jitter_ms() -> u64 {
    25
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_rounds: default_max_rounds(),
            max_total_tool_calls: default_max_total_tool_calls(),
            timeout_ms: default_timeout_ms(),
            chunk_delay_ms: default_chunk_delay_ms(),
            jitter_ms: default_jitter_ms(),
            escalation: EscalationThresholds::default(),
        }
    }
}

/// Minimum prior tool calls required before `escalate_to_human` is approved,
/// per channel class. Hand-tuned policy constants, kept as configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationThresholds {
    /// Chat-like, low-latency channels (default: 4)
    #[serde(default = "default_realtime_min")]
    pub realtime_min_tool_calls: usize,

    /// Asynchronous channels (default: 3)
    #[serde(default = "default_async_min")]
    pub async_min_tool_calls: usize,

    /// Everything else (default: 2)
    #[serde(default = "default_standard_min")]
    pub default_min_tool_calls: usize,
}

fn default_realtime_min() -> usize {
    4
}
fn default_async_min() -> usize {
    3
}
fn default_standard_min() -> usize {
    2
}

impl Default for EscalationThresholds {
    fn default() -> Self {
        Self {
            realtime_min_tool_calls: default_realtime_min(),
            async_min_tool_calls: default_async_min(),
            default_min_tool_calls: default_standard_min(),
        }
    }
}

impl EscalationThresholds {
    /// The minimum prior tool calls required on the given channel.
    pub fn for_channel(&self, channel: Channel) -> usize {
        match channel.class() {
            ChannelClass::Realtime => self.realtime_min_tool_calls,
            ChannelClass::Async => self.async_min_tool_calls,
            ChannelClass::Standard => self.default_min_tool_calls,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, apply env overrides, validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: AppConfig = toml::from_str(&raw)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse from a TOML string (no env overrides). Used in tests and by
    /// embedders that manage their own sources.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Environment variables win over the file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("DESKFLOW_API_KEY") {
            if !key.is_empty() {
                debug!("Using API key from DESKFLOW_API_KEY");
                self.api_key = Some(key);
            }
        }
        if let Ok(key) = std::env::var("DESKFLOW_FALLBACK_API_KEY") {
            if !key.is_empty() {
                self.fallback_api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("DESKFLOW_MODEL") {
            if !model.is_empty() {
                self.model = model;
            }
        }
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".into()));
        }
        if self.engine.max_rounds == 0 {
            return Err(ConfigError::Invalid(
                "engine.max_rounds must be at least 1".into(),
            ));
        }
        if self.engine.max_total_tool_calls == 0 {
            return Err(ConfigError::Invalid(
                "engine.max_total_tool_calls must be at least 1".into(),
            ));
        }
        if self.engine.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "engine.timeout_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_documented_values() {
        let config = AppConfig::default();
        assert!(config.engine.enabled);
        assert_eq!(config.engine.max_rounds, 5);
        assert_eq!(config.engine.max_total_tool_calls, 10);
        assert_eq!(config.engine.timeout_ms, 60_000);
        assert_eq!(config.model, "claude-sonnet-4-20250514");
        assert_eq!(config.engine.escalation.realtime_min_tool_calls, 4);
        assert_eq!(config.engine.escalation.async_min_tool_calls, 3);
        assert_eq!(config.engine.escalation.default_min_tool_calls, 2);
    }

    #[test]
    fn parse_partial_toml() {
        let config = AppConfig::from_toml_str(
            r#"
            api_key = "sk-test"
            model = "claude-haiku-35-20241022"

            [engine]
            max_rounds = 3

            [engine.escalation]
            realtime_min_tool_calls = 5
        "#,
        )
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.engine.max_rounds, 3);
        // Unspecified fields fall back to defaults
        assert_eq!(config.engine.max_total_tool_calls, 10);
        assert_eq!(config.engine.escalation.realtime_min_tool_calls, 5);
        assert_eq!(config.engine.escalation.async_min_tool_calls, 3);
    }

    #[test]
    fn thresholds_by_channel() {
        let thresholds = EscalationThresholds::default();
        assert_eq!(thresholds.for_channel(Channel::Widget), 4);
        assert_eq!(thresholds.for_channel(Channel::Email), 3);
        assert_eq!(thresholds.for_channel(Channel::Portal), 2);
        assert_eq!(thresholds.for_channel(Channel::Dashboard), 2);
        assert_eq!(thresholds.for_channel(Channel::Api), 2);
    }

    #[test]
    fn zero_rounds_rejected() {
        let err = AppConfig::from_toml_str("[engine]\nmax_rounds = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = AppConfig::from_toml_str("[engine]\ntimeout_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn empty_model_rejected() {
        let err = AppConfig::from_toml_str(r#"model = "  ""#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key = \"sk-file\"\n[engine]\ntimeout_ms = 1234").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.engine.timeout_ms, 1234);
    }

    #[test]
    fn debug_redacts_keys() {
        let config = AppConfig {
            api_key: Some("sk-super-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
