//! Process configuration, read once at startup.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default model for the external triage call.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default bound on one external call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 8;

/// Default audit log path.
pub const DEFAULT_AUDIT_PATH: &str = "triage.log";

/// Which classification strategy a configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Keyword rules and static templates only.
    RuleOnly,
    /// External model first, rules as fallback.
    LlmAssisted,
}

/// Immutable triage configuration.
///
/// Constructed once at process start and passed into the pipeline; nothing
/// reads the environment after that.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// External-model credential; absence selects the rule-only strategy.
    pub api_key: Option<SecretString>,
    /// Model identifier for the external call.
    pub model: String,
    /// Bound on one external call (connect + response).
    pub timeout: Duration,
    /// Audit log destination.
    pub audit_path: PathBuf,
    /// Input size cap in bytes.
    pub max_input_bytes: usize,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            audit_path: PathBuf::from(DEFAULT_AUDIT_PATH),
            max_input_bytes: crate::extract::DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl TriageConfig {
    /// Read configuration from the environment.
    ///
    /// `OPENAI_API_KEY` activates the external strategy; `TRIAGE_MODEL`,
    /// `TRIAGE_TIMEOUT_SECS`, `TRIAGE_AUDIT_LOG` and `TRIAGE_MAX_INPUT_BYTES`
    /// override the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from);

        let model = std::env::var("TRIAGE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let timeout = match std::env::var("TRIAGE_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "TRIAGE_TIMEOUT_SECS".into(),
                    message: format!("not a number of seconds: {raw:?}"),
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let audit_path = std::env::var("TRIAGE_AUDIT_LOG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_AUDIT_PATH));

        let max_input_bytes = match std::env::var("TRIAGE_MAX_INPUT_BYTES") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "TRIAGE_MAX_INPUT_BYTES".into(),
                message: format!("not a byte count: {raw:?}"),
            })?,
            Err(_) => crate::extract::DEFAULT_MAX_INPUT_BYTES,
        };

        Ok(Self {
            api_key,
            model,
            timeout,
            audit_path,
            max_input_bytes,
        })
    }

    /// Strategy selected by this configuration.
    pub fn strategy(&self) -> Strategy {
        if self.api_key.is_some() {
            Strategy::LlmAssisted
        } else {
            Strategy::RuleOnly
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_rule_only() {
        let config = TriageConfig::default();
        assert_eq!(config.strategy(), Strategy::RuleOnly);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn credential_selects_llm_assisted() {
        let config = TriageConfig {
            api_key: Some(SecretString::from("sk-test")),
            ..TriageConfig::default()
        };
        assert_eq!(config.strategy(), Strategy::LlmAssisted);
    }
}
